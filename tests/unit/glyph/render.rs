use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::glyph::fonts::DEFAULT_FONT_SIZES;

const INK: Rgba8 = Rgba8::new(40, 60, 180, 240);

#[test]
fn glyph_keeps_measured_footprint_of_its_face() {
    let fonts = FontSet::load(&[], &DEFAULT_FONT_SIZES).unwrap();
    let mut text = TextRasterizer::new();
    let mut rng = StdRng::seed_from_u64(42);

    for ch in ['1', 'A', 'g', '%'] {
        let glyph = GlyphRenderer::new(&mut text, &fonts)
            .render_glyph(&mut rng, ch, INK)
            .unwrap();
        let face = &fonts.faces()[glyph.face.unwrap()];
        let measured = text.measure(ch, face).unwrap();
        assert_eq!(glyph.surface.dimensions(), measured);
        assert_eq!(glyph.ch, ch);
        assert!(glyph.surface.pixels().any(|p| p.0[3] > 0));
    }
}

#[test]
fn blank_glyph_is_empty_but_sized() {
    let fonts = FontSet::load(&[], &DEFAULT_FONT_SIZES).unwrap();
    let mut text = TextRasterizer::new();
    let mut rng = StdRng::seed_from_u64(9);
    let glyph = GlyphRenderer::new(&mut text, &fonts)
        .render_glyph(&mut rng, ' ', INK)
        .unwrap();
    assert!(glyph.width() > 1 && glyph.height() > 1);
    assert!(glyph.surface.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn same_seed_renders_same_glyph() {
    let fonts = FontSet::load(&[], &DEFAULT_FONT_SIZES).unwrap();
    let mut text = TextRasterizer::new();
    let a = GlyphRenderer::new(&mut text, &fonts)
        .render_glyph(&mut StdRng::seed_from_u64(3), 'Q', INK)
        .unwrap();
    let b = GlyphRenderer::new(&mut text, &fonts)
        .render_glyph(&mut StdRng::seed_from_u64(3), 'Q', INK)
        .unwrap();
    assert_eq!(a.face, b.face);
    assert_eq!(a.surface, b.surface);
}

#[test]
fn warp_lands_in_requested_footprint() {
    let src = RgbaImage::from_pixel(31, 47, image::Rgba([255, 255, 255, 255]));
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let out = random_warp(&mut rng, &src, 28, 40);
        assert_eq!(out.dimensions(), (28, 40));
    }
}
