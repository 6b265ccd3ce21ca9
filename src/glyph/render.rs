use image::RgbaImage;
use rand::Rng;

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::CaptchaResult,
    },
    glyph::{fonts::FontSet, text::TextRasterizer},
    raster::sample::{Quad, crop_to_content, quad_warp, resize, rotate_expand},
};

/// Maximum rotation applied to a glyph, in degrees either way.
pub const MAX_ROTATION_DEG: f64 = 30.0;

/// A rendered, rotated and warped character surface (premultiplied RGBA8).
#[derive(Clone, Debug)]
pub struct Glyph {
    pub ch: char,
    /// Index into the [`FontSet`] faces, when rendered from one.
    pub face: Option<usize>,
    pub surface: RgbaImage,
}

impl Glyph {
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }
}

/// Anything that can turn a character into a glyph surface.
pub trait GlyphSource {
    fn render_glyph<R: Rng>(
        &mut self,
        rng: &mut R,
        ch: char,
        color: Rgba8,
    ) -> CaptchaResult<Glyph>;
}

/// Renders glyphs from a [`FontSet`], distorting each one.
pub struct GlyphRenderer<'a> {
    text: &'a mut TextRasterizer,
    fonts: &'a FontSet,
}

impl<'a> GlyphRenderer<'a> {
    pub fn new(text: &'a mut TextRasterizer, fonts: &'a FontSet) -> Self {
        Self { text, fonts }
    }
}

impl GlyphSource for GlyphRenderer<'_> {
    /// Measure, draw with a small random inset, crop, rotate, then warp back
    /// into the measured footprint.
    fn render_glyph<R: Rng>(
        &mut self,
        rng: &mut R,
        ch: char,
        color: Rgba8,
    ) -> CaptchaResult<Glyph> {
        let (face_idx, face) = self.fonts.choose(rng)?;
        let (w, h) = self.text.measure(ch, face)?;

        let dx = rng.random_range(0..=4u32);
        let dy = rng.random_range(0..=6u32);
        let drawn = self.text.draw(
            ch,
            face,
            color,
            (w + dx, h + dy),
            (f64::from(dx), f64::from(dy)),
        )?;

        let cropped = crop_to_content(&drawn);
        let angle = rng.random_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG);
        let rotated = rotate_expand(&cropped, angle);
        let surface = random_warp(rng, &rotated, w, h);

        Ok(Glyph {
            ch,
            face: Some(face_idx),
            surface,
        })
    }
}

/// Random quadrilateral warp that lands in a `width` x `height` footprint.
///
/// The source is first stretched by the sampled corner offsets so the
/// perturbed quad stays inside it.
pub fn random_warp<R: Rng>(rng: &mut R, src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let jitter_x = f64::from(width) * rng.random_range(0.1..0.3);
    let jitter_y = f64::from(height) * rng.random_range(0.2..0.3);
    // Truncation toward zero, like an integer cast of the sampled float.
    let x1 = rng.random_range(-jitter_x..=jitter_x).trunc();
    let y1 = rng.random_range(-jitter_y..=jitter_y).trunc();
    let x2 = rng.random_range(-jitter_x..=jitter_x).trunc();
    let y2 = rng.random_range(-jitter_y..=jitter_y).trunc();

    let w2 = f64::from(width) + x1.abs() + x2.abs();
    let h2 = f64::from(height) + y1.abs() + y2.abs();
    let stretched = resize(src, w2 as u32, h2 as u32);

    let quad = Quad {
        nw: Point::new(x1, y1),
        sw: Point::new(-x1, h2 - y2),
        se: Point::new(w2 + x2, h2 + y2),
        ne: Point::new(w2 - x2, -y1),
    };
    quad_warp(&stretched, width, height, quad)
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/render.rs"]
mod tests;
