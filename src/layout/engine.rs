use image::{RgbImage, imageops::FilterType};
use rand::Rng;

use crate::{
    foundation::{
        core::{BoundingBox, Rgba8, Vec2},
        error::CaptchaResult,
    },
    glyph::render::{Glyph, GlyphSource},
    raster::{composite::paste_masked, sample::resize, stroke::StrokeLayer},
};

/// Chance of a spacing blank before each input character.
pub const BLANK_PROBABILITY: f64 = 0.5;
/// Outline color for boxes on the annotated canvas.
pub const BOX_OUTLINE: Rgba8 = Rgba8::RED;
/// Background of the per-character images.
pub const CHAR_IMAGE_BACKGROUND: Rgba8 = Rgba8::WHITE;

/// Canvas parameters for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSpec {
    pub width: u32,
    pub height: u32,
    pub color: Rgba8,
    pub background: Rgba8,
    /// Also produce the boxed canvas and per-character images.
    pub annotate: bool,
}

/// Training-oriented by-products of a layout pass.
#[derive(Clone, Debug)]
pub struct Annotations {
    pub image_with_boxes: RgbImage,
    pub char_images: Vec<RgbImage>,
}

/// Output of [`layout`], before noise.
#[derive(Clone, Debug)]
pub struct Composited {
    pub image: RgbImage,
    pub boxes: Vec<BoundingBox>,
    pub annotations: Option<Annotations>,
}

#[derive(Debug)]
struct Slot {
    glyph: Glyph,
    /// `false` for injected spacing blanks.
    real: bool,
}

/// Lay out `text` left to right onto a fresh canvas.
///
/// The canvas grows to fit all glyphs and is scaled back to `spec.width`
/// afterwards; box x/width follow that scale, box y/height do not need to.
pub fn layout<R: Rng, G: GlyphSource>(
    rng: &mut R,
    source: &mut G,
    text: &str,
    spec: &LayoutSpec,
) -> CaptchaResult<Composited> {
    let chars: Vec<char> = text.chars().collect();
    let slots = render_slots(rng, source, &chars, spec)?;

    let text_width: u32 = slots.iter().map(|s| s.glyph.width()).sum();
    let width = text_width.max(spec.width);
    let height = spec.height;

    let mut image = RgbImage::from_pixel(width, height, spec.background.rgb());
    let mut annotations = spec.annotate.then(|| Annotations {
        image_with_boxes: image.clone(),
        char_images: Vec::new(),
    });
    let blank = spec
        .annotate
        .then(|| RgbImage::from_pixel(width, height, CHAR_IMAGE_BACKGROUND.rgb()));
    let mut boxes = Vec::new();

    if !chars.is_empty() {
        let average = i64::from(text_width) / chars.len() as i64;
        let tighten = average / 4;
        let mut offset = average / 10;

        for slot in &slots {
            let glyph = &slot.glyph;
            let y = (i64::from(height) - i64::from(glyph.height())) / 2;

            paste_masked(&mut image, &glyph.surface, offset, y);
            if let Some(ann) = annotations.as_mut() {
                paste_masked(&mut ann.image_with_boxes, &glyph.surface, offset, y);
                if slot.real
                    && let Some(blank) = blank.as_ref()
                {
                    let mut only = blank.clone();
                    paste_masked(&mut only, &glyph.surface, offset, y);
                    ann.char_images.push(only);
                }
            }

            if slot.real && glyph.ch != ' ' {
                let bbox = BoundingBox::new(
                    glyph.ch,
                    offset as f64,
                    y as f64,
                    f64::from(glyph.width()),
                    f64::from(glyph.height()),
                )
                .clipped(f64::from(width), f64::from(height));
                if let Some(ann) = annotations.as_mut() {
                    draw_box(&mut ann.image_with_boxes, &bbox)?;
                }
                boxes.push(bbox);
            }

            offset = (offset + i64::from(glyph.width()) + rng.random_range(-tighten..=0)).max(0);
        }
    }

    if width > spec.width {
        tracing::debug!(
            layout_width = width,
            target_width = spec.width,
            "scaling canvas back"
        );
        let ratio = f64::from(spec.width) / f64::from(width);
        let target = f64::from(spec.width);
        image = shrink(&image, spec.width, height);
        if let Some(ann) = annotations.as_mut() {
            ann.image_with_boxes = shrink(&ann.image_with_boxes, spec.width, height);
            for only in &mut ann.char_images {
                *only = shrink(only, spec.width, height);
            }
        }
        for bbox in &mut boxes {
            *bbox = bbox.rescaled_x(ratio, target);
        }
    }

    Ok(Composited {
        image,
        boxes,
        annotations,
    })
}

/// Render a glyph for every character, with random spacing blanks in front.
fn render_slots<R: Rng, G: GlyphSource>(
    rng: &mut R,
    source: &mut G,
    chars: &[char],
    spec: &LayoutSpec,
) -> CaptchaResult<Vec<Slot>> {
    let mut slots = Vec::with_capacity(chars.len() * 2);
    for &ch in chars {
        if rng.random_bool(BLANK_PROBABILITY) {
            let glyph = source.render_glyph(rng, ' ', spec.color)?;
            slots.push(Slot {
                glyph: fit_height(glyph, spec.height),
                real: false,
            });
        }
        let glyph = source.render_glyph(rng, ch, spec.color)?;
        slots.push(Slot {
            glyph: fit_height(glyph, spec.height),
            real: true,
        });
    }
    Ok(slots)
}

/// Scale a glyph taller than the canvas down to the canvas height.
fn fit_height(mut glyph: Glyph, max_height: u32) -> Glyph {
    let (w, h) = glyph.surface.dimensions();
    if h <= max_height || max_height == 0 {
        return glyph;
    }
    let scaled_w = (f64::from(w) * f64::from(max_height) / f64::from(h))
        .round()
        .max(1.0) as u32;
    glyph.surface = resize(&glyph.surface, scaled_w, max_height);
    glyph
}

/// Transparent margin around an outline layer, in pixels.
const OUTLINE_MARGIN: i64 = 1;

fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox) -> CaptchaResult<()> {
    // A layer just around the box keeps long canvases within rasterizer limits.
    let ox = bbox.x.floor() as i64 - OUTLINE_MARGIN;
    let oy = bbox.y.floor() as i64 - OUTLINE_MARGIN;
    let w = bbox.right().ceil() as i64 - ox + 2 * OUTLINE_MARGIN;
    let h = bbox.bottom().ceil() as i64 - oy + 2 * OUTLINE_MARGIN;

    // Outline pixels sit on x..=x+w and y..=y+h, so stroke through pixel centers.
    let outline = bbox.rect() + Vec2::new(0.5 - ox as f64, 0.5 - oy as f64);
    let mut layer = StrokeLayer::new(w.max(1) as u32, h.max(1) as u32)?;
    layer.stroke_shape(&outline, 1.0, BOX_OUTLINE);
    layer.composite_onto_at(canvas, (ox, oy))
}

fn shrink(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    image::imageops::resize(src, width, height, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
