use image::RgbImage;
use kurbo::Arc;
use rand::Rng;

use crate::{
    foundation::{
        core::{Point, Rgba8, Vec2},
        error::CaptchaResult,
    },
    raster::{smooth::smooth, stroke::StrokeLayer},
};

/// Speckles drawn per canvas.
pub const NOISE_DOTS: usize = 30;
/// Pen width of a speckle, in pixels.
pub const DOT_WIDTH: f64 = 3.0;
/// Pen width of the arc.
pub const ARC_WIDTH: f64 = 1.0;

/// Draw one random arc and [`NOISE_DOTS`] speckles in `color`, then smooth
/// the whole canvas.
///
/// Every call consumes fresh random draws, so two canvases noised one after
/// the other get different noise.
pub fn add_noise<R: Rng>(rng: &mut R, image: &mut RgbImage, color: Rgba8) -> CaptchaResult<()> {
    let (w, h) = image.dimensions();
    // The canvas has no alpha; ink lands opaque.
    let color = Rgba8 { a: 255, ..color };
    let mut layer = StrokeLayer::for_canvas(image)?;

    let arc = random_arc(rng, w, h);
    if arc.radii.x > 0.0 || arc.radii.y > 0.0 {
        layer.stroke_shape(&arc, ARC_WIDTH, color);
    }

    for _ in 0..NOISE_DOTS {
        let x = f64::from(rng.random_range(0..=w));
        let y = f64::from(rng.random_range(0..=h));
        layer.stroke_line(
            Point::new(x + 0.5, y + 0.5),
            Point::new(x - 0.5, y - 0.5),
            DOT_WIDTH,
            color,
        );
    }

    layer.composite_onto(image)?;
    *image = smooth(image);
    tracing::trace!(width = w, height = h, "noise applied");
    Ok(())
}

/// Elliptical arc inscribed in a random box that spans most of the canvas
/// width, opening downward.
fn random_arc<R: Rng>(rng: &mut R, w: u32, h: u32) -> Arc {
    let x1 = rng.random_range(0..=w / 5);
    let x2 = rng.random_range(w - w / 5..=w);
    let y1 = rng.random_range(h / 5..=h - h / 5);
    let y2 = rng.random_range(y1..=h - h / 5);
    let end = rng.random_range(160..=200u32);
    let start = rng.random_range(0..=20u32);

    let (x1, x2, y1, y2) = (f64::from(x1), f64::from(x2), f64::from(y1), f64::from(y2));
    Arc {
        center: Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0),
        radii: Vec2::new((x2 - x1) / 2.0, (y2 - y1) / 2.0),
        start_angle: f64::from(start).to_radians(),
        sweep_angle: f64::from(end - start).to_radians(),
        x_rotation: 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/injector.rs"]
mod tests;
