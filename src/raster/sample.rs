//! Resampling transforms over premultiplied RGBA8 surfaces.
//!
//! All surfaces here are `image::RgbaImage` holding premultiplied pixels, so
//! bilinear filtering never bleeds color out of transparent regions.

use image::{RgbaImage, imageops::FilterType};

use crate::foundation::core::{Affine, Point, Rect};

/// Crop to the bounding box of pixels with non-zero alpha.
///
/// A surface with no visible pixels is returned unchanged so blanks keep
/// their footprint.
pub fn crop_to_content(src: &RgbaImage) -> RgbaImage {
    let Some((x0, y0, x1, y1)) = content_bounds(src) else {
        return src.clone();
    };
    image::imageops::crop_imm(src, x0, y0, x1 - x0, y1 - y0).to_image()
}

/// Half-open `(x0, y0, x1, y1)` bounds of non-transparent pixels.
pub fn content_bounds(src: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in src.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    bounds
}

/// Rotate counter-clockwise by `degrees` about the center, growing the
/// surface so no corner is clipped.
pub fn rotate_expand(src: &RgbaImage, degrees: f64) -> RgbaImage {
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    // y points down, so a visually counter-clockwise turn is a negative angle.
    let rotation = Affine::rotate_about(-degrees.to_radians(), Point::new(w / 2.0, h / 2.0));
    let bbox = rotation.transform_rect_bbox(Rect::new(0.0, 0.0, w, h));
    let nw = (snap(bbox.x1).ceil() - snap(bbox.x0).floor()).max(1.0);
    let nh = (snap(bbox.y1).ceil() - snap(bbox.y0).floor()).max(1.0);

    let forward = Affine::translate(((nw - w) / 2.0, (nh - h) / 2.0)) * rotation;
    resample_affine(src, nw as u32, nh as u32, forward.inverse())
}

/// Fill a `width` x `height` surface by pulling every destination pixel
/// center through `dst_to_src`.
pub fn resample_affine(src: &RgbaImage, width: u32, height: u32, dst_to_src: Affine) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let p = dst_to_src * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        image::Rgba(sample_bilinear(src, p.x - 0.5, p.y - 0.5))
    })
}

/// Source-space corners of a quadrilateral, in the order
/// upper-left, lower-left, lower-right, upper-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub nw: Point,
    pub sw: Point,
    pub se: Point,
    pub ne: Point,
}

/// Map the quadrilateral `quad` of `src` onto a `width` x `height` rectangle
/// using bilinear corner interpolation.
pub fn quad_warp(src: &RgbaImage, width: u32, height: u32, quad: Quad) -> RgbaImage {
    let sx = 1.0 / f64::from(width.max(1));
    let sy = 1.0 / f64::from(height.max(1));
    let Quad { nw, sw, se, ne } = quad;

    let a0 = nw.x;
    let a1 = (ne.x - nw.x) * sx;
    let a2 = (sw.x - nw.x) * sy;
    let a3 = (nw.x - sw.x + se.x - ne.x) * sx * sy;
    let b0 = nw.y;
    let b1 = (ne.y - nw.y) * sx;
    let b2 = (sw.y - nw.y) * sy;
    let b3 = (nw.y - sw.y + se.y - ne.y) * sx * sy;

    RgbaImage::from_fn(width, height, |x, y| {
        let u = f64::from(x) + 0.5;
        let v = f64::from(y) + 0.5;
        let px = a0 + a1 * u + a2 * v + a3 * u * v;
        let py = b0 + b1 * u + b2 * v + b3 * u * v;
        image::Rgba(sample_bilinear(src, px - 0.5, py - 0.5))
    })
}

/// Bilinear resize, preserving premultiplication.
pub fn resize(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    image::imageops::resize(src, width.max(1), height.max(1), FilterType::Triangle)
}

/// Sample at continuous pixel coordinates; outside the surface is transparent.
pub fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    if !x.is_finite() || !y.is_finite() {
        return [0; 4];
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    let taps = [
        (texel(src, xi, yi), (1.0 - tx) * (1.0 - ty)),
        (texel(src, xi + 1, yi), tx * (1.0 - ty)),
        (texel(src, xi, yi + 1), (1.0 - tx) * ty),
        (texel(src, xi + 1, yi + 1), tx * ty),
    ];

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let acc: f64 = taps.iter().map(|(px, w)| f64::from(px[c]) * w).sum();
        *slot = acc.round().clamp(0.0, 255.0) as u8;
    }
    out
}

// Trig round-off must not grow a right-angle rotation by a pixel.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 { r } else { v }
}

fn texel(src: &RgbaImage, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 || x >= i64::from(src.width()) || y >= i64::from(src.height()) {
        return [0; 4];
    }
    src.get_pixel(x as u32, y as u32).0
}

#[cfg(test)]
#[path = "../../tests/unit/raster/sample.rs"]
mod tests;
