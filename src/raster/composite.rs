use image::{GrayImage, RgbImage, RgbaImage};

use crate::foundation::{
    error::{CaptchaError, CaptchaResult},
    math::{INTENSITY_TABLE, lerp_u8, luma_u8, mul_div255_u8},
};

/// Derive a paste mask from a glyph's luminance, boosted through
/// [`INTENSITY_TABLE`].
pub fn luminance_mask(glyph: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(glyph.width(), glyph.height(), |x, y| {
        let [r, g, b, _] = glyph.get_pixel(x, y).0;
        image::Luma([INTENSITY_TABLE[usize::from(luma_u8(r, g, b))]])
    })
}

/// Paste `glyph` with its upper-left corner at `(x, y)`, blending through the
/// luminance mask. Parts falling outside `dst` are dropped.
pub fn paste_masked(dst: &mut RgbImage, glyph: &RgbaImage, x: i64, y: i64) {
    let mask = luminance_mask(glyph);
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (gx, gy, px) in glyph.enumerate_pixels() {
        let tx = x + i64::from(gx);
        let ty = y + i64::from(gy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let m = mask.get_pixel(gx, gy).0[0];
        if m == 0 {
            continue;
        }
        let out = dst.get_pixel_mut(tx as u32, ty as u32);
        for c in 0..3 {
            out.0[c] = lerp_u8(out.0[c], px.0[c], m);
        }
    }
}

/// Source-over of a premultiplied RGBA8 layer onto an opaque canvas.
pub fn composite_layer(dst: &mut RgbImage, layer: &[u8]) -> CaptchaResult<()> {
    let expected = (dst.width() as usize)
        .checked_mul(dst.height() as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CaptchaError::render("layer buffer size overflow"))?;
    if layer.len() != expected {
        return Err(CaptchaError::render(
            "composite_layer expects a layer matching the canvas size",
        ));
    }
    for (d, s) in dst.pixels_mut().zip(layer.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            d.0[c] = s[c].saturating_add(mul_div255_u8(u16::from(d.0[c]), inv));
        }
    }
    Ok(())
}

/// Source-over of a `width` x `height` premultiplied layer whose upper-left
/// corner sits at `(x, y)` on the canvas. Parts outside the canvas are dropped.
pub fn composite_layer_at(
    dst: &mut RgbImage,
    layer: &[u8],
    (width, height): (u32, u32),
    (x, y): (i64, i64),
) -> CaptchaResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CaptchaError::render("layer buffer size overflow"))?;
    if layer.len() != expected {
        return Err(CaptchaError::render(
            "composite_layer_at expects a layer matching its declared size",
        ));
    }
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (i, s) in layer.chunks_exact(4).enumerate() {
        if s[3] == 0 {
            continue;
        }
        let tx = x + (i as i64 % i64::from(width));
        let ty = y + (i as i64 / i64::from(width));
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            d.0[c] = s[c].saturating_add(mul_div255_u8(u16::from(d.0[c]), inv));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
