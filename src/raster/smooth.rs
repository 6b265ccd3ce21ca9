use image::RgbImage;

/// Center-weighted 3x3 smoothing kernel, row-major.
pub const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];

/// Apply [`SMOOTH_KERNEL`] to every channel. Edge pixels reuse their nearest
/// in-bounds neighbours.
pub fn smooth(src: &RgbImage) -> RgbImage {
    convolve3x3(src, &SMOOTH_KERNEL)
}

/// Integer 3x3 convolution normalized by the kernel sum.
pub fn convolve3x3(src: &RgbImage, kernel: &[u32; 9]) -> RgbImage {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return src.clone();
    }
    let sum: u32 = kernel.iter().sum();
    if sum == 0 {
        return src.clone();
    }

    let w = width as i64;
    let h = height as i64;
    let mut out = RgbImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 3];
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = (x + (ki % 3) as i64 - 1).clamp(0, w - 1);
                let sy = (y + (ki / 3) as i64 - 1).clamp(0, h - 1);
                let px = src.get_pixel(sx as u32, sy as u32);
                for c in 0..3 {
                    acc[c] += kw * u32::from(px.0[c]);
                }
            }
            let dst = out.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                dst.0[c] = ((acc[c] + sum / 2) / sum).min(255) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/smooth.rs"]
mod tests;
