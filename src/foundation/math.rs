/// Luminance-to-alpha scaling applied before masked pastes.
pub(crate) const INTENSITY_SCALE_PERCENT: u32 = 197;

/// Precomputed `min(i * 1.97, 255)` lookup for every 8-bit intensity.
pub(crate) static INTENSITY_TABLE: [u8; 256] = build_intensity_table();

const fn build_intensity_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let v = (i as u32 * INTENSITY_SCALE_PERCENT) / 100;
        table[i] = if v > 255 { 255 } else { v as u8 };
        i += 1;
    }
    table
}

/// ITU-R 601-2 luma, the same weights used for `L` conversion.
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let l = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
    (l / 1000) as u8
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Blend `src` over `dst` with coverage `m` in `0..=255`.
pub(crate) fn lerp_u8(dst: u8, src: u8, m: u8) -> u8 {
    let inv = 255u16 - u16::from(m);
    mul_div255_u16(u16::from(src), u16::from(m))
        .saturating_add(mul_div255_u16(u16::from(dst), inv))
        .min(255) as u8
}
