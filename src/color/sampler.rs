use rand::Rng;

use crate::foundation::core::Rgba8;

/// Draw R, G and B independently and uniformly from `low..=high`.
///
/// With `opacity` the alpha channel is fixed to that value; without it the
/// color is fully opaque.
pub fn random_color<R: Rng>(rng: &mut R, low: u8, high: u8, opacity: Option<u8>) -> Rgba8 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let r = rng.random_range(low..=high);
    let g = rng.random_range(low..=high);
    let b = rng.random_range(low..=high);
    Rgba8::new(r, g, b, opacity.unwrap_or(255))
}

/// Near-white background color.
pub fn background_color<R: Rng>(rng: &mut R) -> Rgba8 {
    random_color(rng, 238, 255, None)
}

/// Darker, slightly translucent ink that stays distinct from any background
/// produced by [`background_color`].
pub fn foreground_color<R: Rng>(rng: &mut R) -> Rgba8 {
    let opacity = rng.random_range(220..=255);
    random_color(rng, 10, 200, Some(opacity))
}

#[cfg(test)]
#[path = "../../tests/unit/color/sampler.rs"]
mod tests;
