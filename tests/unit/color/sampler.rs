use rand::{SeedableRng, rngs::StdRng};

use super::*;

#[test]
fn channels_stay_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let c = random_color(&mut rng, 10, 200, None);
        for v in [c.r, c.g, c.b] {
            assert!((10..=200).contains(&v));
        }
        assert_eq!(c.a, 255);
    }
}

#[test]
fn opacity_is_passed_through_unchanged() {
    let mut rng = StdRng::seed_from_u64(1);
    for alpha in [0u8, 128, 220, 255] {
        assert_eq!(random_color(&mut rng, 0, 255, Some(alpha)).a, alpha);
    }
}

#[test]
fn degenerate_range_is_constant() {
    let mut rng = StdRng::seed_from_u64(3);
    let c = random_color(&mut rng, 42, 42, None);
    assert_eq!(c, Rgba8::opaque(42, 42, 42));
}

#[test]
fn foreground_is_darker_than_background() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let bg = background_color(&mut rng);
        let fg = foreground_color(&mut rng);
        assert!(bg.r >= 238 && bg.g >= 238 && bg.b >= 238);
        assert!(fg.r <= 200 && fg.g <= 200 && fg.b <= 200);
        assert!(fg.a >= 220);
    }
}
