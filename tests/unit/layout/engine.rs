use image::{Rgb, Rgba, RgbaImage};
use rand::{SeedableRng, rngs::StdRng};

use super::*;

/// Solid bright blocks; blanks are transparent blocks of the same size.
struct Blocks {
    width: u32,
    height: u32,
    calls: usize,
}

impl Blocks {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: 0,
        }
    }
}

impl GlyphSource for Blocks {
    fn render_glyph<R: Rng>(
        &mut self,
        _rng: &mut R,
        ch: char,
        _color: Rgba8,
    ) -> CaptchaResult<Glyph> {
        self.calls += 1;
        let px = if ch == ' ' {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([200, 200, 200, 255])
        };
        Ok(Glyph {
            ch,
            face: None,
            surface: RgbaImage::from_pixel(self.width, self.height, px),
        })
    }
}

fn spec(annotate: bool) -> LayoutSpec {
    LayoutSpec {
        width: 160,
        height: 60,
        color: Rgba8::new(20, 20, 20, 255),
        background: Rgba8::opaque(250, 250, 250),
        annotate,
    }
}

fn chars_of(boxes: &[BoundingBox]) -> String {
    boxes.iter().map(|b| b.ch).collect()
}

#[test]
fn one_box_per_character_in_order() {
    let mut rng = StdRng::seed_from_u64(1);
    let out = layout(&mut rng, &mut Blocks::new(20, 30), "1234", &spec(true)).unwrap();
    assert_eq!(chars_of(&out.boxes), "1234");
    assert_eq!(out.image.dimensions(), (160, 60));

    let ann = out.annotations.unwrap();
    assert_eq!(ann.char_images.len(), 4);
    assert_eq!(ann.image_with_boxes.dimensions(), (160, 60));
    for only in &ann.char_images {
        assert_eq!(only.dimensions(), (160, 60));
    }
}

#[test]
fn spaces_get_no_box_but_keep_their_place() {
    let mut rng = StdRng::seed_from_u64(2);
    let out = layout(&mut rng, &mut Blocks::new(20, 30), "a b", &spec(true)).unwrap();
    assert_eq!(chars_of(&out.boxes), "ab");
    assert_eq!(out.annotations.unwrap().char_images.len(), 3);
    assert!(out.boxes[1].x - out.boxes[0].x >= 20.0);
}

#[test]
fn boxes_are_vertically_centered_and_advance() {
    let mut rng = StdRng::seed_from_u64(3);
    let out = layout(&mut rng, &mut Blocks::new(18, 30), "abcd", &spec(false)).unwrap();
    for pair in out.boxes.windows(2) {
        assert!(pair[1].x > pair[0].x);
    }
    for b in &out.boxes {
        assert_eq!(b.y, 15.0);
        assert_eq!(b.height, 30.0);
        assert_eq!(b.width, 18.0);
    }
}

#[test]
fn first_offset_is_a_tenth_of_the_average_width() {
    // Without a leading blank the glyph sits at a tenth of the average width;
    // with one it is pushed past the blank.
    let mut rng = StdRng::seed_from_u64(4);
    let out = layout(&mut rng, &mut Blocks::new(40, 30), "x", &spec(false)).unwrap();
    let first = out.boxes[0].x;
    assert!(first == 4.0 || first >= 28.0);
}

#[test]
fn wide_text_is_scaled_back_into_the_canvas() {
    let mut rng = StdRng::seed_from_u64(5);
    let text = "ABCDEFGHIJ";
    let out = layout(&mut rng, &mut Blocks::new(40, 30), text, &spec(true)).unwrap();
    assert_eq!(out.image.dimensions(), (160, 60));
    assert_eq!(chars_of(&out.boxes), text);
    for b in &out.boxes {
        assert!(b.x >= 0.0);
        assert!(b.right() <= 160.0 + 1e-9);
        assert!(b.width < 40.0);
        assert_eq!(b.height, 30.0);
    }
    let ann = out.annotations.unwrap();
    assert_eq!(ann.image_with_boxes.dimensions(), (160, 60));
    assert!(ann.char_images.iter().all(|c| c.dimensions() == (160, 60)));
}

#[test]
fn tall_glyphs_are_fitted_to_the_canvas() {
    let mut rng = StdRng::seed_from_u64(6);
    let out = layout(&mut rng, &mut Blocks::new(30, 90), "Z", &spec(false)).unwrap();
    let b = out.boxes[0];
    assert_eq!(b.y, 0.0);
    assert_eq!(b.height, 60.0);
    assert_eq!(b.width, 20.0);
}

#[test]
fn empty_text_yields_plain_canvas() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut blocks = Blocks::new(20, 30);
    let out = layout(&mut rng, &mut blocks, "", &spec(true)).unwrap();
    assert!(out.boxes.is_empty());
    assert_eq!(blocks.calls, 0);
    assert_eq!(out.image.dimensions(), (160, 60));
    assert!(out.image.pixels().all(|p| *p == Rgb([250, 250, 250])));
    assert!(out.annotations.unwrap().char_images.is_empty());
}

#[test]
fn annotation_does_not_change_the_plain_image() {
    let plain = layout(
        &mut StdRng::seed_from_u64(8),
        &mut Blocks::new(25, 30),
        "q7",
        &spec(false),
    )
    .unwrap();
    let annotated = layout(
        &mut StdRng::seed_from_u64(8),
        &mut Blocks::new(25, 30),
        "q7",
        &spec(true),
    )
    .unwrap();
    assert_eq!(plain.image, annotated.image);
    assert_eq!(plain.boxes, annotated.boxes);
    assert!(plain.annotations.is_none());
}

#[test]
fn boxed_canvas_carries_red_outlines() {
    let mut rng = StdRng::seed_from_u64(9);
    let out = layout(&mut rng, &mut Blocks::new(20, 30), "k", &spec(true)).unwrap();
    let b = out.boxes[0];
    let ann = out.annotations.unwrap();
    let px = ann.image_with_boxes.get_pixel(b.x as u32, 30).0;
    assert!(px[0] > 200 && px[1] < 100 && px[2] < 100);
    assert_ne!(out.image.get_pixel(b.x as u32, 30).0, px);
}

#[test]
fn annotating_text_wider_than_the_rasterizer_limit_succeeds() {
    let wide = LayoutSpec {
        height: 20,
        ..spec(true)
    };
    let plain = layout(
        &mut StdRng::seed_from_u64(10),
        &mut Blocks::new(17_000, 10),
        "abcd",
        &LayoutSpec {
            annotate: false,
            ..wide
        },
    )
    .unwrap();
    let out = layout(
        &mut StdRng::seed_from_u64(10),
        &mut Blocks::new(17_000, 10),
        "abcd",
        &wide,
    )
    .unwrap();

    assert_eq!(out.image, plain.image);
    assert_eq!(chars_of(&out.boxes), "abcd");
    for b in &out.boxes {
        assert!(b.x >= 0.0 && b.right() <= 160.0 + 1e-9);
    }
    let ann = out.annotations.unwrap();
    assert_eq!(ann.image_with_boxes.dimensions(), (160, 20));
    assert_ne!(ann.image_with_boxes, out.image);
    assert_eq!(ann.char_images.len(), 4);
}

#[test]
fn only_the_space_character_goes_without_a_box() {
    let mut rng = StdRng::seed_from_u64(11);
    let out = layout(&mut rng, &mut Blocks::new(20, 30), "a\tb c", &spec(true)).unwrap();
    assert_eq!(chars_of(&out.boxes), "a\tbc");
    assert_eq!(out.annotations.unwrap().char_images.len(), 5);
}

#[test]
fn plain_layout_builds_no_annotations() {
    let mut rng = StdRng::seed_from_u64(12);
    let out = layout(&mut rng, &mut Blocks::new(20, 30), "xy", &spec(false)).unwrap();
    assert!(out.annotations.is_none());
    assert_eq!(chars_of(&out.boxes), "xy");
}

#[test]
fn outline_covers_all_four_box_edges() {
    let mut canvas = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
    let bbox = BoundingBox::new('o', 5.0, 6.0, 10.0, 12.0);
    draw_box(&mut canvas, &bbox).unwrap();
    let is_red = |x: u32, y: u32| {
        let [r, g, b] = canvas.get_pixel(x, y).0;
        r > 200 && g < 100 && b < 100
    };
    assert!(is_red(5, 10));
    assert!(is_red(15, 10));
    assert!(is_red(10, 6));
    assert!(is_red(10, 18));
    assert_eq!(*canvas.get_pixel(10, 10), Rgb([255, 255, 255]));
    assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
}
