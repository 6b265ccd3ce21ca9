//! Distorted-text CAPTCHA image synthesis.
//!
//! Given a character string, the generator renders every character with a
//! randomly chosen font face, rotates and warps it, lays the glyphs out left
//! to right with jittered spacing and random blanks, and finally draws noise
//! over the canvas. Detailed generation also returns one bounding box per
//! character, a copy of the canvas with the boxes outlined, and an isolated
//! image per character, which makes the output usable as OCR training data.
//!
//! # Pipeline overview
//!
//! 1. **Colors**: a near-white background and a darker, translucent ink.
//! 2. **Glyphs**: measure, draw, crop, rotate, warp (`parley` + `vello_cpu`).
//! 3. **Layout**: composite glyphs through a luminance mask, track boxes, and
//!    scale the canvas back to the configured width when the text overflows.
//! 4. **Noise**: one arc, a handful of speckles, then a smoothing pass.
//! 5. **Encode** (optional): PNG, JPEG or BMP through `image`.
//!
//! ```no_run
//! use captcha_synth::{CaptchaConfig, ImageCaptcha};
//!
//! let mut captcha = ImageCaptcha::new(CaptchaConfig::default())?;
//! let png = captcha.generate("1234")?;
//! let detail = captcha.generate_with_detail("1234")?;
//! assert_eq!(detail.boxes.len(), 4);
//! # let _ = png;
//! # Ok::<(), captcha_synth::CaptchaError>(())
//! ```
#![forbid(unsafe_code)]

mod color;
mod foundation;
mod glyph;
mod layout;
mod noise;
mod pipeline;
mod raster;

pub use color::sampler::{background_color, foreground_color, random_color};
pub use foundation::core::{BoundingBox, Rgba8};
pub use foundation::error::{CaptchaError, CaptchaResult};
pub use glyph::fonts::{BUNDLED_FONT, DEFAULT_FONT_SIZES, FontFace, FontSet};
pub use glyph::render::{Glyph, GlyphRenderer, GlyphSource};
pub use glyph::text::TextRasterizer;
pub use layout::engine::{Annotations, Composited, LayoutSpec, layout};
pub use noise::injector::add_noise;
pub use pipeline::config::{CaptchaConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use pipeline::encode::{OutputFormat, encode_image, write_image};
pub use pipeline::generator::{CaptchaImage, Detail, DetailedCaptcha, ImageCaptcha};
