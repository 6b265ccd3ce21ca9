use std::{path::Path, sync::Arc};

use image::RgbImage;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    color::sampler::{background_color, foreground_color},
    foundation::{
        core::BoundingBox,
        error::{CaptchaError, CaptchaResult},
    },
    glyph::{fonts::FontSet, render::GlyphRenderer, text::TextRasterizer},
    layout::engine::{Annotations, Composited, LayoutSpec, layout},
    noise::injector::add_noise,
    pipeline::{
        config::CaptchaConfig,
        encode::{OutputFormat, encode_image, write_image},
    },
};

/// How much of a generation pass to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Detail {
    /// Only the final image.
    #[default]
    Simple,
    /// Final image plus boxed image, per-character images and boxes.
    Full,
}

/// Everything produced by one detailed generation pass.
#[derive(Clone, Debug)]
pub struct DetailedCaptcha {
    /// The image a challenge would show.
    pub image: RgbImage,
    /// Same glyphs with a red outline around every box, noised separately.
    pub image_with_boxes: RgbImage,
    /// One image per input character, holding only that glyph on white.
    pub char_images: Vec<RgbImage>,
    /// One box per input character other than `' '`, in input order.
    pub boxes: Vec<BoundingBox>,
}

/// Result of [`ImageCaptcha::generate_image`].
#[derive(Clone, Debug)]
pub enum CaptchaImage {
    Simple(RgbImage),
    Detailed(DetailedCaptcha),
}

impl CaptchaImage {
    /// The final image, whichever shape was requested.
    pub fn image(&self) -> &RgbImage {
        match self {
            Self::Simple(image) => image,
            Self::Detailed(detail) => &detail.image,
        }
    }

    pub fn into_image(self) -> RgbImage {
        match self {
            Self::Simple(image) => image,
            Self::Detailed(detail) => detail.image,
        }
    }
}

/// CAPTCHA generator.
///
/// Owns its random source and a lazily loaded [`FontSet`]. One generator is
/// not meant to be shared across threads; build one per worker instead.
pub struct ImageCaptcha<R: Rng = StdRng> {
    config: CaptchaConfig,
    rng: R,
    fonts: Option<Arc<FontSet>>,
    text: TextRasterizer,
}

impl ImageCaptcha<StdRng> {
    /// Build a generator seeded from `config.seed`, or from the OS when unset.
    pub fn new(config: CaptchaConfig) -> CaptchaResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> ImageCaptcha<R> {
    /// Build a generator drawing every random choice from `rng`.
    pub fn with_rng(config: CaptchaConfig, rng: R) -> CaptchaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            fonts: None,
            text: TextRasterizer::new(),
        })
    }

    /// Use an already loaded font set instead of `config.fonts`.
    pub fn with_font_set(mut self, fonts: Arc<FontSet>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn config(&self) -> &CaptchaConfig {
        &self.config
    }

    /// The font set, loaded on first use and kept for the generator's
    /// lifetime. A failed load is not cached.
    pub fn font_set(&mut self) -> CaptchaResult<Arc<FontSet>> {
        if let Some(fonts) = &self.fonts {
            return Ok(Arc::clone(fonts));
        }
        let fonts = Arc::new(FontSet::load(&self.config.fonts, &self.config.font_sizes)?);
        self.fonts = Some(Arc::clone(&fonts));
        Ok(fonts)
    }

    /// Encode the final image of `text` in the configured format.
    pub fn generate(&mut self, text: &str) -> CaptchaResult<Vec<u8>> {
        self.generate_with_format(text, self.config.format)
    }

    pub fn generate_with_format(
        &mut self,
        text: &str,
        format: OutputFormat,
    ) -> CaptchaResult<Vec<u8>> {
        let image = self.generate_image(text, Detail::Simple)?.into_image();
        encode_image(&image, format)
    }

    /// Write the final image of `text` to `path` in the configured format.
    pub fn write(&mut self, text: &str, path: impl AsRef<Path>) -> CaptchaResult<()> {
        self.write_with_format(text, path, self.config.format)
    }

    pub fn write_with_format(
        &mut self,
        text: &str,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> CaptchaResult<()> {
        let image = self.generate_image(text, Detail::Simple)?.into_image();
        write_image(&image, path.as_ref(), format)
    }

    /// Generate the final image together with its training by-products.
    pub fn generate_with_detail(&mut self, text: &str) -> CaptchaResult<DetailedCaptcha> {
        let Composited {
            image,
            boxes,
            annotations,
        } = self.compose(text, Detail::Full)?;
        let Annotations {
            image_with_boxes,
            char_images,
        } = annotations.ok_or_else(|| CaptchaError::render("layout produced no annotations"))?;
        Ok(DetailedCaptcha {
            image,
            image_with_boxes,
            char_images,
            boxes,
        })
    }

    /// Run one generation pass and return the requested shape.
    pub fn generate_image(&mut self, text: &str, detail: Detail) -> CaptchaResult<CaptchaImage> {
        match detail {
            Detail::Simple => Ok(CaptchaImage::Simple(self.compose(text, detail)?.image)),
            Detail::Full => self.generate_with_detail(text).map(CaptchaImage::Detailed),
        }
    }

    /// Colors, layout, then noise. The final image consumes the same random
    /// draws for both shapes; the boxed image is noised afterwards.
    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    fn compose(&mut self, text: &str, detail: Detail) -> CaptchaResult<Composited> {
        let fonts = self.font_set()?;
        let background = background_color(&mut self.rng);
        let color = foreground_color(&mut self.rng);

        let spec = LayoutSpec {
            width: self.config.width,
            height: self.config.height,
            color,
            background,
            annotate: detail == Detail::Full,
        };
        let mut renderer = GlyphRenderer::new(&mut self.text, &fonts);
        let mut composited = layout(&mut self.rng, &mut renderer, text, &spec)?;

        add_noise(&mut self.rng, &mut composited.image, color)?;
        if let Some(ann) = composited.annotations.as_mut() {
            add_noise(&mut self.rng, &mut ann.image_with_boxes, color)?;
        }
        tracing::debug!(boxes = composited.boxes.len(), "captcha composed");
        Ok(composited)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generator.rs"]
mod tests;
