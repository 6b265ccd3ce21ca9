use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use rand::Rng;

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// DejaVu Sans Mono, used when no font files are configured.
pub static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Font sizes used when none are configured.
pub const DEFAULT_FONT_SIZES: [f32; 3] = [42.0, 50.0, 56.0];

/// One usable `(font file, size)` pairing.
#[derive(Clone)]
pub struct FontFace {
    source: usize,
    family: Arc<str>,
    size_px: f32,
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Index of the font file this face was loaded from.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Primary family name declared by the font file.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    pub(crate) fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    pub(crate) fn cpu_font(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

/// Immutable set of font faces shared by every generation of a generator.
#[derive(Clone, Debug)]
pub struct FontSet {
    faces: Vec<FontFace>,
    sources: Vec<String>,
}

impl FontSet {
    /// Load every font file and pair it with every size.
    ///
    /// An empty `paths` slice selects the bundled font. Any unreadable file,
    /// or one without a usable family, fails the whole load.
    #[tracing::instrument(skip_all, fields(fonts = paths.len(), sizes = sizes.len()))]
    pub fn load(paths: &[PathBuf], sizes: &[f32]) -> CaptchaResult<Self> {
        if paths.is_empty() {
            return Self::from_bytes(&[("bundled", BUNDLED_FONT.to_vec())], sizes);
        }
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push((path.display().to_string(), read_font(path)?));
        }
        Self::from_bytes(&sources, sizes)
    }

    /// Build from in-memory font files, each labelled for diagnostics.
    pub fn from_bytes<S: AsRef<str>>(
        fonts: &[(S, Vec<u8>)],
        sizes: &[f32],
    ) -> CaptchaResult<Self> {
        validate_sizes(sizes)?;
        if fonts.is_empty() {
            return Err(CaptchaError::font("font set needs at least one font"));
        }

        let mut probe = parley::FontContext::default();
        let mut faces = Vec::with_capacity(fonts.len() * sizes.len());
        let mut sources = Vec::with_capacity(fonts.len());
        for (source, (label, bytes)) in fonts.iter().enumerate() {
            let label = label.as_ref();
            let family: Arc<str> = primary_family(&mut probe, bytes)
                .ok_or_else(|| CaptchaError::font(format!("no usable font family in '{label}'")))?
                .into();
            let bytes = Arc::new(bytes.clone());
            let data = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                0,
            );
            for &size_px in sizes {
                faces.push(FontFace {
                    source,
                    family: Arc::clone(&family),
                    size_px,
                    bytes: Arc::clone(&bytes),
                    data: data.clone(),
                });
            }
            tracing::debug!(label, family = %family, "font loaded");
            sources.push(label.to_string());
        }

        Ok(Self { faces, sources })
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Labels of the loaded font files, in load order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Pick a face uniformly at random, returning its index and the face.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> CaptchaResult<(usize, &FontFace)> {
        if self.faces.is_empty() {
            return Err(CaptchaError::font("font set is empty"));
        }
        let idx = rng.random_range(0..self.faces.len());
        Ok((idx, &self.faces[idx]))
    }
}

fn read_font(path: &Path) -> CaptchaResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| CaptchaError::font(format!("read font '{}': {e}", path.display())))
}

pub(crate) fn validate_sizes(sizes: &[f32]) -> CaptchaResult<()> {
    if sizes.is_empty() {
        return Err(CaptchaError::validation("at least one font size is required"));
    }
    if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s <= 0.0) {
        return Err(CaptchaError::validation(format!(
            "font sizes must be finite and > 0 (got {bad})"
        )));
    }
    Ok(())
}

pub(crate) fn primary_family(ctx: &mut parley::FontContext, bytes: &[u8]) -> Option<String> {
    let families = ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let (family_id, _) = families.first()?;
    ctx.collection
        .family_name(*family_id)
        .map(|name| name.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/fonts.rs"]
mod tests;
