use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{CaptchaError, CaptchaResult},
    glyph::fonts::{DEFAULT_FONT_SIZES, validate_sizes},
    pipeline::encode::OutputFormat,
};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 160;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 60;

/// Generator configuration.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptchaConfig {
    /// Output canvas width.
    pub width: u32,
    /// Output canvas height.
    pub height: u32,
    /// Font files to draw glyphs from. Empty selects the bundled font.
    pub fonts: Vec<PathBuf>,
    /// Pixel sizes; every font is loaded at every size.
    pub font_sizes: Vec<f32>,
    /// Encoding used by `generate` and `write`.
    pub format: OutputFormat,
    /// Fixed seed for reproducible output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fonts: Vec::new(),
            font_sizes: DEFAULT_FONT_SIZES.to_vec(),
            format: OutputFormat::default(),
            seed: None,
        }
    }
}

impl CaptchaConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> CaptchaResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| CaptchaError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CaptchaResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CaptchaError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> CaptchaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CaptchaError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check dimensions against the rasterizer limits and the font sizes.
    pub fn validate(&self) -> CaptchaResult<()> {
        let max = u32::from(u16::MAX);
        if self.width == 0 || self.height == 0 {
            return Err(CaptchaError::validation("width/height must be > 0"));
        }
        if self.width > max || self.height > max {
            return Err(CaptchaError::validation(format!(
                "width/height must be <= {max}"
            )));
        }
        validate_sizes(&self.font_sizes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
