use std::{io::Cursor, path::Path};

use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Container format for encoded images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }

    /// Guess the format from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Format implied by `path`'s extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Encode `img` into an in-memory byte stream.
pub fn encode_image(img: &RgbImage, format: OutputFormat) -> CaptchaResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut out, format.image_format())
        .map_err(|e| CaptchaError::encode(format!("{}: {e}", format.extension())))?;
    Ok(out.into_inner())
}

/// Encode `img` and write it to `path`. The file is only created once encoding
/// has succeeded.
pub fn write_image(img: &RgbImage, path: &Path, format: OutputFormat) -> CaptchaResult<()> {
    let bytes = encode_image(img, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/encode.rs"]
mod tests;
