/// Convenience result type used across the crate.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    /// Invalid user-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font files that cannot be read or contain no usable face.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while rasterizing glyphs or compositing surfaces.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding a finished image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Failures writing to the output destination.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptchaError {
    /// Build a [`CaptchaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptchaError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`CaptchaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CaptchaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
