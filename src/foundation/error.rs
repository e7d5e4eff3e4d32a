/// Result alias used across the crate.
pub type StickerResult<T> = Result<T, StickerError>;

/// Error taxonomy for rendering, export, and usage gating.
#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    /// Invalid input (sizes, indices, malformed values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Key/value persistence failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Avatar bytes or data URL could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Drawing surface failed or is unavailable.
    #[error("render error: {0}")]
    Render(String),

    /// PNG/ZIP encoding or file delivery failed.
    #[error("export error: {0}")]
    Export(String),

    /// No usable font could be resolved.
    #[error("font error: {0}")]
    Font(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickerError {
    /// Build a [`StickerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StickerError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`StickerError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`StickerError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StickerError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`StickerError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }
}

impl From<std::io::Error> for StickerError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(err))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
