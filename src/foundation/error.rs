/// Convenience result type used across lanyard.
pub type LanyardResult<T> = Result<T, LanyardError>;

/// Errors raised while loading assets or compositing a card texture.
///
/// Token decoding has its own error type ([`crate::DecodeError`]) because a bad token is an
/// expected, recoverable condition rather than a rendering failure.
#[derive(thiserror::Error, Debug)]
pub enum LanyardError {
    /// No drawing surface could be acquired; nothing was delivered to the caller.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// An asset (icon, font, style file) could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// User-supplied configuration is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// The finished raster could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Catch-all for contextual errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LanyardError {
    /// Build a [`LanyardError::RenderSurfaceUnavailable`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::RenderSurfaceUnavailable(msg.into())
    }

    /// Build a [`LanyardError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`LanyardError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LanyardError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
