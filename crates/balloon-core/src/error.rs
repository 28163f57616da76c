//! Error types for balloon
//!
//! Only two kinds of failure ever leave the engine: a caller handed us
//! something unusable (empty text, a zero-sized canvas), or a collaborator
//! gave up (a font that will not parse, a pixmap that cannot be allocated).
//! Layout that merely turned out imperfect is reported through
//! [`FitMetadata`](crate::types::FitMetadata) flags, never through here.

use thiserror::Error;

pub type Result<T, E = BalloonError> = std::result::Result<T, E>;

/// Main error type for balloon
#[derive(Debug, Error)]
pub enum BalloonError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BalloonError {
    /// Shorthand for precondition failures
    pub fn invalid(msg: impl Into<String>) -> Self {
        BalloonError::InvalidInput(msg.into())
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("No face registered for family '{family}' (bold={bold})")]
    NotFound { family: String, bold: bool },
}

/// Rendering errors raised by drawing surfaces
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixmap allocation failed")]
    PixmapCreationFailed,

    #[error("Path construction failed")]
    PathBuildingFailed,

    #[error("Clip mask allocation failed")]
    MaskCreationFailed,

    #[error("Font data could not be parsed")]
    InvalidFont,

    #[error("No font provider attached to surface")]
    FontUnavailable,
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
