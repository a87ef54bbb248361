//! Error types for SnapEdit.

use thiserror::Error;

/// Main error type for SnapEdit operations.
#[derive(Error, Debug)]
pub enum SnapEditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Overlay catalog is empty")]
    EmptyCatalog,

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for SnapEdit operations.
pub type Result<T> = std::result::Result<T, SnapEditError>;
