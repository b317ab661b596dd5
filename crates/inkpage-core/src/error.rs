//! Error types for document operations.

use thiserror::Error;

/// Result type for document operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors raised by document and session operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Invalid operation on element {id}: {reason}")]
    InvalidOperation { id: String, reason: String },
    #[error("Elements of type '{0}' cannot be added directly")]
    NotAddable(&'static str),
    #[error("Document is still loading")]
    NotReady,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
