//! Core error types

use thiserror::Error;

/// Errors raised by the document model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Selector text could not be parsed
    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),

    /// Element id does not refer to a live element
    #[error("Unknown element")]
    UnknownElement,

    /// Color text could not be parsed
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
