//! Error types for lumen_page

use lumen_core::CoreError;
use thiserror::Error;

/// Errors that can occur while setting up a page session
#[derive(Error, Debug)]
pub enum PageError {
    /// Configuration file is not valid TOML or has wrongly typed fields
    #[error("Configuration parse failed: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document query failed (usually a malformed selector in the configuration)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for lumen_page operations
pub type Result<T> = std::result::Result<T, PageError>;
