//! Error types for yume-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
