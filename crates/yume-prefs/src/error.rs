//! Preference error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preference document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown image source: {0}")]
    UnknownImageSource(String),
}

pub type PrefsResult<T> = Result<T, PrefsError>;
