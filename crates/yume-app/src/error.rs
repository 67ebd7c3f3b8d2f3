//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CLIENT_ID is not set; it must hold the Discord application id")]
    MissingClientId,

    #[error("CLIENT_ID must be a positive integer, got {0:?}")]
    InvalidClientId(String),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] yume_ingest::IngestError),

    #[error("Presence error: {0}")]
    Presence(#[from] yume_presence::PresenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] yume_telemetry::TelemetryError),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type AppResult<T> = Result<T, AppError>;
