//! Prometheus metrics and structured logging for the presence bridge.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for pushes, connection attempts, ingestion and
//!   image lookups

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
