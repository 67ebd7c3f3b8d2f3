//! Dream-game rich presence bridge.
//!
//! Wires the components together:
//! - local ingestion server receiving game state from the browser extension
//! - preference store shared with the settings editor
//! - presence update loop pushing to Discord

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{client_id_from_env, parse_client_id, AppConfig, ConfigSource, CLIENT_ID_ENV};
pub use error::{AppError, AppResult};
