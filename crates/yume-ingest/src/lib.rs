//! yume-ingest - local endpoint receiving game state from the browser.
//!
//! The browser extension posts the player's current game, map, badge and
//! player counts every few seconds. Each accepted post replaces the whole
//! [`GameStateStore`] snapshot; malformed posts are rejected and leave the
//! last good snapshot in place.
//!
//! ```text
//!  browser extension ──POST /receive_from_2kki──▶ axum router
//!                                                    │ parse + normalize
//!                                                    ▼
//!                                             GameStateStore ◀── presence loop
//! ```
//!
//! Routes:
//! - `POST /receive_from_2kki` → replace the game state
//! - `GET /status` → liveness probe for the extension popup
//! - `GET /metrics` → Prometheus text format

mod config;
mod error;
mod payload;
mod server;
mod state;

pub use config::IngestConfig;
pub use error::{IngestError, IngestResult};
pub use payload::{parse_game_state, IngestPayload};
pub use server::{create_router, run_server, serve};
pub use state::GameStateStore;
