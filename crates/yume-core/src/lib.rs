//! Core domain types for the dream-game rich presence bridge.
//!
//! This crate provides the values shared by the ingestion server and the
//! presence update loop:
//! - `GameState`: one complete snapshot of what the browser reported
//! - `PresencePayload`: the formatted status pushed to the social client
//! - `SessionClock`: process-level session start timestamp
//! - `catalog`: game display names and fixed image locations
//! - `locale`: localized strings and player-count pluralization

pub mod catalog;
pub mod error;
pub mod locale;
pub mod payload;
pub mod session;
pub mod state;

pub use catalog::{game_display_name, LocationKind};
pub use error::{CoreError, Result};
pub use locale::{format_player_count, Locale, LocaleStrings};
pub use payload::PresencePayload;
pub use session::SessionClock;
pub use state::GameState;
