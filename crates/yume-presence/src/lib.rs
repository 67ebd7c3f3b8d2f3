//! yume-presence - turns game state into a social client presence.
//!
//! - [`PresenceClient`]: connect / update / clear / close capability,
//!   implemented by [`DiscordClient`] and the recording
//!   [`MockPresenceClient`]
//! - [`ImageLookup`] / [`ImageResolver`]: room, badge and custom images with
//!   placeholder fallback
//! - [`PresenceTranslator`]: game state + preferences → [`PresencePayload`]
//! - [`PresenceUpdateLoop`]: connect-retry, periodic translate/diff/push,
//!   graceful shutdown
//!
//! [`PresencePayload`]: yume_core::PresencePayload

pub mod client;
pub mod discord;
pub mod error;
pub mod image;
pub mod lookup;
pub mod translator;
pub mod update_loop;

pub use client::{BoxFuture, ClientCall, MockPresenceClient, PresenceClient};
pub use discord::DiscordClient;
pub use error::{PresenceError, PresenceResult};
pub use image::{ImageResolver, DEFAULT_LOOKUP_TIMEOUT};
pub use lookup::{extract_image, ImageLookup, WikiImageLookup};
pub use translator::PresenceTranslator;
pub use update_loop::{LoopConfig, LoopOutcome, LoopState, PresenceUpdateLoop, RetryPolicy};
