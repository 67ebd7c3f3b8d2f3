//! User-editable presence preferences.
//!
//! Two flat TOML documents live in the preference directory:
//! - `preferences.toml`: general settings (locale, real-world texts)
//! - `presence.toml`: presence templates and image selectors
//!
//! `PreferenceStore` hands out immutable `Preferences` versions, reloading
//! only when a document changes on disk. Any I/O or parse failure degrades
//! to built-in defaults instead of failing resolution.

pub mod error;
pub mod preferences;
pub mod store;
pub mod template;

pub use error::{PrefsError, PrefsResult};
pub use preferences::{keys, ImageSlot, ImageSource, Preferences};
pub use store::{PreferenceStore, PREFERENCES_FILE, PRESENCE_FILE};
pub use template::{substitute, Replacements};
