//! Immutable preference version.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use yume_core::catalog::PLACEHOLDER_IMAGE;
use yume_core::Locale;

use crate::error::PrefsError;
use crate::template::{substitute, Replacements};

/// Preference keys.
pub mod keys {
    pub const LOCALE: &str = "locale";
    pub const DETAILS: &str = "details";
    pub const STATE: &str = "state";
    pub const REAL_WORLD_TEXT: &str = "real_world_text";
    pub const MINIGAME_TEXT: &str = "minigame_text";
    pub const LARGE_IMAGE: &str = "large_image";
    pub const LARGE_IMAGE_TEXT: &str = "large_image_text";
    pub const LARGE_IMAGE_URL: &str = "large_image_url";
    pub const SMALL_IMAGE: &str = "small_image";
    pub const SMALL_IMAGE_TEXT: &str = "small_image_text";
    pub const SMALL_IMAGE_URL: &str = "small_image_url";
}

/// Built-in values for keys missing from both documents.
const DEFAULTS: &[(&str, &str)] = &[
    (keys::LOCALE, "en"),
    (keys::DETAILS, "Playing {gametype}"),
    (keys::STATE, "In: {location}"),
    (keys::REAL_WORLD_TEXT, "Real World"),
    (keys::MINIGAME_TEXT, "Playing a minigame"),
    (keys::LARGE_IMAGE, "current_room"),
    (
        keys::LARGE_IMAGE_TEXT,
        "{playersonline} online, {playersonmap} on this map",
    ),
    (keys::LARGE_IMAGE_URL, PLACEHOLDER_IMAGE),
    (keys::SMALL_IMAGE, "badge"),
    (keys::SMALL_IMAGE_TEXT, "{gametype}"),
    (keys::SMALL_IMAGE_URL, PLACEHOLDER_IMAGE),
];

fn builtin_default(key: &str) -> Option<&'static str> {
    DEFAULTS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Where an image slot takes its picture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Image of the current room, looked up on its wiki page.
    CurrentRoom,
    /// The equipped badge.
    Badge,
    /// A user-provided URL.
    Custom,
}

impl FromStr for ImageSource {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "current_room" | "use_current_room" => Ok(Self::CurrentRoom),
            "badge" | "use_badge" => Ok(Self::Badge),
            "custom" | "custom_url" | "use_custom_url" => Ok(Self::Custom),
            other => Err(PrefsError::UnknownImageSource(other.to_string())),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentRoom => write!(f, "current_room"),
            Self::Badge => write!(f, "badge"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// The two image slots of a presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Large,
    Small,
}

impl ImageSlot {
    fn source_key(self) -> &'static str {
        match self {
            Self::Large => keys::LARGE_IMAGE,
            Self::Small => keys::SMALL_IMAGE,
        }
    }

    fn url_key(self) -> &'static str {
        match self {
            Self::Large => keys::LARGE_IMAGE_URL,
            Self::Small => keys::SMALL_IMAGE_URL,
        }
    }

    /// Key of this slot's caption template.
    pub fn caption_key(self) -> &'static str {
        match self {
            Self::Large => keys::LARGE_IMAGE_TEXT,
            Self::Small => keys::SMALL_IMAGE_TEXT,
        }
    }

    fn default_source(self) -> ImageSource {
        match self {
            Self::Large => ImageSource::CurrentRoom,
            Self::Small => ImageSource::Badge,
        }
    }
}

/// One complete version of the user's preferences.
///
/// Never mutated after construction; a save produces a new version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    general: BTreeMap<String, String>,
    presence: BTreeMap<String, String>,
}

impl Preferences {
    /// Preferences with no stored values (every key at its default).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the general and presence documents.
    pub fn from_documents(
        general: BTreeMap<String, String>,
        presence: BTreeMap<String, String>,
    ) -> Self {
        Self { general, presence }
    }

    /// Stored value of `key`. Presence values shadow general ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.presence
            .get(key)
            .or_else(|| self.general.get(key))
            .map(String::as_str)
    }

    /// Stored value, built-in default, or an empty string.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).or_else(|| builtin_default(key)).unwrap_or("")
    }

    /// Load the template named `key` and substitute its placeholders.
    pub fn resolve(&self, key: &str, replacements: &Replacements) -> String {
        substitute(self.value(key), replacements)
    }

    /// Configured display locale.
    pub fn locale(&self) -> Locale {
        Locale::from_code_or_default(self.value(keys::LOCALE))
    }

    /// Image source selected for a slot.
    pub fn image_source(&self, slot: ImageSlot) -> ImageSource {
        match self.value(slot.source_key()).parse() {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(error = %e, ?slot, "Invalid image source, using default");
                slot.default_source()
            }
        }
    }

    /// Custom image URL configured for a slot.
    pub fn custom_url(&self, slot: ImageSlot) -> &str {
        self.value(slot.url_key())
    }

    /// Values of the presence document.
    pub fn presence_values(&self) -> &BTreeMap<String, String> {
        &self.presence
    }
}
