//! Static game catalog.
//!
//! Display names for the game identifiers reported by the browser extension,
//! the special locations of Yume 2kki, and the fixed image URLs used when no
//! better image can be resolved.

/// Fallback image when no room/badge image can be resolved.
pub const PLACEHOLDER_IMAGE: &str = "https://i.imgur.com/TN8WK7E.png";

/// Image shown while the player is at the game-selection hub.
pub const HUB_IMAGE: &str = "https://i.imgur.com/de3xUvd.png";

/// Game identifier of Yume 2kki.
pub const YUME_2KKI: &str = "2kki";

/// (identifier, display name) pairs.
const GAME_NAMES: &[(&str, &str)] = &[
    ("2kki", "Yume 2kki"),
    ("yume", "Yume Nikki"),
    ("flow", ".flow"),
    ("unevendream", "Uneven Dream"),
    ("deepdreams", "Deep Dreams"),
    ("prayers", "Answered Prayers"),
    ("someday", "Someday"),
    ("amillusion", "Amillusion"),
    ("braingirl", "Braingirl"),
    ("muma", "Muma Rope"),
    ("genie", "Dream Genie"),
    ("mikan", "Mikan Muzou"),
    ("ultraviolet", "Ultra Violet"),
    ("sheawaits", "She Awaits"),
    ("oversomnia", "Oversomnia"),
    ("tsushin", "Yume Tsushin"),
    ("unaccomplished", "Unaccomplished"),
    ("nostalgic", "Nostalgic"),
];

/// Locations in Yume 2kki that are in the real world.
const REAL_WORLD_LOCATIONS: &[&str] = &[
    "Urotsuki's Room",
    "Urotsuki's Balcony",
    "Sound Room",
    "Old Sound Room",
];

/// Yume 2kki minigames played from the real world.
const MINIGAMES: &[&str] = &[
    "Plated Snow Country",
    "Red Blue Yellow (Mini Game B)",
    "Red Blue Yellow (Mini Game B) - EX Version",
    "↑v↑ (Wavy Up)",
    "Puzzle Game (Kura Puzzle)",
    "Gimmick Runner",
];

/// Map an internal game identifier to its display name.
///
/// Unknown identifiers are returned unchanged.
pub fn game_display_name(identifier: &str) -> &str {
    GAME_NAMES
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, name)| *name)
        .unwrap_or(identifier)
}

/// How a location should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Somewhere in the dream world.
    Dream,
    /// Real-world room of Yume 2kki.
    RealWorld,
    /// Real-world minigame of Yume 2kki.
    Minigame,
}

impl LocationKind {
    /// Classify a location of the given game.
    ///
    /// Only Yume 2kki has real-world locations and minigames.
    pub fn classify(game_identifier: &str, location: Option<&str>) -> Self {
        if game_identifier != YUME_2KKI {
            return Self::Dream;
        }
        match location {
            Some(loc) if REAL_WORLD_LOCATIONS.contains(&loc) => Self::RealWorld,
            Some(loc) if MINIGAMES.contains(&loc) => Self::Minigame,
            _ => Self::Dream,
        }
    }
}
