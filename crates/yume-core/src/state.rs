//! Game state snapshot.
//!
//! A `GameState` is always replaced as a whole. Readers either see the
//! previous snapshot or the next one, never a mix of both.

/// One complete snapshot of the externally reported game state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Internal game identifier (e.g. "2kki"). `None` means the player is at
    /// the game-selection hub.
    pub game_identifier: Option<String>,
    /// Current map name. `None` or empty means the location is unknown.
    pub location: Option<String>,
    /// URL of the equipped badge image.
    pub badge_image_url: Option<String>,
    /// Players connected to the game.
    pub players_online: u32,
    /// Players on the current map.
    pub players_on_map: u32,
    /// Wiki page describing the current location, used for image lookup.
    pub reference_page_url: Option<String>,
}

impl GameState {
    /// Whether the player is at the hub (no game selected).
    pub fn is_at_hub(&self) -> bool {
        self.game_identifier.is_none()
    }

    /// Location name, or `None` when missing or blank.
    pub fn known_location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hub_with_no_players() {
        let state = GameState::default();
        assert!(state.is_at_hub());
        assert_eq!(state.players_online, 0);
        assert_eq!(state.players_on_map, 0);
        assert!(state.known_location().is_none());
    }

    #[test]
    fn test_blank_location_is_unknown() {
        let state = GameState {
            game_identifier: Some("2kki".to_string()),
            location: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!state.is_at_hub());
        assert!(state.known_location().is_none());
    }

    #[test]
    fn test_known_location_is_trimmed() {
        let state = GameState {
            location: Some(" Nexus ".to_string()),
            ..Default::default()
        };
        assert_eq!(state.known_location(), Some("Nexus"));
    }
}
