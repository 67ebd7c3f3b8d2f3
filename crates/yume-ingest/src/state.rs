//! Shared game state.

use std::sync::Arc;

use parking_lot::RwLock;
use yume_core::GameState;

/// Latest game state reported by the browser.
///
/// Cloned into the ingestion server and the presence loop. Writers replace
/// the whole snapshot under a single lock, so readers never see a mix of
/// two updates.
#[derive(Debug, Clone, Default)]
pub struct GameStateStore {
    inner: Arc<RwLock<Option<Arc<GameState>>>>,
}

impl GameStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot.
    pub fn write(&self, state: GameState) {
        *self.inner.write() = Some(Arc::new(state));
    }

    /// Latest snapshot, or `None` before the first write.
    pub fn read(&self) -> Option<Arc<GameState>> {
        self.inner.read().clone()
    }

    /// Whether any snapshot has been written yet.
    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(location: &str, online: u32) -> GameState {
        GameState {
            game_identifier: Some("2kki".to_string()),
            location: Some(location.to_string()),
            players_online: online,
            players_on_map: online,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_before_first_write() {
        let store = GameStateStore::new();
        assert!(store.read().is_none());
        assert!(!store.is_ready());
    }

    #[test]
    fn test_write_replaces_whole_snapshot() {
        let store = GameStateStore::new();
        store.write(GameState {
            badge_image_url: Some("http://x/badge.png".to_string()),
            ..state("Nexus", 3)
        });
        store.write(state("Sound Room", 1));

        let latest = store.read().unwrap();
        assert_eq!(latest.location.as_deref(), Some("Sound Room"));
        assert_eq!(latest.players_online, 1);
        assert!(latest.badge_image_url.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = GameStateStore::new();
        let writer = store.clone();
        writer.write(state("Nexus", 2));
        assert!(store.is_ready());
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        let store = GameStateStore::new();
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        store.write(state(&format!("map-{i}"), i));
                        let seen = store.read().unwrap();
                        let expected = format!("map-{}", seen.players_online);
                        assert_eq!(seen.location.as_deref(), Some(expected.as_str()));
                        assert_eq!(seen.players_online, seen.players_on_map);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
