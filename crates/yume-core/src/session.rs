//! Session start timestamp.

use chrono::Utc;

/// Session start time, fixed at process start.
///
/// Owned by the update loop, which may reset it when the player returns to
/// the hub. Translation only ever reads the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    started_at: i64,
}

impl SessionClock {
    /// Start a clock at the current time.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now().timestamp(),
        }
    }

    /// Start a clock at a fixed Unix timestamp (seconds).
    pub fn starting_at(started_at: i64) -> Self {
        Self { started_at }
    }

    /// Session start in Unix seconds.
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    /// Restart the session at the current time.
    pub fn reset(&mut self) {
        self.started_at = Utc::now().timestamp();
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_start() {
        let clock = SessionClock::starting_at(1_700_000_000);
        assert_eq!(clock.started_at(), 1_700_000_000);
    }

    #[test]
    fn test_reset_moves_forward() {
        let mut clock = SessionClock::starting_at(0);
        clock.reset();
        assert!(clock.started_at() > 0);
    }
}
