//! Presence payload pushed to the social client.

/// Formatted presence, rebuilt every update cycle.
///
/// Compared by full structural equality to decide whether a push is needed.
/// Empty strings mean "not shown" and are omitted by the client backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresencePayload {
    /// First line of the activity.
    pub details: String,
    /// Second line of the activity.
    pub state: String,
    /// Large image URL.
    pub large_image: String,
    /// Tooltip of the large image.
    pub large_image_caption: String,
    /// Small image URL.
    pub small_image: String,
    /// Tooltip of the small image.
    pub small_image_caption: String,
    /// Session start (Unix seconds).
    pub session_start: i64,
}

impl PresencePayload {
    /// Payload shown before the first game state has been received.
    pub fn loading(state_text: impl Into<String>, session_start: i64) -> Self {
        Self {
            state: state_text.into(),
            session_start,
            ..Default::default()
        }
    }

    /// Whether the payload carries any image.
    pub fn has_images(&self) -> bool {
        !self.large_image.is_empty() || !self.small_image.is_empty()
    }
}
