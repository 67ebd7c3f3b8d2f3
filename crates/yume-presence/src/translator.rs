//! Game state → presence payload.

use yume_core::catalog::HUB_IMAGE;
use yume_core::{
    format_player_count, game_display_name, GameState, LocaleStrings, LocationKind,
    PresencePayload,
};
use yume_prefs::{keys, ImageSlot, Preferences, Replacements};

use crate::image::ImageResolver;

/// Maps a game state snapshot and a preference version to a payload.
///
/// Reads its inputs only; the session start is passed in by the caller.
/// Apart from room image lookups the result depends on nothing else, so two
/// calls with the same inputs give equal payloads.
pub struct PresenceTranslator {
    images: ImageResolver,
}

impl PresenceTranslator {
    pub fn new(images: ImageResolver) -> Self {
        Self { images }
    }

    /// Build the payload for `snapshot` (`None` before the first report).
    pub async fn translate(
        &self,
        snapshot: Option<&GameState>,
        prefs: &Preferences,
        session_start: i64,
    ) -> PresencePayload {
        let locale = prefs.locale();
        let strings = locale.strings();

        let Some(state) = snapshot else {
            return PresencePayload::loading(strings.loading, session_start);
        };
        let Some(game) = state.game_identifier.as_deref() else {
            return hub_payload(strings, session_start);
        };

        let location = state.known_location();
        let mut replacements = Replacements::new();
        replacements.insert(
            "location".to_string(),
            location.unwrap_or(strings.unknown_location).to_string(),
        );
        replacements.insert(
            "playersonline".to_string(),
            format_player_count(state.players_online, locale),
        );
        replacements.insert(
            "playersonmap".to_string(),
            format_player_count(state.players_on_map, locale),
        );
        replacements.insert("gametype".to_string(), game_display_name(game).to_string());

        let kind = LocationKind::classify(game, location);
        let details_key = match kind {
            LocationKind::Dream => keys::DETAILS,
            LocationKind::RealWorld | LocationKind::Minigame => keys::REAL_WORLD_TEXT,
        };
        let state_key = match kind {
            LocationKind::Minigame => keys::MINIGAME_TEXT,
            LocationKind::Dream | LocationKind::RealWorld => keys::STATE,
        };

        let large_image = self.slot_image(ImageSlot::Large, state, prefs).await;
        let small_image = self.slot_image(ImageSlot::Small, state, prefs).await;

        PresencePayload {
            details: prefs.resolve(details_key, &replacements),
            state: prefs.resolve(state_key, &replacements),
            large_image,
            large_image_caption: prefs.resolve(ImageSlot::Large.caption_key(), &replacements),
            small_image,
            small_image_caption: prefs.resolve(ImageSlot::Small.caption_key(), &replacements),
            session_start,
        }
    }

    async fn slot_image(&self, slot: ImageSlot, state: &GameState, prefs: &Preferences) -> String {
        self.images
            .resolve(
                prefs.image_source(slot),
                state.reference_page_url.as_deref(),
                state.badge_image_url.as_deref(),
                prefs.custom_url(slot),
            )
            .await
    }
}

/// Fixed payload while no game is selected.
fn hub_payload(strings: &LocaleStrings, session_start: i64) -> PresencePayload {
    PresencePayload {
        details: strings.hub_details.to_string(),
        state: strings.hub_state.to_string(),
        large_image: HUB_IMAGE.to_string(),
        large_image_caption: strings.hub_caption.to_string(),
        small_image: String::new(),
        small_image_caption: String::new(),
        session_start,
    }
}
