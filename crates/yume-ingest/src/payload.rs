//! Parsing of the JSON posted by the browser extension.
//!
//! The extension sends `{"data": {...}}`; older builds post the fields
//! directly. Both shapes are accepted. Unknown fields are ignored and
//! missing ones default to `None`/0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use yume_core::GameState;

use crate::error::{IngestError, IngestResult};

/// Fields posted by the browser extension.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestPayload {
    /// Game path segment; empty at the game-selection hub.
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub badge_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub players_online: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub players_on_map: u32,
    #[serde(default)]
    pub wiki_page_url: Option<String>,
}

impl IngestPayload {
    /// Convert into a normalized snapshot. Blank strings become `None`.
    pub fn into_game_state(self) -> GameState {
        GameState {
            game_identifier: non_blank(self.game_type),
            location: non_blank(self.location),
            badge_image_url: non_blank(self.badge_image_url),
            players_online: self.players_online,
            players_on_map: self.players_on_map,
            reference_page_url: non_blank(self.wiki_page_url),
        }
    }
}

/// Parse a request body into a game state snapshot.
pub fn parse_game_state(body: &[u8]) -> IngestResult<GameState> {
    let value: Value = serde_json::from_slice(body)?;
    let fields = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => return Err(IngestError::NotAnObject(json_kind(&other))),
            None => Value::Object(map),
        },
        other => return Err(IngestError::NotAnObject(json_kind(&other))),
    };
    let payload: IngestPayload = serde_json::from_value(fields)?;
    Ok(payload.into_game_state())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept counts as numbers or numeric strings. Anything else is 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let count = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
