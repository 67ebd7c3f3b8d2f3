//! Localized strings and pluralization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Brazilian Portuguese.
    PtBr,
}

impl Locale {
    /// Parse a locale code, falling back to English for unknown codes.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Strings for this locale.
    pub fn strings(self) -> &'static LocaleStrings {
        match self {
            Self::En => &EN,
            Self::PtBr => &PT_BR,
        }
    }

    /// Locale code as stored in the preference file.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::PtBr => "pt_br",
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "en" | "en_us" | "english" => Ok(Self::En),
            "pt_br" | "pt" | "portuguese" => Ok(Self::PtBr),
            other => Err(CoreError::UnknownLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixed texts used by the presence translator.
#[derive(Debug)]
pub struct LocaleStrings {
    /// Shown when the location is missing.
    pub unknown_location: &'static str,
    /// Player noun for a count of one.
    pub player_singular: &'static str,
    /// Player noun for every other count, including zero.
    pub player_plural: &'static str,
    /// State text before the first game state arrives.
    pub loading: &'static str,
    /// Details text while at the hub.
    pub hub_details: &'static str,
    /// State text while at the hub.
    pub hub_state: &'static str,
    /// Large image caption while at the hub.
    pub hub_caption: &'static str,
}

static EN: LocaleStrings = LocaleStrings {
    unknown_location: "Unknown Location",
    player_singular: "Player",
    player_plural: "Players",
    loading: "Getting ready...",
    hub_details: "Picking a game",
    hub_state: "At the game selection screen",
    hub_caption: "YNOproject",
};

static PT_BR: LocaleStrings = LocaleStrings {
    unknown_location: "Local Desconhecido",
    player_singular: "Jogador",
    player_plural: "Jogadores",
    loading: "Preparando...",
    hub_details: "Escolhendo um jogo",
    hub_state: "Na tela de seleção de jogos",
    hub_caption: "YNOproject",
};

/// Render a player count with its noun, e.g. "1 Player" or "0 Players".
pub fn format_player_count(count: u32, locale: Locale) -> String {
    let strings = locale.strings();
    let noun = if count == 1 {
        strings.player_singular
    } else {
        strings.player_plural
    };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_count_english() {
        assert_eq!(format_player_count(1, Locale::En), "1 Player");
        assert_eq!(format_player_count(0, Locale::En), "0 Players");
        assert_eq!(format_player_count(2, Locale::En), "2 Players");
    }

    #[test]
    fn test_player_count_portuguese() {
        assert_eq!(format_player_count(1, Locale::PtBr), "1 Jogador");
        assert_eq!(format_player_count(7, Locale::PtBr), "7 Jogadores");
    }

    #[test]
    fn test_parse_locale_codes() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("pt_br".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("PT-BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert!("xx".parse::<Locale>().is_err());
    }

    #[test]
    fn test_unknown_code_falls_back_to_english() {
        assert_eq!(Locale::from_code_or_default("klingon"), Locale::En);
    }

    #[test]
    fn test_serde_uses_snake_case_codes() {
        let json = serde_json::to_string(&Locale::PtBr).unwrap();
        assert_eq!(json, "\"pt_br\"");
    }
}
