//! `{name}` placeholder substitution.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder name → replacement text.
pub type Replacements = HashMap<String, String>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Replace every `{name}` in `template` with its value from `replacements`.
///
/// Placeholders without a replacement are left verbatim. Replacement text is
/// not scanned again, so values containing braces are inserted as-is.
pub fn substitute(template: &str, replacements: &Replacements) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            replacements
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
