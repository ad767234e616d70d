//! The dark/light preference value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePreferenceError;

/// The user's color preference for the site.
///
/// Serializes as a JSON boolean (`true` is dark), which is also the format
/// persisted to preference storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Maps a "prefers dark" flag to a preference.
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemePreference::Dark)
    }

    /// Returns the opposite preference.
    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Encodes the preference the way it is persisted: `"true"` or `"false"`.
    pub fn to_json(self) -> String {
        serde_json::Value::Bool(self.is_dark()).to_string()
    }

    /// Decodes a persisted value.
    ///
    /// Only a JSON boolean is accepted; anything else (empty strings, numbers,
    /// quoted strings, garbage) yields `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str::<bool>(raw.trim())
            .ok()
            .map(Self::from_dark)
    }
}

impl From<bool> for ThemePreference {
    fn from(dark: bool) -> Self {
        Self::from_dark(dark)
    }
}

impl From<ThemePreference> for bool {
    fn from(pref: ThemePreference) -> Self {
        pref.is_dark()
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" | "true" | "on" => Ok(ThemePreference::Dark),
            "light" | "false" | "off" => Ok(ThemePreference::Light),
            _ => Err(ParsePreferenceError(s.to_string())),
        }
    }
}
