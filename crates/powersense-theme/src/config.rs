//! Controller configuration.
//!
//! Every literal of the visual-effect contract (storage key, class names,
//! theme colors) and both transition delays live here, defaulting to the
//! values the PowerSense stylesheets expect.
//!
//! Configs can be built fluently or loaded from YAML or JSON:
//!
//! ```rust
//! use powersense_theme::ThemeConfig;
//!
//! let config = ThemeConfig::from_yaml_str("transition_duration_ms: 150").unwrap();
//! assert_eq!(config.transition_duration_ms, 150);
//! assert_eq!(config.storage_key, "PowerSense-dark-mode");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::preference::ThemePreference;

pub const DEFAULT_STORAGE_KEY: &str = "PowerSense-dark-mode";
pub const DEFAULT_DARK_CLASS: &str = "dark-mode";
pub const DEFAULT_TRANSITION_CLASS: &str = "theme-transition";
pub const DEFAULT_DARK_THEME_COLOR: &str = "#377519";
pub const DEFAULT_LIGHT_THEME_COLOR: &str = "#61d222";
/// Delay between adding the transition marker and committing the new value.
pub const DEFAULT_COMMIT_DELAY_MS: u64 = 10;
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Client-local key holding the persisted override.
    pub storage_key: String,
    /// Class present on the root container while the preference is dark.
    pub dark_class: String,
    /// Class present on the root container while a transition runs.
    pub transition_class: String,
    pub dark_theme_color: String,
    pub light_theme_color: String,
    pub commit_delay_ms: u64,
    pub transition_duration_ms: u64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
            transition_class: DEFAULT_TRANSITION_CLASS.to_string(),
            dark_theme_color: DEFAULT_DARK_THEME_COLOR.to_string(),
            light_theme_color: DEFAULT_LIGHT_THEME_COLOR.to_string(),
            commit_delay_ms: DEFAULT_COMMIT_DELAY_MS,
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay_ms = duration_to_millis(delay);
        self
    }

    pub fn with_transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration_ms = duration_to_millis(duration);
        self
    }

    pub fn with_theme_colors(mut self, dark: impl Into<String>, light: impl Into<String>) -> Self {
        self.dark_theme_color = dark.into();
        self.light_theme_color = light.into();
        self
    }

    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// The theme-color meta content for a preference.
    pub fn theme_color(&self, pref: ThemePreference) -> &str {
        match pref {
            ThemePreference::Dark => &self.dark_theme_color,
            ThemePreference::Light => &self.light_theme_color,
        }
    }

    /// Parses and validates a YAML config. Missing fields take defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a default struct.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format by extension (`.json` is
    /// JSON, anything else is read as YAML).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_yaml_str(&source),
        }
    }

    /// Checks that every identifier is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(invalid("storage_key", "must not be empty"));
        }
        validate_class("dark_class", &self.dark_class)?;
        validate_class("transition_class", &self.transition_class)?;
        if self.dark_class == self.transition_class {
            return Err(invalid(
                "transition_class",
                "must differ from dark_class",
            ));
        }
        if self.dark_theme_color.trim().is_empty() {
            return Err(invalid("dark_theme_color", "must not be empty"));
        }
        if self.light_theme_color.trim().is_empty() {
            return Err(invalid("light_theme_color", "must not be empty"));
        }
        Ok(())
    }
}

fn validate_class(field: &'static str, class: &str) -> Result<(), ConfigError> {
    if class.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if class.chars().any(char::is_whitespace) {
        return Err(invalid(field, "must be a single class name"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
