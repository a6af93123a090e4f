//! TOML-based application configuration.
//!
//! Stores the user's scheduling preferences:
//! - Pomodoro and break lengths, daily goal, preferred difficulty
//! - Working window
//! - Analytics reporting periods
//!
//! Configuration is stored at `~/.config/studyplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::preferences::{
    default_daily_goal_hours, default_long_break, default_pomodoro_length,
    default_preferred_difficulty, default_short_break, UserPreferences, WorkingWindow,
};

/// Scheduling preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_pomodoro_length")]
    pub pomodoro_length: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_daily_goal_hours")]
    pub daily_goal_hours: f64,
    #[serde(default = "default_preferred_difficulty")]
    pub preferred_difficulty: u8,
}

/// Reporting periods for analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Days of sessions fed to the pattern analyzer
    #[serde(default = "default_pattern_period_days")]
    pub pattern_period_days: u32,
    /// Days shown on the dashboard
    #[serde(default = "default_dashboard_period_days")]
    pub dashboard_period_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub window: WorkingWindow,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

// Default functions
fn default_pattern_period_days() -> u32 {
    30
}
fn default_dashboard_period_days() -> u32 {
    7
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        let prefs = UserPreferences::default();
        Self {
            pomodoro_length: prefs.pomodoro_length,
            short_break: prefs.short_break,
            long_break: prefs.long_break,
            daily_goal_hours: prefs.daily_goal_hours,
            preferred_difficulty: prefs.preferred_difficulty,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            pattern_period_days: default_pattern_period_days(),
            dashboard_period_days: default_dashboard_period_days(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the user config directory, writing the default file on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            return Self::load_from(&path);
        }

        let cfg = Self::default();
        cfg.save_to(&path)?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(cfg)
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Persist to the user config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, keeping the field's type.
    ///
    /// Changes are in memory only; call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for keys outside the schema and
    /// [`ConfigError::InvalidValue`] when the value does not parse or
    /// leaves the preferences invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated
            .user_preferences()
            .validate()
            .map_err(|e| invalid(e.to_string()))?;

        tracing::debug!(key, value, "configuration updated");
        *self = updated;
        Ok(())
    }

    /// Preference snapshot for the scheduler.
    pub fn user_preferences(&self) -> UserPreferences {
        let p = &self.preferences;
        UserPreferences {
            pomodoro_length: p.pomodoro_length,
            short_break: p.short_break,
            long_break: p.long_break,
            daily_goal_hours: p.daily_goal_hours,
            preferred_difficulty: p.preferred_difficulty,
            window: self.window,
        }
    }
}
