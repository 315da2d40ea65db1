//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Routine expansion horizon
//! - Category keys used by the contextual suggestion rules
//! - The UTC offset used for calendar-day reasoning
//!
//! Configuration is stored at `~/.config/planwise/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::LocalZone;
use crate::error::ConfigError;
use crate::routine::DEFAULT_HORIZON_MONTHS;
use crate::suggest::SuggestionRules;

/// Routine expansion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineConfig {
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
}

/// Time zone settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeConfig {
    /// Fixed offset from UTC in minutes; the machine's current offset when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/planwise/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub routine: RoutineConfig,
    #[serde(default)]
    pub suggestions: SuggestionRules,
    #[serde(default)]
    pub time: TimeConfig,
}

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            horizon_months: default_horizon_months(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn parse_leaf(existing: &Value, key: &str, value: &str) -> Result<Value, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let parsed = match existing {
            Value::Bool(_) => Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            Value::Number(_) => {
                if let Ok(n) = value.parse::<i64>() {
                    Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            Value::Array(_) => match serde_json::from_str::<Value>(value) {
                Ok(json @ Value::Array(_)) => json,
                _ => Value::Array(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| Value::String(s.to_string()))
                        .collect(),
                ),
            },
            Value::Object(_) => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
            // Unset optional: "none" clears, anything numeric sets it.
            Value::Null => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    Value::Null
                } else if let Ok(n) = value.parse::<i64>() {
                    Value::Number(n.into())
                } else {
                    Value::String(value.into())
                }
            }
            Value::String(_) => Value::String(value.into()),
        };
        Ok(parsed)
    }

    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;
                let new_value = Self::parse_leaf(existing, key, value)?;
                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location: `<data dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every leaf as `(dot.path, value)`, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
            match value {
                Value::Object(map) => {
                    for (name, child) in map {
                        let path = if prefix.is_empty() {
                            name.clone()
                        } else {
                            format!("{prefix}.{name}")
                        };
                        walk(&path, child, out);
                    }
                }
                Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Set a config value by dot-separated key, in memory. Call [`Config::save`]
    /// to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values that deserialize but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routine.horizon_months == 0 {
            return Err(ConfigError::InvalidValue {
                key: "routine.horizon_months".into(),
                message: "must be at least 1".into(),
            });
        }
        if let Some(minutes) = self.time.utc_offset_minutes {
            if LocalZone::from_offset_minutes(minutes).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: "time.utc_offset_minutes".into(),
                    message: format!("{minutes} is not a valid UTC offset"),
                });
            }
        }
        if self.suggestions.health_categories.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "suggestions.health_categories".into(),
                message: "needs at least one category".into(),
            });
        }
        Ok(())
    }

    /// The zone all calendar-day logic runs in.
    pub fn zone(&self) -> LocalZone {
        self.time
            .utc_offset_minutes
            .and_then(LocalZone::from_offset_minutes)
            .unwrap_or_else(LocalZone::system)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
