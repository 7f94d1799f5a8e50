//! TOML-based timeline configuration.
//!
//! Stores:
//! - Grid dimensions (hour height, minimum block height, snap slots)
//! - Gesture tuning (minimum duration, resize snapping, click suppression)
//! - Week shape (first weekday, UTC offset defining calendar days)
//! - Layout tie-breaking
//!
//! Configuration is stored at `~/.config/weekline/config.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gesture::GestureSettings;
use crate::timeline::{Clock, GridMetrics, TieBreak, WeekWindow};

/// Gesture-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_minimum_duration_minutes")]
    pub minimum_duration_minutes: i64,
    /// Clicks within this many ms after a resize ends are ignored.
    #[serde(default = "default_click_suppress_ms")]
    pub click_suppress_ms: i64,
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u32,
}

/// Week configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekConfig {
    /// Weekday name, e.g. "sunday" or "mon".
    #[serde(default = "default_week_start")]
    pub week_start: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Layout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Timeline configuration.
///
/// Serialized to/from TOML at `~/.config/weekline/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub grid: GridMetrics,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub week: WeekConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

// Default functions
fn default_minimum_duration_minutes() -> i64 {
    15
}
fn default_click_suppress_ms() -> i64 {
    100
}
fn default_snap_minutes() -> u32 {
    15
}
fn default_week_start() -> String {
    "sunday".into()
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            minimum_duration_minutes: default_minimum_duration_minutes(),
            click_suppress_ms: default_click_suppress_ms(),
            snap_minutes: default_snap_minutes(),
        }
    }
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            utc_offset_minutes: 0,
        }
    }
}

/// Returns `~/.config/weekline[-dev]/` based on WEEKLINE_ENV.
///
/// Set WEEKLINE_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WEEKLINE_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("weekline-dev")
    } else {
        base_dir.join("weekline")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl TimelineConfig {
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<i64>() {
                    serde_json::Value::Number(n.into())
                } else {
                    value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Location of the default config file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Self::path()
    }

    /// Load from the default location, writing defaults there if absent.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: TimelineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to a specific file.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default timeline config");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: TimelineConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if !(self.grid.hour_height_px > 0.0) {
            return Err(invalid("grid.hour_height_px", "must be positive"));
        }
        if self.grid.min_slot_height_px < 0.0 || !self.grid.min_slot_height_px.is_finite() {
            return Err(invalid("grid.min_slot_height_px", "must be zero or positive"));
        }
        if self.grid.quarter_count == 0 || 60 % self.grid.quarter_count != 0 {
            return Err(invalid("grid.quarter_count", "must divide 60"));
        }
        if self.gesture.minimum_duration_minutes <= 0 {
            return Err(invalid("gesture.minimum_duration_minutes", "must be positive"));
        }
        if self.gesture.click_suppress_ms < 0 {
            return Err(invalid("gesture.click_suppress_ms", "must not be negative"));
        }
        if self.gesture.snap_minutes == 0 {
            return Err(invalid("gesture.snap_minutes", "must be positive"));
        }
        self.week_start()?;
        self.offset()?;
        Ok(())
    }

    /// First day of the week.
    ///
    /// # Errors
    /// Returns an error if `week.week_start` is not a weekday name.
    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        Weekday::from_str(&self.week.week_start).map_err(|_| ConfigError::InvalidValue {
            key: "week.week_start".to_string(),
            message: format!("'{}' is not a weekday", self.week.week_start),
        })
    }

    /// Offset that defines calendar days and grid hours.
    ///
    /// # Errors
    /// Returns an error if the offset is a day or more.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.week.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "week.utc_offset_minutes".to_string(),
                message: "must be within +/- 24 hours".to_string(),
            }
        })
    }

    pub fn minimum_duration(&self) -> Duration {
        Duration::minutes(self.gesture.minimum_duration_minutes)
    }

    /// Week containing `date`.
    ///
    /// # Errors
    /// Returns an error if the week settings are invalid.
    pub fn week_containing(&self, date: NaiveDate) -> Result<WeekWindow, ConfigError> {
        Ok(WeekWindow::containing(date, self.week_start()?, self.offset()?))
    }

    /// Week containing the clock's current date.
    ///
    /// # Errors
    /// Returns an error if the week settings are invalid.
    pub fn current_week(&self, clock: &dyn Clock) -> Result<WeekWindow, ConfigError> {
        Ok(WeekWindow::current(clock, self.week_start()?, self.offset()?))
    }

    /// Parameters for the gesture engines.
    ///
    /// # Errors
    /// Returns an error if the config is invalid.
    pub fn gesture_settings(&self) -> Result<GestureSettings, ConfigError> {
        self.validate()?;
        Ok(GestureSettings {
            offset: self.offset()?,
            grid: self.grid,
            minimum_duration: self.minimum_duration(),
            snap_minutes: self.gesture.snap_minutes,
            click_suppress: Duration::milliseconds(self.gesture.click_suppress_ms),
        })
    }
}
