//! TOML-based application configuration.
//!
//! Stores the review tunables:
//! - Feedback multiplier table and interval bounds
//! - Amendment and multiplier factors
//! - Plan given to new users
//! - Activity history retention window
//!
//! Configuration is stored at `~/.config/yusnote/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::history::DEFAULT_RETENTION_DAYS;
use crate::review::{FeedbackMap, ReviewPlan, ReviewScheduler, SchedulerConfig, DEFAULT_REVIEW_PLAN};

/// Review scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Multiplier per raw feedback score, indexed by score
    #[serde(default = "default_feedback_multipliers")]
    pub feedback_multipliers: Vec<f64>,
    #[serde(default = "default_min_interval")]
    pub min_interval: f64,
    #[serde(default = "default_max_interval")]
    pub max_interval: f64,
    #[serde(default = "default_one")]
    pub feedback_multiplier_factor: f64,
    #[serde(default = "default_one")]
    pub amend_factor: f64,
    /// Plan assigned to newly registered users.
    #[serde(default = "default_plan")]
    pub default_plan: String,
}

/// Activity history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Months whose first day is older than this many days are dropped.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/yusnote/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

// Default functions
fn default_feedback_multipliers() -> Vec<f64> {
    FeedbackMap::default().multipliers().to_vec()
}
fn default_min_interval() -> f64 {
    1.0
}
fn default_max_interval() -> f64 {
    60.0
}
fn default_one() -> f64 {
    1.0
}
fn default_plan() -> String {
    DEFAULT_REVIEW_PLAN.into()
}
fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            feedback_multipliers: default_feedback_multipliers(),
            min_interval: default_min_interval(),
            max_interval: default_max_interval(),
            feedback_multiplier_factor: default_one(),
            amend_factor: default_one(),
            default_plan: default_plan(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

impl ReviewConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            feedback_map: FeedbackMap::new(self.feedback_multipliers.clone()),
            min_interval: self.min_interval,
            max_interval: self.max_interval,
            feedback_multiplier_factor: self.feedback_multiplier_factor,
            amend_factor: self.amend_factor,
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")).into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)
                            .map_err(|e| invalid(format!("cannot parse '{value}': {e}")))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location or write and return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path` or write and return defaults when it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read, cannot be parsed
    /// or fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
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
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check the review tunables, the default plan and the retention window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.review.scheduler_config().validate()?;
        ReviewPlan::parse(&self.review.default_plan).map_err(|e| ConfigError::InvalidValue {
            key: "review.default_plan".into(),
            message: e.to_string(),
        })?;
        if self.history.retention_days < 0 {
            return Err(ConfigError::InvalidValue {
                key: "history.retention_days".into(),
                message: "must not be negative".into(),
            }
            .into());
        }
        Ok(())
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

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the resulting configuration is invalid. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::apply`] fails or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Scheduler built from the review section.
    ///
    /// # Errors
    ///
    /// Returns an error if the review section is invalid.
    pub fn scheduler(&self) -> Result<ReviewScheduler> {
        Ok(ReviewScheduler::with_config(self.review.scheduler_config())?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
