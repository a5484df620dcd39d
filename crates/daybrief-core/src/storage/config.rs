//! TOML-based application configuration.
//!
//! Covers API credentials, calendar accounts, working hours, task list
//! routing and journal location. Stored at
//! `$DAYBRIEF_HOME/config/daybrief.toml` (home defaults to `~/.daybrief`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{config_file, default_journal_dir, expand_tilde};
use crate::error::ConfigError;

/// One gcalcli account to pull events from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarAccount {
    /// gcalcli `--config-folder` for this account
    pub config_folder: String,
    /// Label shown as the event's calendar name
    #[serde(default)]
    pub label: Option<String>,
    /// Calendars to include; empty means all
    #[serde(default)]
    pub calendars: Vec<String>,
}

impl CalendarAccount {
    /// Label for events from this account, `"Google"` when unset.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("Google")
    }
}

/// Application configuration.
///
/// Serialized to/from TOML. Every field has a default so a partial file
/// loads cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub ticktick_client_id: String,
    #[serde(default)]
    pub ticktick_client_secret: String,
    #[serde(default)]
    pub calendar_accounts: Vec<CalendarAccount>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Working window as `HH:MM-HH:MM`; only the hours are used
    #[serde(default = "default_work_hours")]
    pub work_hours: String,
    /// Days ahead within which a due date counts as urgent
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,
    #[serde(default)]
    pub work_task_lists: Vec<String>,
    #[serde(default)]
    pub personal_task_lists: Vec<String>,
    /// Preferred deep-work windows, surfaced to the planning prompts
    #[serde(default = "default_deep_work_hours")]
    pub deep_work_hours: Vec<String>,
    /// Journal location; empty means `$DAYBRIEF_HOME/journal/daily`
    #[serde(default)]
    pub daily_journal_dir: String,
    #[serde(default = "default_weekly_review_day")]
    pub weekly_review_day: String,
}

// Default functions
fn default_timezone() -> String {
    "America/Toronto".to_string()
}
fn default_work_hours() -> String {
    "09:00-17:00".to_string()
}
fn default_urgent_days() -> i64 {
    3
}
fn default_deep_work_hours() -> Vec<String> {
    vec!["09:00-11:00".to_string(), "14:00-16:00".to_string()]
}
fn default_weekly_review_day() -> String {
    "Sunday".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticktick_client_id: String::new(),
            ticktick_client_secret: String::new(),
            calendar_accounts: Vec::new(),
            timezone: default_timezone(),
            work_hours: default_work_hours(),
            urgent_days: default_urgent_days(),
            work_task_lists: Vec::new(),
            personal_task_lists: Vec::new(),
            deep_work_hours: default_deep_work_hours(),
            daily_journal_dir: String::new(),
            weekly_review_day: default_weekly_review_day(),
        }
    }
}

impl Config {
    /// Load from disk; a missing file writes and returns the default.
    ///
    /// A file that exists but does not parse is an error, never silently
    /// replaced.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
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

    /// Persist to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Work window as `(start_hour, end_hour)`.
    ///
    /// An unparseable `work_hours` string logs a warning and falls back
    /// to 9-17 rather than failing the whole command.
    pub fn work_hours_range(&self) -> (u32, u32) {
        match parse_hour_range(&self.work_hours) {
            Some(range) => range,
            None => {
                log::warn!(
                    "unparseable work_hours {:?}, falling back to 09:00-17:00",
                    self.work_hours
                );
                (9, 17)
            }
        }
    }

    /// Resolved journal directory, with `~` expanded.
    pub fn journal_dir(&self) -> PathBuf {
        if self.daily_journal_dir.is_empty() {
            default_journal_dir()
        } else {
            expand_tilde(&self.daily_journal_dir)
        }
    }
}

fn parse_hour_range(value: &str) -> Option<(u32, u32)> {
    let (start, end) = value.split_once('-')?;
    Some((parse_hour(start)?, parse_hour(end)?))
}

fn parse_hour(value: &str) -> Option<u32> {
    value.trim().split(':').next()?.parse().ok()
}
