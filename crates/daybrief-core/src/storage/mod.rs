mod config;
mod tokens;

pub use config::{CalendarAccount, Config};
pub use tokens::Tokens;

use std::path::PathBuf;

/// Returns the application home, `$DAYBRIEF_HOME` or `~/.daybrief`.
///
/// The directory is not created here; writers create what they need.
pub fn home_dir() -> PathBuf {
    match std::env::var_os("DAYBRIEF_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".daybrief"),
    }
}

/// Path of the TOML configuration file.
pub fn config_file() -> PathBuf {
    home_dir().join("config").join("daybrief.toml")
}

/// Path of the OAuth token store.
pub fn token_file() -> PathBuf {
    home_dir().join("config").join("tokens.json")
}

/// Default journal directory when the config leaves it empty.
pub fn default_journal_dir() -> PathBuf {
    home_dir().join("journal").join("daily")
}

/// Directory for user prompt template overrides.
pub fn templates_dir() -> PathBuf {
    home_dir().join("templates")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
