//! OAuth token persistence for the task service.
//!
//! Loading is lenient: a missing or corrupt token file reads as an empty
//! token set, which the adapter reports as "not authenticated" instead of
//! failing at startup. Saving tightens file permissions since the file
//! holds live credentials.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::token_file;
use crate::error::ConfigError;

/// Seconds before expiry at which a token already counts as stale.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// OAuth tokens for the task service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tokens {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Unix timestamp the access token expires at
    #[serde(default)]
    pub expires_at: i64,
}

impl Tokens {
    /// Load from the default token file.
    pub fn load() -> Tokens {
        Self::load_from(&token_file())
    }

    pub fn load_from(path: &Path) -> Tokens {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Tokens::default(),
        }
    }

    /// Save to the default token file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&token_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |e: &dyn std::fmt::Display| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(&e))?;
        }
        let json = serde_json::to_string(self).map_err(|e| save_failed(&e))?;
        fs::write(path, json).map_err(|e| save_failed(&e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| save_failed(&e))?;
        }

        Ok(())
    }

    /// No access token stored at all.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Token expired, or close enough to expiry to refresh now.
    pub fn needs_refresh(&self, now: i64) -> bool {
        self.expires_at - REFRESH_MARGIN_SECS <= now
    }
}
