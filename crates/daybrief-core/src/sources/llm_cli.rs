//! Language-model backend that shells out to the `claude` CLI.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use super::traits::LlmService;
use crate::error::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 300;
const NOT_FOUND_HINT: &str = "install with 'npm install -g @anthropic-ai/claude-code'";

/// Locate the claude binary: `$PATH` first, then `~/.local/bin/claude`,
/// then the bare name and let the OS resolve it.
pub fn find_claude_binary() -> PathBuf {
    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join("claude");
            if candidate.is_file() {
                return candidate;
            }
        }
    }
    if let Some(home) = dirs::home_dir() {
        let fallback = home.join(".local").join("bin").join("claude");
        if fallback.exists() {
            return fallback;
        }
    }
    PathBuf::from("claude")
}

/// Prompt runner over the claude CLI.
pub struct ClaudeCli {
    binary: PathBuf,
    cwd: Option<PathBuf>,
    timeout_secs: u64,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCli {
    pub fn new() -> Self {
        Self {
            binary: find_claude_binary(),
            cwd: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Runner that executes in `cwd` so the CLI picks up project context.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            ..Self::new()
        }
    }

    /// Run the binary with inherited stdio for a live session. No timeout
    /// applies; the session runs until the user ends it.
    pub fn run_interactive(&self, prompt: &str) -> Result<(), SourceError> {
        let mut cmd = std::process::Command::new(&self.binary);
        cmd.arg("-p").arg(prompt);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let status = cmd.status().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::CommandNotFound {
                    command: "claude".to_string(),
                    hint: NOT_FOUND_HINT.to_string(),
                }
            } else {
                SourceError::CommandFailed {
                    command: "claude".to_string(),
                    stderr: e.to_string(),
                }
            }
        })?;

        if !status.success() {
            return Err(SourceError::CommandFailed {
                command: "claude".to_string(),
                stderr: status.to_string(),
            });
        }
        Ok(())
    }
}

impl LlmService for ClaudeCli {
    fn generate(&self, prompt: &str) -> Result<String, SourceError> {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.arg("-p").arg(prompt).stdin(Stdio::null());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let result = tokio::runtime::Handle::current().block_on(async {
            tokio::time::timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await
        });

        match result {
            Err(_) => Err(SourceError::CommandTimeout {
                command: "claude".to_string(),
                timeout_secs: self.timeout_secs,
            }),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::CommandNotFound {
                    command: "claude".to_string(),
                    hint: NOT_FOUND_HINT.to_string(),
                })
            }
            Ok(Err(e)) => Err(SourceError::CommandFailed {
                command: "claude".to_string(),
                stderr: e.to_string(),
            }),
            Ok(Ok(output)) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                log::error!("claude exited with {}: {stderr}", output.status);
                Err(SourceError::CommandFailed {
                    command: "claude".to_string(),
                    stderr,
                })
            }
            Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        }
    }
}
