//! Configuration management for the task list.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default storage file, relative to the working directory
pub const DEFAULT_STORAGE_PATH: &str = ".todo-storage.json";

/// Default storage quota, matching what browsers give local storage
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default bound on actions fed back by effects per dispatch
pub const DEFAULT_MAX_FEEDBACK_ACTIONS: usize = 64;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File backing the key-value store (`TODO_STORAGE_PATH`)
    pub storage_path: PathBuf,
    /// Cap on stored bytes, `None` for unlimited (`TODO_STORAGE_QUOTA_BYTES`, 0 disables)
    pub storage_quota_bytes: Option<usize>,
    /// Page rewritten after every change, if any (`TODO_HTML_OUTPUT`)
    pub html_output: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset (`TODO_LOG_LEVEL`)
    pub log_level: String,
    /// Feedback bound for the store (`TODO_MAX_FEEDBACK_ACTIONS`)
    pub max_feedback_actions: usize,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables take their defaults. A variable holding something
    /// that does not parse also takes its default, with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let quota = parse_or(
            "TODO_STORAGE_QUOTA_BYTES",
            lookup("TODO_STORAGE_QUOTA_BYTES"),
            DEFAULT_STORAGE_QUOTA_BYTES,
        );

        Self {
            storage_path: lookup("TODO_STORAGE_PATH")
                .filter(|path| !path.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from),
            storage_quota_bytes: (quota > 0).then_some(quota),
            html_output: lookup("TODO_HTML_OUTPUT")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_level: lookup("TODO_LOG_LEVEL")
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            max_feedback_actions: parse_or(
                "TODO_MAX_FEEDBACK_ACTIONS",
                lookup("TODO_MAX_FEEDBACK_ACTIONS"),
                DEFAULT_MAX_FEEDBACK_ACTIONS,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parses `value`, falling back to `default` when absent or malformed
fn parse_or(name: &str, value: Option<String>, default: usize) -> usize {
    let Some(value) = value else {
        return default;
    };

    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(variable = name, %value, default, "Invalid number, using default");
        default
    })
}
