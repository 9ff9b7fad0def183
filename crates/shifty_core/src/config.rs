//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect the few knobs callers need to bootstrap storage and logging.
//! - Read overrides from the environment and an optional `.env` file
//!   without failing on bad values.
//!
//! # Invariants
//! - `from_env` never panics; unparsable values fall back to defaults.
//! - `invite_code_attempts` is at least 1.
//! - Real environment variables win over `.env` entries.

use crate::invite::DEFAULT_INVITE_CODE_ATTEMPTS;
use crate::logging::default_log_level;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "SHIFTY_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SHIFTY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SHIFTY_LOG_DIR";
pub const ENV_INVITE_ATTEMPTS: &str = "SHIFTY_INVITE_ATTEMPTS";

const DEFAULT_DB_FILE_NAME: &str = "shifty.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub invite_code_attempts: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            invite_code_attempts: DEFAULT_INVITE_CODE_ATTEMPTS,
        }
    }
}

impl CoreConfig {
    /// Builds a config from `SHIFTY_*` environment variables, after loading
    /// a `.env` file from the working directory or its parents if one exists.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!(
                "event=config_load module=config status=ok dotenv={}",
                path.display()
            ),
            Err(err) if err.not_found() => {}
            Err(err) => warn!("event=config_load module=config status=fallback error={err}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `path` in dotenv format, without touching the
    /// process environment. Variables already set in the environment win.
    ///
    /// # Errors
    /// - The file is missing, unreadable or malformed.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let mut file_values = HashMap::new();
        for entry in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = entry?;
            file_values.insert(key, value);
        }

        Ok(Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        }))
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let invite_code_attempts = match non_empty(ENV_INVITE_ATTEMPTS) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(
                        "event=config_load module=config status=fallback key={ENV_INVITE_ATTEMPTS}"
                    );
                    defaults.invite_code_attempts
                }
            },
            None => defaults.invite_code_attempts,
        };

        Self {
            db_path: non_empty(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_empty(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from),
            invite_code_attempts,
        }
    }
}
