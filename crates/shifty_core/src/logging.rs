//! Rolling file logs for the scheduling core.
//!
//! # Responsibility
//! - Start the process-wide file logger once, from explicit arguments or a
//!   `CoreConfig`.
//! - Route panics through the logger with a bounded, single-line payload.
//!
//! # Invariants
//! - A second init with identical settings is a no-op.
//! - A second init with a different level or directory fails; the running
//!   logger is never swapped.
//! - Nothing in this module panics.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "shifty";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDir(PathBuf),
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(flexi_logger::FlexiLoggerError),
    /// Logger already runs with other settings.
    Conflict { active: String, requested: String },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "logger backend failed to start: {err}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already running with {active}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `UnknownLevel` / `RelativeDir` for bad arguments.
/// - `Conflict` when logging already runs with different settings.
/// - `CreateDir` / `Backend` when the logger itself cannot start.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
    }

    let active = ACTIVE.get_or_try_init(|| start(level, log_dir))?;
    ensure_same(active, level, log_dir)
}

/// Starts logging from `config`. Returns `Ok(false)` when `log_dir` is unset.
pub fn init_from_config(config: &CoreConfig) -> Result<bool, LoggingError> {
    match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, dir).map(|()| true),
        None => Ok(false),
    }
}

/// `(level, directory)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(level: &'static str, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(LoggingError::Backend)?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=core_start module=logging status=ok os={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same(active: &ActiveLogger, level: &str, dir: &Path) -> Result<(), LoggingError> {
    if active.level == level && active.dir == dir {
        return Ok(());
    }
    Err(LoggingError::Conflict {
        active: format!("level={} dir={}", active.level, active.dir.display()),
        requested: format!("level={} dir={}", level, dir.display()),
    })
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(LoggingError::UnknownLevel(level.trim().to_string())),
    }
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=logging status=error location={} payload={}",
            location,
            single_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(panic_info);
    }));
}

/// Flattens line breaks and caps the message at `limit` characters.
fn single_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut capped: String = flat.chars().take(limit).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{
        init_from_config, init_logging, logging_status, parse_level, single_line, LoggingError,
    };
    use crate::config::CoreConfig;
    use std::path::Path;

    #[test]
    fn level_names_are_normalized() {
        assert_eq!(parse_level(" WARNING ").unwrap(), "warn");
        assert_eq!(parse_level("Info").unwrap(), "info");
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnknownLevel(_))
        ));
    }

    #[test]
    fn relative_directory_is_rejected() {
        assert!(matches!(
            init_logging("info", Path::new("logs/dev")),
            Err(LoggingError::RelativeDir(_))
        ));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        assert_eq!(single_line("a\nb", 10), "a b");
        assert_eq!(single_line("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn config_without_directory_skips_logging() {
        let config = CoreConfig {
            log_dir: None,
            ..CoreConfig::default()
        };
        assert!(!init_from_config(&config).unwrap());
    }

    #[test]
    fn repeated_init_is_idempotent_and_conflicts_fail() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        init_logging("info", first.path()).unwrap();
        init_logging("info", first.path()).unwrap();

        assert!(matches!(
            init_logging("debug", first.path()),
            Err(LoggingError::Conflict { .. })
        ));
        assert!(matches!(
            init_logging("info", second.path()),
            Err(LoggingError::Conflict { .. })
        ));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
