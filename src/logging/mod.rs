//! Logging setup
//!
//! Logs go to a file only; stdout belongs to the terminal UI.
//!
//! ## Environment Variables
//!
//! 1. **`FIM_LOG`** (highest priority)
//! 2. **`RUST_LOG`**
//! 3. **Default**: `warn` globally, `info` for fim
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/fim/logs/fim-<pid>.log`
//! - macOS: `~/Library/Application Support/fim/logs/fim-12345.log`
//! - Linux: `~/.local/share/fim/logs/fim-12345.log`
//!
//! Override with `--log-file <path>`. A path with an extension names the
//! file; any other path names the directory.

use crate::constants::{logging, paths};
use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("could not create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize logging
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, LogError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir).map_err(|source| LogError::CreateDir {
        path: log_dir.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let directives = filter_directives(
        env::var(logging::ENV_FILTER_VAR).ok(),
        env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(directives)?;
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    Registry::default()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Filter directives: `FIM_LOG` > `RUST_LOG` > default
fn filter_directives(fim_log: Option<String>, rust_log: Option<String>) -> String {
    let set = |d: &String| !d.trim().is_empty();
    fim_log
        .filter(set)
        .or_else(|| rust_log.filter(set))
        .unwrap_or_else(|| logging::DEFAULT_FILTER.to_string())
}

/// Directory and file name of the log file
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("fim-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map_or(filename, |n| n.to_string_lossy().into_owned());
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(paths::APP_DIR)
        .join(paths::LOG_DIR);
    (dir, filename)
}
