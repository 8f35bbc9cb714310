use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_ENV: &str = "SL_UP_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a file logger when `SL_UP_LOG` is set. The TUI owns the screen, so
/// there is no stderr fallback.
pub fn init_logging() -> Result<Option<PathBuf>, LoggingError> {
    let Some(path) = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from) else {
        return Ok(None);
    };

    let file = open_log_file(&path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| LoggingError::Install(error.to_string()))?;

    tracing::debug!(path = %path.display(), "logging initialized");
    Ok(Some(path))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}
