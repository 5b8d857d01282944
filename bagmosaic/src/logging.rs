//! Logging setup.
//!
//! Installs a `tracing` subscriber with two outputs: human-readable lines on
//! stderr, and a plain-text log file in the run directory written by a
//! background thread. The level filter comes from `RUST_LOG` when set.
//!
//! # Usage
//!
//! ```ignore
//! let _guard = logging::init(&LogConfig::new().with_directory(&output_dir))?;
//! // keep `_guard` alive until the run ends, or buffered lines are lost
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Log file written into the run directory.
pub const LOG_FILE_NAME: &str = "bagmosaic.log";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file: {0}")]
    Appender(#[from] InitError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the log file; `None` logs to stderr only
    pub directory: Option<PathBuf>,
    pub file_name: String,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            directory: None,
            file_name: LOG_FILE_NAME.to_string(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Full path of the log file, if file logging is enabled.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.directory.as_ref().map(|d| d.join(&self.file_name))
    }
}

/// Install the global subscriber.
///
/// Returns the guard of the file writer, if any. Dropping it flushes and
/// stops the writer thread.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            fs::create_dir_all(directory).map_err(|e| LoggingError::CreateDir {
                path: directory.clone(),
                source: e,
            })?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(&config.file_name)
                .build(directory)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
