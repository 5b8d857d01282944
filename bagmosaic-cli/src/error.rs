//! CLI error type.

use std::fmt;
use std::io;
use std::path::PathBuf;

use bagmosaic::config::ConfigError;
use bagmosaic::logging::LoggingError;
use bagmosaic::pipeline::PipelineError;
use bagmosaic::source::FetchError;

/// Errors reported to the user by the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be read, written or applied
    Config(String),
    /// A command-line argument is not usable
    Usage(String),
    /// Logging could not be set up
    Logging(LoggingError),
    /// Talking to the tile service failed
    Source(FetchError),
    /// The mosaic run failed
    Pipeline(PipelineError),
    /// Writing an output file failed
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Usage(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Source(e) => write!(f, "Tile service error: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) | CliError::Usage(_) => None,
            CliError::Logging(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Write { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Source(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
