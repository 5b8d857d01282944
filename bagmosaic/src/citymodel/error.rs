//! Error types for loading and saving city models.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for city model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while reading, validating or writing a city model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to read the file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write the file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// The document is not valid JSON or does not match the CityJSON layout.
    #[error("invalid CityJSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level `type` member is not `CityJSON`.
    #[error("not a CityJSON document (type is {0:?})")]
    NotCityJson(String),

    /// A vertex of a quantized model is not an integer.
    #[error("vertex {index} is not an integer although a transform is present")]
    NonIntegerVertex { index: usize },

    /// A boundary references a vertex that does not exist.
    #[error("object {object} references vertex {index} but the model has {len} vertices")]
    IndexOutOfRange {
        object: String,
        index: usize,
        len: usize,
    },
}
