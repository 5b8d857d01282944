//! Error types for the tile index and tile downloads.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from talking to the tile index or fetching tile content.
///
/// All of these are transient from the pipeline's point of view: a tile that
/// fails to fetch is logged and skipped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The tile payload is not valid gzip.
    #[error("failed to decompress tile {tile}: {reason}")]
    Decompress { tile: String, reason: String },

    /// The tile could not be stored in the run directory.
    #[error("failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },
}
