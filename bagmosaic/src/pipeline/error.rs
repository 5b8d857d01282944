//! Errors that abort a pipeline run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::editor::EditorError;
use crate::export::ExportError;
use crate::merge::MergeError;
use crate::parallel::ProcessorError;
use crate::source::FetchError;

use super::observer::Stage;
use super::report::TileReport;

/// A run-fatal error. Per-tile failures are not errors of the run; they are
/// reported in the [`RunSummary`](super::RunSummary).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("tile index lookup failed: {0}")]
    Index(#[source] FetchError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error("only {succeeded} tile(s) normalized, {required} required")]
    TooFewTiles { succeeded: usize, required: usize },

    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("failed to write editor script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("editor failed: {0}")]
    Editor(#[from] EditorError),

    /// A stage after normalization failed. The tile reports of the run are
    /// kept so callers can still show what happened to every tile.
    #[error("run stopped at {stage}: {source}")]
    Aborted {
        stage: Stage,
        tiles: Vec<TileReport>,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Per-tile outcome gathered before the run stopped. Empty when the run
    /// stopped before any tile was processed.
    pub fn tiles(&self) -> &[TileReport] {
        match self {
            PipelineError::Aborted { tiles, .. } => tiles,
            _ => &[],
        }
    }

    /// The error that stopped the run.
    pub fn cause(&self) -> &PipelineError {
        match self {
            PipelineError::Aborted { source, .. } => source.cause(),
            other => other,
        }
    }
}
