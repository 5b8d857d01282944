//! Parallel tile normalization.
//!
//! [`ParallelProcessor`] runs a [`TileNormalizer`] over many tile files on a
//! bounded worker pool.
//!
//! # Architecture
//!
//! ```text
//! normalize_all(inputs)
//!   ├── build rayon pool (N workers)        ← scoped to this call
//!   ├── inputs.par_iter().map(normalize)    ← one task per tile
//!   ├── collect in input order              ← barrier
//!   └── drop pool
//! ```
//!
//! The pool never outlives the call. Results keep the input order, which the
//! merge step relies on: its base is the first successfully normalized tile.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::citymodel::CityModel;
use crate::normalize::{TileError, TileNormalizer};
use crate::tile::{TileId, TileInput};

/// Errors of the worker pool itself (never of individual tiles).
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome of normalizing one tile.
#[derive(Debug)]
pub struct TileOutcome {
    /// Tile this outcome belongs to
    pub tile: TileId,
    /// The normalized model, or why the tile was rejected
    pub result: Result<CityModel, TileError>,
}

impl TileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs tile normalization on a bounded, call-scoped worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelProcessor {
    threads: usize,
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ParallelProcessor {
    /// Create a processor with `threads` workers; 0 uses the available
    /// hardware parallelism.
    pub fn new(threads: usize) -> Self {
        let threads = if threads == 0 {
            available_threads()
        } else {
            threads
        };
        Self { threads }
    }

    /// Number of workers a call will use.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Normalize every input, returning one outcome per input in input order.
    ///
    /// A failing tile yields an error entry at its position; the other tiles
    /// are unaffected. Returns only after every task has finished.
    pub fn normalize_all(
        &self,
        inputs: &[TileInput],
        normalizer: &TileNormalizer,
    ) -> Result<Vec<TileOutcome>, ProcessorError> {
        let workers = self.threads.min(inputs.len()).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("normalize-{}", i))
            .build()?;

        debug!(
            tiles = inputs.len(),
            workers,
            lod = %normalizer.lod(),
            "Normalizing tiles"
        );

        let outcomes: Vec<TileOutcome> = pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    let result = normalizer.normalize(&input.path);
                    match &result {
                        Ok(model) => debug!(
                            tile = %input.id,
                            vertices = model.vertices.len(),
                            "Tile ready"
                        ),
                        Err(e) => warn!(tile = %input.id, error = %e, "Tile rejected"),
                    }
                    TileOutcome {
                        tile: input.id.clone(),
                        result,
                    }
                })
                .collect()
        });

        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        info!(
            succeeded,
            failed = outcomes.len() - succeeded,
            "Normalization complete"
        );

        Ok(outcomes)
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
