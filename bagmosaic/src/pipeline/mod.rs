//! End-to-end mosaic runs.
//!
//! [`MosaicPipeline`] chains the library's stages into one run:
//!
//! ```text
//! poi, radius
//!   │  TileIndex::lookup
//!   ▼
//! tile ids ── TileFetcher ──► <out>/<tid>.json        (sequential, skip failures)
//!   │
//!   ▼
//! ParallelProcessor::normalize_all                    (worker pool, barrier)
//!   │  successes in order, at least `min_tiles`
//!   ▼
//! merge ──► shift(origin) ──► <out>/<name>.obj
//!   │
//!   ▼
//! <out>/<name>_import.py ──► blender (optional) ──► <out>/<name>.blend
//! ```
//!
//! Per-tile failures never abort a run; they end up in the [`RunSummary`].
//! Everything after normalization is fatal on error.

mod config;
mod error;
mod observer;
mod report;

pub use config::{PipelineConfig, DEFAULT_NAME};
pub use error::PipelineError;
pub use observer::{NoopObserver, RunObserver, SharedObserver, Stage};
pub use report::{MergeStats, RunArtifacts, RunSummary, TileReport, TileStatus};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::citymodel::CityModel;
use crate::editor::EditorScript;
use crate::export::{export_obj, ObjStats};
use crate::merge::merge;
use crate::parallel::{ParallelProcessor, TileOutcome};
use crate::shift::{shift, Origin};
use crate::source::{TileFetcher, TileIndex, TileSource};
use crate::tile::{BoundingBox, TileId, TileInput};

/// Runs the mosaic pipeline with a fixed configuration.
pub struct MosaicPipeline {
    config: PipelineConfig,
    observer: SharedObserver,
}

impl MosaicPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report progress to `observer`.
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Look up the tiles around `poi`, download them into `out_dir`, and
    /// build the mosaic centred on `poi`.
    pub fn run(
        &self,
        index: &dyn TileIndex,
        source: &dyn TileSource,
        poi: Origin,
        radius: f64,
        out_dir: &Path,
    ) -> Result<RunSummary, PipelineError> {
        let out_dir = prepare_output_dir(out_dir)?;

        self.observer.stage_started(Stage::Lookup);
        let bbox = BoundingBox::around(poi.x, poi.y, radius);
        let records = index.lookup(&bbox).map_err(PipelineError::Index)?;
        self.observer.tiles_found(records.len());
        info!(tiles = records.len(), bbox = %bbox.to_query(), "Tiles found");

        self.observer.stage_started(Stage::Fetch);
        let ids: Vec<TileId> = records.into_iter().map(|r| r.id).collect();
        let fetcher = TileFetcher::new(source, &out_dir);
        let fetched = fetcher.fetch_all(&ids, |outcome| {
            self.observer
                .tile_fetched(&outcome.tile, outcome.result.is_ok())
        });

        let mut reports = Vec::with_capacity(fetched.len());
        let mut inputs = Vec::new();
        for outcome in fetched {
            match outcome.result {
                Ok(input) => {
                    reports.push(None);
                    inputs.push(input);
                }
                Err(e) => reports.push(Some(TileReport::new(
                    outcome.tile,
                    TileStatus::FetchFailed(e.to_string()),
                ))),
            }
        }

        let normalized = self.normalize(&inputs)?;

        // Fill the fetch gaps with normalization results, keeping lookup order.
        let mut normalized_reports = normalized.reports.into_iter();
        let tiles = reports
            .into_iter()
            .filter_map(|report| report.or_else(|| normalized_reports.next()))
            .collect();

        self.finish(tiles, normalized.models, poi, &out_dir)
    }

    /// Build the mosaic from tile files already on disk.
    pub fn run_files(
        &self,
        inputs: &[TileInput],
        origin: Origin,
        out_dir: &Path,
    ) -> Result<RunSummary, PipelineError> {
        let out_dir = prepare_output_dir(out_dir)?;
        let normalized = self.normalize(inputs)?;
        self.finish(normalized.reports, normalized.models, origin, &out_dir)
    }

    fn normalize(&self, inputs: &[TileInput]) -> Result<Normalized, PipelineError> {
        self.observer.stage_started(Stage::Normalize);
        let outcomes = ParallelProcessor::new(self.config.threads)
            .normalize_all(inputs, &self.config.normalizer)?;
        Ok(Normalized::from_outcomes(outcomes))
    }

    /// Merge, export and hand off. A failure here is wrapped in
    /// [`PipelineError::Aborted`] together with the tile reports.
    fn finish(
        &self,
        tiles: Vec<TileReport>,
        models: Vec<CityModel>,
        origin: Origin,
        out_dir: &Path,
    ) -> Result<RunSummary, PipelineError> {
        let mut stage = Stage::Merge;
        let outputs = match self.build_outputs(models, origin, out_dir, &mut stage) {
            Ok(outputs) => outputs,
            Err(source) => {
                log_failures(&tiles);
                return Err(PipelineError::Aborted {
                    stage,
                    tiles,
                    source: Box::new(source),
                });
            }
        };

        let (merged, exported, artifacts) = outputs;
        let summary = RunSummary {
            tiles,
            merged,
            exported,
            artifacts,
        };

        log_failures(&summary.tiles);
        info!(
            tiles = summary.tiles.len(),
            succeeded = summary.succeeded(),
            objects = summary.merged.objects,
            mesh = %summary.artifacts.mesh.display(),
            "Run complete"
        );

        Ok(summary)
    }

    /// Run the stages after normalization, recording the current one in
    /// `stage`.
    fn build_outputs(
        &self,
        models: Vec<CityModel>,
        origin: Origin,
        out_dir: &Path,
        stage: &mut Stage,
    ) -> Result<(MergeStats, ObjStats, RunArtifacts), PipelineError> {
        let succeeded = models.len();
        if succeeded < self.config.min_tiles {
            return Err(PipelineError::TooFewTiles {
                succeeded,
                required: self.config.min_tiles,
            });
        }

        self.enter(stage, Stage::Merge);
        let mut model = merge(models)?;
        let merged = MergeStats {
            tiles: succeeded,
            objects: model.objects.len(),
            vertices: model.vertices.len(),
        };

        self.enter(stage, Stage::Shift);
        shift(&mut model, origin);

        self.enter(stage, Stage::Export);
        let mesh = out_dir.join(self.config.mesh_file_name());
        let exported = export_obj(&model, &mesh)?;

        self.enter(stage, Stage::Script);
        let script_path = out_dir.join(self.config.script_file_name());
        let project = out_dir.join(self.config.project_file_name());
        EditorScript::new(&mesh, &project)
            .write(&script_path)
            .map_err(|e| PipelineError::Script {
                path: script_path.clone(),
                source: e,
            })?;

        let project = match &self.config.editor {
            Some(editor) => {
                self.enter(stage, Stage::Editor);
                editor.run(&script_path, &project)?;
                Some(project)
            }
            None => None,
        };

        let artifacts = RunArtifacts {
            mesh,
            script: script_path,
            project,
        };
        Ok((merged, exported, artifacts))
    }

    fn enter(&self, current: &mut Stage, stage: Stage) {
        *current = stage;
        self.observer.stage_started(stage);
    }
}

fn log_failures(tiles: &[TileReport]) {
    for failure in tiles.iter().filter(|t| !t.status.is_ok()) {
        warn!(tile = %failure.tile, status = %failure.status, "Tile not in mosaic");
    }
}

/// Normalization results split into reports and the successful models.
struct Normalized {
    reports: Vec<TileReport>,
    models: Vec<CityModel>,
}

impl Normalized {
    fn from_outcomes(outcomes: Vec<TileOutcome>) -> Self {
        let mut reports = Vec::with_capacity(outcomes.len());
        let mut models = Vec::new();
        for outcome in outcomes {
            let status = match outcome.result {
                Ok(model) => {
                    models.push(model);
                    TileStatus::Normalized
                }
                Err(e) => TileStatus::NormalizeFailed(e.to_string()),
            };
            reports.push(TileReport::new(outcome.tile, status));
        }
        Self { reports, models }
    }
}

/// Create `dir` if needed and return its absolute path, so the editor script
/// works from any working directory.
fn prepare_output_dir(dir: &Path) -> Result<PathBuf, PipelineError> {
    let dir_err = |e| PipelineError::OutputDir {
        path: dir.to_path_buf(),
        source: e,
    };
    fs::create_dir_all(dir).map_err(dir_err)?;
    fs::canonicalize(dir).map_err(dir_err)
}
