//! Pipeline configuration.

use crate::config::ConfigFile;
use crate::editor::BlenderRunner;
use crate::normalize::TileNormalizer;

/// Default base name of the run artifacts (`mosaic.obj`, `mosaic.blend`, ...).
pub const DEFAULT_NAME: &str = "mosaic";

/// Settings of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Per-tile normalization settings
    pub normalizer: TileNormalizer,
    /// Normalization workers, 0 for available parallelism
    pub threads: usize,
    /// Minimum number of normalized tiles required to merge
    pub min_tiles: usize,
    /// Base name of the output files
    pub name: String,
    /// Editor to launch on the control script; `None` only writes the script
    pub editor: Option<BlenderRunner>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: TileNormalizer::default(),
            threads: 0,
            min_tiles: 1,
            name: DEFAULT_NAME.to_string(),
            editor: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the user configuration file.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            normalizer: TileNormalizer::new(config.normalize.lod.as_str())
                .with_ground_attribute(config.normalize.ground_attribute.as_str()),
            threads: config.pipeline.threads,
            min_tiles: config.pipeline.min_tiles,
            name: DEFAULT_NAME.to_string(),
            editor: config.editor.blender.clone().map(BlenderRunner::new),
        }
    }

    pub fn with_normalizer(mut self, normalizer: TileNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_min_tiles(mut self, min_tiles: usize) -> Self {
        self.min_tiles = min_tiles;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_editor(mut self, editor: Option<BlenderRunner>) -> Self {
        self.editor = editor;
        self
    }

    /// `<name>.obj`
    pub fn mesh_file_name(&self) -> String {
        format!("{}.obj", self.name)
    }

    /// `<name>_import.py`
    pub fn script_file_name(&self) -> String {
        format!("{}_import.py", self.name)
    }

    /// `<name>.blend`
    pub fn project_file_name(&self) -> String {
        format!("{}.blend", self.name)
    }
}
