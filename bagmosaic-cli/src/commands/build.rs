//! `build` - the full run from point of interest to Blender project.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use bagmosaic::config::ConfigFile;
use bagmosaic::editor::BlenderRunner;
use bagmosaic::pipeline::{MosaicPipeline, PipelineConfig, DEFAULT_NAME};
use bagmosaic::shift::Origin;
use bagmosaic::source::{HttpTileSource, WfsTileIndex};

use super::common::{http_client, init_logging, normalizer, print_summary};
use super::progress::FetchProgress;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// X coordinate of the point of interest (EPSG:28992)
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// Y coordinate of the point of interest (EPSG:28992)
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// Half-width of the square area around the point, in metres
    #[arg(short, long, default_value_t = 1000.0)]
    pub radius: f64,

    /// Directory for downloaded tiles, the mesh, the script and the log
    #[arg(short, long, default_value = "bagmosaic-out")]
    pub output_dir: PathBuf,

    /// Base name of the output files
    #[arg(short, long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Level of detail to extract (default from config: 2.2)
    #[arg(long)]
    pub lod: Option<String>,

    /// Normalization threads, 0 for all cores
    #[arg(long)]
    pub threads: Option<usize>,

    /// Minimum number of usable tiles
    #[arg(long)]
    pub min_tiles: Option<usize>,

    /// Blender executable
    #[arg(long)]
    pub blender: Option<PathBuf>,

    /// Only write the import script, do not start Blender
    #[arg(long)]
    pub no_editor: bool,
}

impl BuildArgs {
    fn pipeline_config(&self, config: &ConfigFile) -> PipelineConfig {
        let editor = if self.no_editor {
            None
        } else {
            self.blender
                .clone()
                .or_else(|| config.editor.blender.clone())
                .map(BlenderRunner::new)
        };

        PipelineConfig::from_config(config)
            .with_normalizer(normalizer(config, self.lod.clone()))
            .with_threads(self.threads.unwrap_or(config.pipeline.threads))
            .with_min_tiles(self.min_tiles.unwrap_or(config.pipeline.min_tiles))
            .with_name(self.name.as_str())
            .with_editor(editor)
    }
}

pub fn run(args: BuildArgs, config: &ConfigFile, verbose: bool) -> Result<(), CliError> {
    let _guard = init_logging(Some(&args.output_dir), verbose)?;

    let client = http_client(config)?;
    let index = WfsTileIndex::with_url(client.clone(), config.source.index_url.as_str());
    let source = HttpTileSource::with_template(client, config.source.tile_url.as_str());

    let poi = Origin::new(args.x, args.y);
    info!(x = poi.x, y = poi.y, radius = args.radius, "Building mosaic");

    let pipeline = MosaicPipeline::new(args.pipeline_config(config))
        .with_observer(Arc::new(FetchProgress::new()));
    let summary = pipeline.run(&index, &source, poi, args.radius, &args.output_dir)?;

    print_summary(&summary);
    Ok(())
}
