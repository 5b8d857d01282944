//! `prepare` - merge tiles that are already on disk.

use std::path::PathBuf;

use clap::Args;

use bagmosaic::config::ConfigFile;
use bagmosaic::pipeline::{MosaicPipeline, PipelineConfig, DEFAULT_NAME};
use bagmosaic::shift::Origin;
use bagmosaic::tile::TileInput;

use super::common::{init_logging, normalizer, print_summary};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// CityJSON tile files, plain or gzipped
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output `.obj` file; the script is written next to it
    #[arg(short, long)]
    pub output: PathBuf,

    /// Origin subtracted from x and y
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    pub origin: Option<Vec<f64>>,

    /// Level of detail to extract
    #[arg(long)]
    pub lod: Option<String>,

    /// Normalization threads, 0 for all cores
    #[arg(long)]
    pub threads: Option<usize>,
}

impl PrepareArgs {
    /// Output directory and artifact name derived from `--output`.
    fn output_parts(&self) -> Result<(PathBuf, String), CliError> {
        let is_obj = self
            .output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if !is_obj {
            return Err(CliError::Usage(format!(
                "--output must name an .obj file, got {}",
                self.output.display()
            )));
        }

        let dir = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        Ok((dir, name))
    }

    fn origin(&self) -> Origin {
        match self.origin.as_deref() {
            Some([x, y]) => Origin::new(*x, *y),
            _ => Origin::default(),
        }
    }
}

pub fn run(args: PrepareArgs, config: &ConfigFile, verbose: bool) -> Result<(), CliError> {
    let (dir, name) = args.output_parts()?;
    let _guard = init_logging(Some(&dir), verbose)?;

    let inputs: Vec<TileInput> = args.files.iter().map(TileInput::from_path).collect();
    let pipeline_config = PipelineConfig::from_config(config)
        .with_normalizer(normalizer(config, args.lod.clone()))
        .with_threads(args.threads.unwrap_or(config.pipeline.threads))
        .with_name(name)
        .with_editor(None);

    let summary = MosaicPipeline::new(pipeline_config).run_files(&inputs, args.origin(), &dir)?;

    print_summary(&summary);
    Ok(())
}
