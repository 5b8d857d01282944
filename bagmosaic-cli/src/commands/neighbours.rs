//! `neighbours` - tile adjacency CSV for the whole index.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;

use bagmosaic::config::ConfigFile;
use bagmosaic::source::{
    neighbours, write_neighbours_csv, TileIndex, WfsTileIndex, DEFAULT_NEIGHBOUR_PATTERN,
};

use super::common::{http_client, init_logging};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct NeighboursArgs {
    /// Output CSV file
    pub output: PathBuf,

    /// Path pattern for each tile, with {TID} replaced by the tile id
    #[arg(short, long, default_value = DEFAULT_NEIGHBOUR_PATTERN)]
    pub pattern: String,
}

pub fn run(args: NeighboursArgs, config: &ConfigFile, verbose: bool) -> Result<(), CliError> {
    let _guard = init_logging(None, verbose)?;

    let index = WfsTileIndex::with_url(http_client(config)?, config.source.index_url.as_str());
    let tiles = index.all()?;
    let adjacency = neighbours(&tiles);

    let write_err = |source| CliError::Write {
        path: args.output.clone(),
        source,
    };
    let file = File::create(&args.output).map_err(write_err)?;
    write_neighbours_csv(&adjacency, &args.pattern, BufWriter::new(file)).map_err(write_err)?;

    println!(
        "Wrote {} rows to {}",
        adjacency.len(),
        args.output.display()
    );
    Ok(())
}
