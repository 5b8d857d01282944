//! bagmosaic CLI - Command-line interface
//!
//! Builds a merged, ground-referenced 3D BAG mosaic around a point of
//! interest and hands it to Blender.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use bagmosaic::config::ConfigFile;
use commands::{BuildArgs, ConfigCommands, NeighboursArgs, PrepareArgs, TilesArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "bagmosaic")]
#[command(version = bagmosaic::VERSION)]
#[command(about = "Merge 3D BAG tiles around a point into one Blender-ready mesh", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/bagmosaic/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up, download and merge the tiles around a point, then export
    Build(BuildArgs),

    /// Merge local tile files and export
    Prepare(PrepareArgs),

    /// List the tiles around a point
    Tiles(TilesArgs),

    /// Write the tile adjacency CSV for the whole index
    Neighbours(NeighboursArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if let CliError::Pipeline(pipeline) = &e {
            if !pipeline.tiles().is_empty() {
                println!();
                commands::common::print_tiles(pipeline.tiles());
                println!();
            }
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    match cli.command {
        Commands::Build(args) => commands::build::run(args, &config, cli.verbose),
        Commands::Prepare(args) => commands::prepare::run(args, &config, cli.verbose),
        Commands::Tiles(args) => commands::tiles::run(args, &config, cli.verbose),
        Commands::Neighbours(args) => commands::neighbours::run(args, &config, cli.verbose),
        Commands::Config { command } => commands::config::run(command, config, cli.config),
    }
}
