//! Subcommand implementations.

pub mod build;
pub mod common;
pub mod config;
pub mod neighbours;
pub mod prepare;
pub mod progress;
pub mod tiles;

pub use build::BuildArgs;
pub use config::ConfigCommands;
pub use neighbours::NeighboursArgs;
pub use prepare::PrepareArgs;
pub use tiles::TilesArgs;
