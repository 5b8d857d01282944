//! Helpers shared across commands.

use std::path::Path;
use std::sync::Arc;

use bagmosaic::config::ConfigFile;
use bagmosaic::logging::{self, LogConfig, WorkerGuard};
use bagmosaic::normalize::TileNormalizer;
use bagmosaic::pipeline::{RunSummary, TileReport};
use bagmosaic::source::ReqwestClient;

use crate::error::CliError;

/// Set up logging, with a log file in `directory` when given.
pub fn init_logging(directory: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>, CliError> {
    let mut config = LogConfig::new();
    if let Some(directory) = directory {
        config = config.with_directory(directory);
    }
    if verbose {
        config = config.with_default_filter("debug");
    }
    Ok(logging::init(&config)?)
}

/// HTTP client shared by the tile index and the tile source.
pub fn http_client(config: &ConfigFile) -> Result<Arc<ReqwestClient>, CliError> {
    Ok(Arc::new(ReqwestClient::with_timeout(config.source.timeout)?))
}

/// Normalizer from config, with an optional LoD override.
pub fn normalizer(config: &ConfigFile, lod: Option<String>) -> TileNormalizer {
    let lod = lod.unwrap_or_else(|| config.normalize.lod.clone());
    TileNormalizer::new(lod.as_str()).with_ground_attribute(config.normalize.ground_attribute.as_str())
}

/// Print one line per tile with its status.
pub fn print_tiles(tiles: &[TileReport]) {
    let succeeded = tiles.iter().filter(|t| t.status.is_ok()).count();
    println!("Tiles: {} processed, {} normalized", tiles.len(), succeeded);
    for report in tiles {
        println!("  {:<10} {}", report.tile.as_str(), report.status);
    }
}

/// Print the outcome of a run.
pub fn print_summary(summary: &RunSummary) {
    println!();
    print_tiles(&summary.tiles);
    println!();
    println!(
        "Merged:  {} objects, {} vertices",
        summary.merged.objects, summary.merged.vertices
    );
    println!(
        "Mesh:    {} ({} faces)",
        summary.artifacts.mesh.display(),
        summary.exported.faces
    );
    if summary.exported.holes_skipped > 0 {
        println!(
            "         {} interior rings without faces",
            summary.exported.holes_skipped
        );
    }
    println!("Script:  {}", summary.artifacts.script.display());
    if let Some(project) = &summary.artifacts.project {
        println!("Project: {}", project.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizer_lod_override() {
        let config = ConfigFile::default();
        assert_eq!(normalizer(&config, None).lod().as_str(), "2.2");
        assert_eq!(normalizer(&config, Some("1.3".into())).lod().as_str(), "1.3");
    }

    #[test]
    fn test_normalizer_ground_attribute_from_config() {
        let mut config = ConfigFile::default();
        config.normalize.ground_attribute = "ground".to_string();
        assert_eq!(normalizer(&config, None).ground_attribute(), "ground");
    }
}
