//! Run summary.

use std::fmt;
use std::path::PathBuf;

use crate::export::ObjStats;
use crate::tile::TileId;

/// What happened to one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileStatus {
    /// Normalized and merged
    Normalized,
    /// Download failed; the reason is the error message
    FetchFailed(String),
    /// The tile was read but rejected
    NormalizeFailed(String),
}

impl TileStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, TileStatus::Normalized)
    }
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileStatus::Normalized => write!(f, "ok"),
            TileStatus::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
            TileStatus::NormalizeFailed(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileReport {
    pub tile: TileId,
    pub status: TileStatus,
}

impl TileReport {
    pub fn new(tile: TileId, status: TileStatus) -> Self {
        Self { tile, status }
    }
}

/// Size of the merged model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub tiles: usize,
    pub objects: usize,
    pub vertices: usize,
}

/// Files written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub mesh: PathBuf,
    pub script: PathBuf,
    /// Present when the editor ran and saved the project
    pub project: Option<PathBuf>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// One entry per tile, in lookup or input order
    pub tiles: Vec<TileReport>,
    pub merged: MergeStats,
    pub exported: ObjStats,
    pub artifacts: RunArtifacts,
}

impl RunSummary {
    /// Number of tiles that made it into the mosaic.
    pub fn succeeded(&self) -> usize {
        self.tiles.iter().filter(|t| t.status.is_ok()).count()
    }

    /// Tiles that were skipped, with their status.
    pub fn failures(&self) -> impl Iterator<Item = &TileReport> {
        self.tiles.iter().filter(|t| !t.status.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let summary = RunSummary {
            tiles: vec![
                TileReport::new(TileId::new("1"), TileStatus::Normalized),
                TileReport::new(TileId::new("2"), TileStatus::FetchFailed("HTTP 404".into())),
                TileReport::new(TileId::new("3"), TileStatus::Normalized),
            ],
            merged: MergeStats::default(),
            exported: ObjStats::default(),
            artifacts: RunArtifacts {
                mesh: PathBuf::from("m.obj"),
                script: PathBuf::from("m_import.py"),
                project: None,
            },
        };

        assert_eq!(summary.succeeded(), 2);
        let failed: Vec<_> = summary.failures().map(|t| t.tile.as_str()).collect();
        assert_eq!(failed, vec!["2"]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TileStatus::Normalized.to_string(), "ok");
        assert_eq!(
            TileStatus::NormalizeFailed("missing h_maaiveld".into()).to_string(),
            "rejected: missing h_maaiveld"
        );
    }
}
