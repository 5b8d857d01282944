//! Tile identifiers and normalization inputs.
//!
//! Provides the `TileId` key that travels with every per-tile result, so a
//! result can always be traced back to the tile it came from.

use std::fmt;
use std::path::{Path, PathBuf};

/// Stable identifier of a dataset tile, such as `"7-448-528"`.
///
/// # Example
///
/// ```
/// use bagmosaic::tile::TileId;
///
/// let id = TileId::new("7-448-528");
/// assert_eq!(id.as_str(), "7-448-528");
/// assert_eq!(id.file_name(), "7-448-528.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(String);

impl TileId {
    /// Create a tile id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the decompressed tile in a run directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Derive a tile id from a tile file path (its stem without `.json`).
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = name
            .strip_suffix(".json.gz")
            .or_else(|| name.strip_suffix(".json"))
            .unwrap_or(&name);
        Self(stem.to_string())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A tile file on disk, ready to be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInput {
    /// Tile the file belongs to
    pub id: TileId,
    /// Path to the CityJSON file, plain or gzipped
    pub path: PathBuf,
}

impl TileInput {
    /// Create an input from an id and a path.
    pub fn new(id: TileId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Create an input whose id is derived from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: TileId::from_path(&path),
            path,
        }
    }
}
