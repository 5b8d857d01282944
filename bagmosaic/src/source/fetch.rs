//! Tile downloads.
//!
//! ```text
//! TileId ──► HttpTileSource (URL template, gunzip) ──► bytes
//!                                                       │
//!                       TileFetcher ◄───────────────────┘
//!                           │
//!                           ▼
//!                  <output>/<tid>.json ──► TileInput
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::FetchError;
use super::http::HttpClient;
use crate::citymodel::gunzip;
use crate::tile::{TileId, TileInput};

/// Default URL template of gzipped 3D BAG CityJSON tiles.
pub const DEFAULT_TILE_URL: &str =
    "https://data.3dbag.nl/cityjson/v210908_fd2cee53/3dbag_v210908_fd2cee53_{TID}.json.gz";

/// Placeholder replaced with the tile id in URL templates and path patterns.
pub const TILE_PLACEHOLDER: &str = "{TID}";

/// Source of raw tile content.
pub trait TileSource: Send + Sync {
    /// Fetch the CityJSON bytes of one tile, decompressed.
    fn fetch(&self, tile: &TileId) -> Result<Vec<u8>, FetchError>;
}

/// Tile source downloading from a URL template.
pub struct HttpTileSource<C: HttpClient> {
    client: C,
    url_template: String,
}

impl<C: HttpClient> HttpTileSource<C> {
    /// Create a source using the default 3D BAG URL template.
    pub fn new(client: C) -> Self {
        Self::with_template(client, DEFAULT_TILE_URL)
    }

    /// Create a source with a custom template containing `{TID}`.
    pub fn with_template(client: C, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// URL of the given tile.
    pub fn url_for(&self, tile: &TileId) -> String {
        self.url_template.replace(TILE_PLACEHOLDER, tile.as_str())
    }
}

impl<C: HttpClient> TileSource for HttpTileSource<C> {
    fn fetch(&self, tile: &TileId) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(tile);
        debug!(tile = %tile, url = %url, "Downloading tile");
        let body = self.client.get(&url)?;
        decompress(tile, body)
    }
}

/// Gunzip `body` if it carries the gzip magic bytes, otherwise return it as is.
pub fn decompress(tile: &TileId, body: Vec<u8>) -> Result<Vec<u8>, FetchError> {
    gunzip(body).map_err(|e| FetchError::Decompress {
        tile: tile.to_string(),
        reason: e.to_string(),
    })
}

/// Result of fetching one tile.
#[derive(Debug)]
pub struct FetchOutcome {
    pub tile: TileId,
    pub result: Result<TileInput, FetchError>,
}

/// Downloads tiles into a directory, one file per tile.
pub struct TileFetcher<'a> {
    source: &'a dyn TileSource,
    dir: PathBuf,
}

impl<'a> TileFetcher<'a> {
    pub fn new(source: &'a dyn TileSource, dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            dir: dir.into(),
        }
    }

    /// Directory tiles are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetch one tile and store it as `<dir>/<tid>.json`.
    pub fn fetch_one(&self, tile: &TileId) -> Result<TileInput, FetchError> {
        let bytes = self.source.fetch(tile)?;
        let path = self.dir.join(tile.file_name());
        fs::write(&path, &bytes).map_err(|e| FetchError::WriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        debug!(tile = %tile, path = %path.display(), bytes = bytes.len(), "Tile stored");
        Ok(TileInput::new(tile.clone(), path))
    }

    /// Fetch tiles sequentially, in order.
    ///
    /// Failures are logged and reported in the outcome, never retried.
    /// `on_tile` is called after each tile.
    pub fn fetch_all(
        &self,
        tiles: &[TileId],
        mut on_tile: impl FnMut(&FetchOutcome),
    ) -> Vec<FetchOutcome> {
        tiles
            .iter()
            .map(|tile| {
                let result = self.fetch_one(tile);
                if let Err(ref e) = result {
                    warn!(tile = %tile, error = %e, "Skipping tile");
                }
                let outcome = FetchOutcome {
                    tile: tile.clone(),
                    result,
                };
                on_tile(&outcome);
                outcome
            })
            .collect()
    }
}
