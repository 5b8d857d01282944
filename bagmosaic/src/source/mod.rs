//! Tile index, tile downloads and tile adjacency.
//!
//! Everything here is behind the [`HttpClient`] trait, so the index and the
//! downloader can be tested without network access.

mod error;
mod fetch;
mod http;
mod index;
mod neighbours;

pub use error::FetchError;
pub use fetch::{
    decompress, FetchOutcome, HttpTileSource, TileFetcher, TileSource, DEFAULT_TILE_URL,
    TILE_PLACEHOLDER,
};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use index::{
    parse_feature_collection, TileIndex, WfsTileIndex, DEFAULT_INDEX_URL, TILE_FEATURE_TYPE,
    TILE_SRS,
};
pub use neighbours::{neighbours, write_neighbours_csv, Adjacency, DEFAULT_NEIGHBOUR_PATTERN};

#[cfg(test)]
pub use fetch::tests::MockTileSource;
#[cfg(test)]
pub use http::tests::MockHttpClient;
