//! Tile index lookup.
//!
//! The 3D BAG publishes its tiling scheme as a WFS feature type. Each feature
//! is one tile: a `tile_id` property and a polygon footprint in the Dutch
//! national grid (EPSG:28992).

use serde::Deserialize;
use tracing::{debug, info};

use super::error::FetchError;
use super::http::HttpClient;
use crate::tile::{BoundingBox, TileId, TileRecord};

/// Default WFS endpoint of the 3D BAG.
pub const DEFAULT_INDEX_URL: &str = "https://data.3dbag.nl/api/BAG3D_v2/wfs";

/// Feature type holding the tile footprints.
pub const TILE_FEATURE_TYPE: &str = "BAG3D_v2:bag_tiles_3k";

/// Spatial reference system of the footprints.
pub const TILE_SRS: &str = "urn:x-ogc:def:crs:EPSG:28992";

/// Lookup of tiles by area.
pub trait TileIndex: Send + Sync {
    /// Tiles whose footprint overlaps `bbox`.
    fn lookup(&self, bbox: &BoundingBox) -> Result<Vec<TileRecord>, FetchError>;

    /// Every tile in the index.
    fn all(&self) -> Result<Vec<TileRecord>, FetchError>;
}

/// Tile index backed by a WFS `GetFeature` request with GeoJSON output.
pub struct WfsTileIndex<C: HttpClient> {
    client: C,
    url: String,
    feature_type: String,
}

impl<C: HttpClient> WfsTileIndex<C> {
    /// Create an index against the default 3D BAG endpoint.
    pub fn new(client: C) -> Self {
        Self::with_url(client, DEFAULT_INDEX_URL)
    }

    /// Create an index against a custom WFS endpoint.
    pub fn with_url(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            feature_type: TILE_FEATURE_TYPE.to_string(),
        }
    }

    /// Override the feature type name.
    pub fn with_feature_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = feature_type.into();
        self
    }

    /// Build the GetFeature URL, optionally restricted to a bounding box.
    pub fn request_url(&self, bbox: Option<&BoundingBox>) -> String {
        let mut url = format!(
            "{}?service=WFS&version=1.1.0&request=GetFeature&typename={}&srsname={}&outputFormat=json",
            self.url, self.feature_type, TILE_SRS
        );
        if let Some(bbox) = bbox {
            url.push_str(&format!("&bbox={},{}", bbox.to_query(), TILE_SRS));
        }
        url
    }

    fn query(&self, bbox: Option<&BoundingBox>) -> Result<Vec<TileRecord>, FetchError> {
        let url = self.request_url(bbox);
        debug!(url = %url, "Querying tile index");

        let body = self.client.get(&url)?;
        let tiles = parse_feature_collection(&body)?;

        info!(tiles = tiles.len(), "Tile index answered");
        Ok(tiles)
    }
}

impl<C: HttpClient> TileIndex for WfsTileIndex<C> {
    fn lookup(&self, bbox: &BoundingBox) -> Result<Vec<TileRecord>, FetchError> {
        self.query(Some(bbox))
    }

    fn all(&self) -> Result<Vec<TileRecord>, FetchError> {
        self.query(None)
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
    geometry: FeatureGeometry,
}

#[derive(Deserialize)]
struct Properties {
    tile_id: TileIdValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TileIdValue {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum FeatureGeometry {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

impl FeatureGeometry {
    /// Exterior ring of the (first) polygon.
    fn exterior(self) -> Vec<Vec<f64>> {
        match self {
            FeatureGeometry::Polygon(rings) => rings.into_iter().next(),
            FeatureGeometry::MultiPolygon(polygons) => polygons
                .into_iter()
                .next()
                .and_then(|rings| rings.into_iter().next()),
        }
        .unwrap_or_default()
    }
}

/// Parse a GeoJSON feature collection of tiles.
pub fn parse_feature_collection(body: &[u8]) -> Result<Vec<TileRecord>, FetchError> {
    let collection: FeatureCollection = serde_json::from_slice(body)
        .map_err(|e| FetchError::InvalidResponse(format!("tile index: {}", e)))?;

    collection
        .features
        .into_iter()
        .map(|feature| {
            let id = match feature.properties.tile_id {
                TileIdValue::Text(id) => TileId::new(id),
                TileIdValue::Number(id) => TileId::new(id.to_string()),
            };
            let mut footprint = Vec::new();
            for position in feature.geometry.exterior() {
                match position.as_slice() {
                    [x, y, ..] => footprint.push([*x, *y]),
                    _ => {
                        return Err(FetchError::InvalidResponse(format!(
                            "tile {} has a position with fewer than two coordinates",
                            id
                        )))
                    }
                }
            }
            Ok(TileRecord::new(id, footprint))
        })
        .collect()
}
