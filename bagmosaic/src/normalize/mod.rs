//! Per-tile normalization.
//!
//! A [`TileNormalizer`] turns one raw tile file into a model that is ready to
//! be merged:
//!
//! 1. keep only the geometries of the target level of detail
//! 2. shift every building's vertices down by its ground elevation, so all
//!    buildings stand on z = 0 regardless of terrain height
//!
//! Normalization depends only on the input file, so tiles can be processed
//! in parallel without coordination (see [`crate::parallel`]).

mod base_zero;
mod error;

pub use base_zero::{extract_lod, set_base_zero};
pub use error::{TileError, TileResult};

use std::path::Path;

use tracing::debug;

use crate::citymodel::{CityModel, Lod};

/// Default level of detail extracted from 3D BAG tiles.
pub const DEFAULT_LOD: &str = "2.2";

/// Default name of the ground-elevation attribute in 3D BAG tiles.
pub const DEFAULT_GROUND_ATTRIBUTE: &str = "h_maaiveld";

/// Extracts one level of detail and zero-references building heights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileNormalizer {
    lod: Lod,
    ground_attribute: String,
}

impl Default for TileNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_LOD)
    }
}

impl TileNormalizer {
    /// Create a normalizer for the given level of detail.
    pub fn new(lod: impl Into<Lod>) -> Self {
        Self {
            lod: lod.into(),
            ground_attribute: DEFAULT_GROUND_ATTRIBUTE.to_string(),
        }
    }

    /// Set the name of the building ground-elevation attribute.
    pub fn with_ground_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.ground_attribute = attribute.into();
        self
    }

    /// Level of detail this normalizer keeps.
    pub fn lod(&self) -> &Lod {
        &self.lod
    }

    /// Name of the ground-elevation attribute.
    pub fn ground_attribute(&self) -> &str {
        &self.ground_attribute
    }

    /// Read a tile file and normalize it.
    ///
    /// The file is only read, never modified.
    pub fn normalize(&self, path: &Path) -> TileResult<CityModel> {
        let model = CityModel::load(path)?;
        self.normalize_model(model)
    }

    /// Normalize an already parsed tile.
    pub fn normalize_model(&self, mut model: CityModel) -> TileResult<CityModel> {
        let removed = extract_lod(&mut model, &self.lod);
        let corrected = set_base_zero(&mut model, &self.ground_attribute)?;

        debug!(
            lod = %self.lod,
            geometries_removed = removed,
            vertices_corrected = corrected,
            objects = model.objects.len(),
            "Tile normalized"
        );

        Ok(model)
    }
}
