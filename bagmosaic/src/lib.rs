//! bagmosaic - 3D BAG tile mosaics for Blender
//!
//! This library downloads CityJSON tiles of the 3D BAG around a point of
//! interest, zero-references every building to its ground level, merges the
//! tiles into one model centred on the point, and exports it as an OBJ mesh
//! together with a Blender import script.

pub mod citymodel;
pub mod config;
pub mod editor;
pub mod export;
pub mod logging;
pub mod merge;
pub mod normalize;
pub mod parallel;
pub mod pipeline;
pub mod shift;
pub mod source;
pub mod tile;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
