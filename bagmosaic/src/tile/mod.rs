//! Tile identifiers, inputs and footprints.

mod bbox;
mod request;

pub use bbox::{BoundingBox, TileRecord};
pub use request::{TileId, TileInput};
