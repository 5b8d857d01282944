//! Typed CityJSON city models.
//!
//! A [`CityModel`] is one CityJSON document: an ordered map of city objects
//! whose geometries index into a shared vertex pool. Tiles are read quantized
//! (integer vertices plus a [`Transform`]); merged models hold real-world
//! coordinates and no transform.
//!
//! # Structure
//!
//! ```text
//! CityModel
//! ├── vertices: Vertices (Quantized { transform, points } | Real(points))
//! └── objects: IndexMap<id, CityObject>
//!     └── CityObject { kind, attributes, children, geometry }
//!         └── Geometry { kind, lod, boundaries: Boundary }
//! ```
//!
//! Members this crate does not interpret (metadata, semantics, materials,
//! extensions) are carried through verbatim.

mod boundary;
mod error;
mod gzip;
mod model;
mod types;

pub use boundary::{Boundary, Ring, Shell, Solid, Surface};
pub use error::{ModelError, ModelResult};
pub use gzip::gunzip;
pub use model::CityModel;
pub use types::{CityObject, CityObjectType, Geometry, GeometryType, Lod, Transform, Vertices};
