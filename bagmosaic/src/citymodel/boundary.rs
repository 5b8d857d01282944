//! Nested geometry boundaries.
//!
//! CityJSON stores geometry boundaries as nested arrays whose depth depends on
//! the geometry type:
//!
//! ```text
//! MultiPoint        [v, v, ...]                       Ring
//! MultiLineString   [[v, ...], ...]                   Vec<Ring>
//! MultiSurface      [[[v, ...], ...], ...]            Vec<Surface>
//! Solid             [[[[v, ...], ...], ...], ...]     Vec<Shell>
//! MultiSolid        [[[[[v, ...], ...], ...], ...]]   Vec<Solid>
//! ```
//!
//! The depth is decided once, when the geometry is parsed, from its declared
//! type. Every traversal afterwards goes through the visitors on [`Boundary`].

use serde::Serialize;
use serde_json::Value;

use super::types::GeometryType;

/// A closed sequence of vertex indices.
pub type Ring = Vec<usize>;

/// A polygon: exterior ring first, then interior rings.
pub type Surface = Vec<Ring>;

/// A closed set of surfaces.
pub type Shell = Vec<Surface>;

/// Exterior shell first, then interior shells.
pub type Solid = Vec<Shell>;

/// Vertex-index structure of one geometry, tagged by nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Boundary {
    MultiPoint(Ring),
    MultiLineString(Vec<Ring>),
    MultiSurface(Vec<Surface>),
    Solid(Vec<Shell>),
    MultiSolid(Vec<Solid>),
}

impl Boundary {
    /// Parse a JSON boundary array with the depth implied by `kind`.
    pub fn from_json(kind: GeometryType, value: Value) -> Result<Self, serde_json::Error> {
        let boundary = match kind {
            GeometryType::MultiPoint | GeometryType::GeometryInstance => {
                Boundary::MultiPoint(serde_json::from_value(value)?)
            }
            GeometryType::MultiLineString => Boundary::MultiLineString(serde_json::from_value(value)?),
            GeometryType::MultiSurface | GeometryType::CompositeSurface => {
                Boundary::MultiSurface(serde_json::from_value(value)?)
            }
            GeometryType::Solid => Boundary::Solid(serde_json::from_value(value)?),
            GeometryType::MultiSolid | GeometryType::CompositeSolid => {
                Boundary::MultiSolid(serde_json::from_value(value)?)
            }
        };
        Ok(boundary)
    }

    /// Visit every terminal index sequence, depth first.
    pub fn for_each_ring<'a>(&'a self, f: impl FnMut(&'a Ring)) {
        match self {
            Boundary::MultiPoint(ring) => std::iter::once(ring).for_each(f),
            Boundary::MultiLineString(rings) => rings.iter().for_each(f),
            Boundary::MultiSurface(surfaces) => surfaces.iter().flatten().for_each(f),
            Boundary::Solid(shells) => shells.iter().flatten().flatten().for_each(f),
            Boundary::MultiSolid(solids) => solids.iter().flatten().flatten().flatten().for_each(f),
        }
    }

    /// Mutable counterpart of [`Boundary::for_each_ring`].
    pub fn for_each_ring_mut(&mut self, f: impl FnMut(&mut Ring)) {
        match self {
            Boundary::MultiPoint(ring) => std::iter::once(ring).for_each(f),
            Boundary::MultiLineString(rings) => rings.iter_mut().for_each(f),
            Boundary::MultiSurface(surfaces) => surfaces.iter_mut().flatten().for_each(f),
            Boundary::Solid(shells) => shells.iter_mut().flatten().flatten().for_each(f),
            Boundary::MultiSolid(solids) => {
                solids.iter_mut().flatten().flatten().flatten().for_each(f)
            }
        }
    }

    /// Visit every vertex index in document order.
    pub fn for_each_index(&self, mut f: impl FnMut(usize)) {
        self.for_each_ring(|ring| ring.iter().copied().for_each(&mut f));
    }

    /// Visit every polygonal surface. Point and line geometries have none.
    pub fn for_each_surface<'a>(&'a self, f: impl FnMut(&'a Surface)) {
        match self {
            Boundary::MultiPoint(_) | Boundary::MultiLineString(_) => {}
            Boundary::MultiSurface(surfaces) => surfaces.iter().for_each(f),
            Boundary::Solid(shells) => shells.iter().flatten().for_each(f),
            Boundary::MultiSolid(solids) => solids.iter().flatten().flatten().for_each(f),
        }
    }

    /// Add `offset` to every vertex index.
    pub fn offset_indices(&mut self, offset: usize) {
        self.for_each_ring_mut(|ring| ring.iter_mut().for_each(|index| *index += offset));
    }

    /// Largest vertex index referenced, if any.
    pub fn max_index(&self) -> Option<usize> {
        let mut max = None;
        self.for_each_index(|index| max = max.max(Some(index)));
        max
    }
}
