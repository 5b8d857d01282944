//! Re-centering a model on a local origin.
//!
//! Projected coordinates are large (hundreds of kilometres), which leaves
//! little single-precision headroom for building-scale detail in an editor.
//! Shifting x/y to an origin near the point of interest keeps coordinates small.

use tracing::debug;

use crate::citymodel::CityModel;

/// A planar origin in the model's coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl Origin {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Translate every vertex by `-origin` in x and y; z is untouched.
///
/// A quantized model is converted to real-world coordinates first.
pub fn shift(model: &mut CityModel, origin: Origin) {
    let points = model.vertices.make_real();
    for p in points.iter_mut() {
        p[0] -= origin.x;
        p[1] -= origin.y;
    }
    debug!(x = origin.x, y = origin.y, vertices = points.len(), "Origin shifted");
}
