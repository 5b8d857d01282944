//! Level-of-detail extraction and per-building base correction.

use std::collections::HashMap;

use tracing::trace;

use super::error::{TileError, TileResult};
use crate::citymodel::{CityModel, CityObject, Lod, Vertices};

/// Drop every geometry not tagged with `lod`, on every object.
///
/// Objects left without geometry stay in the model. Returns the number of
/// geometries removed.
pub fn extract_lod(model: &mut CityModel, lod: &Lod) -> usize {
    let mut removed = 0;
    for object in model.objects.values_mut() {
        let before = object.geometry.len();
        object.geometry.retain(|g| g.has_lod(lod));
        removed += before - object.geometry.len();
    }
    removed
}

/// Zero-reference every building's geometry to its own ground level.
///
/// For each building (document order), `base = floor(ground / scale.z)` in
/// vertex units is recorded for every vertex reachable from its parts. A
/// vertex reached from several buildings keeps the base of the last one.
/// Each recorded vertex then has its base subtracted from z exactly once.
///
/// Returns the number of corrected vertices.
pub fn set_base_zero(model: &mut CityModel, ground_attribute: &str) -> TileResult<usize> {
    let CityModel {
        objects, vertices, ..
    } = model;

    let Vertices::Quantized { transform, points } = vertices else {
        return Err(TileError::MissingTransform);
    };
    let scale_z = transform.scale[2];
    if scale_z.is_nan() || scale_z <= 0.0 {
        return Err(TileError::InvalidScale(scale_z));
    }

    let mut corrections: HashMap<usize, i64> = HashMap::new();
    for (id, building) in objects.iter().filter(|(_, o)| o.is_building()) {
        let ground = ground_elevation(id, building, ground_attribute)?;
        let base = base_units(id, ground, scale_z)?;
        trace!(building = %id, ground, base, "Collecting building vertices");

        for child in &building.children {
            let part = objects.get(child).ok_or_else(|| TileError::MissingChild {
                building: id.clone(),
                child: child.clone(),
            })?;
            for geometry in &part.geometry {
                geometry.boundaries.for_each_index(|index| {
                    corrections.insert(index, base);
                });
            }
        }
    }

    let len = points.len();
    for (&index, &base) in &corrections {
        let point = points
            .get_mut(index)
            .ok_or(TileError::IndexOutOfRange { index, len })?;
        point[2] = point[2]
            .checked_sub(base)
            .ok_or(TileError::HeightOverflow { index, base })?;
    }

    Ok(corrections.len())
}

/// `floor(ground / scale_z)` as a vertex-unit offset.
fn base_units(id: &str, ground: f64, scale_z: f64) -> TileResult<i64> {
    let base = (ground / scale_z).floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !base.is_finite() || base < i64::MIN as f64 || base >= i64::MAX as f64 {
        return Err(TileError::GroundOutOfRange {
            building: id.to_string(),
            ground,
        });
    }
    Ok(base as i64)
}

/// Read a building's ground elevation in real-world units.
fn ground_elevation(id: &str, building: &CityObject, attribute: &str) -> TileResult<f64> {
    let value = building
        .attributes
        .get(attribute)
        .ok_or_else(|| TileError::MissingAttribute {
            building: id.to_string(),
            attribute: attribute.to_string(),
        })?;
    value.as_f64().ok_or_else(|| TileError::InvalidAttribute {
        building: id.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}
