//! Merging normalized tiles into one model.
//!
//! The first model is the base. Every following model's vertices are
//! appended to the base pool and its boundary indices are offset by the base
//! vertex count at the moment it is merged:
//!
//! ```text
//! base:   v0 v1 v2 v3            objects index 0..4
//! tile 2: w0 w1 w2          →    indices + 4  (4..7)
//! tile 3: u0 u1             →    indices + 7  (7..9)
//! ```
//!
//! All vertices are converted to real-world units first, since each tile has
//! its own quantization transform. Seam vertices shared by neighbouring tiles
//! stay duplicated.

use thiserror::Error;
use tracing::{debug, info};

use crate::citymodel::{CityModel, Vertices};

/// Errors that abort a merge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// No models were given.
    #[error("nothing to merge")]
    Empty,

    /// Two tiles contain an object with the same id.
    #[error("object id {id} appears in more than one tile")]
    Collision { id: String },
}

/// Merge models in order into one real-coordinate model without a transform.
///
/// Object ids must be unique across all models; a duplicate fails the whole
/// merge with [`MergeError::Collision`].
pub fn merge(models: Vec<CityModel>) -> Result<CityModel, MergeError> {
    let mut models = models.into_iter();
    let mut base = models.next().ok_or(MergeError::Empty)?;
    base.vertices.make_real();

    let mut merged = 1;
    for model in models {
        append(&mut base, model)?;
        merged += 1;
    }

    info!(
        tiles = merged,
        objects = base.objects.len(),
        vertices = base.vertices.len(),
        "Models merged"
    );

    Ok(base)
}

/// Append one model to a real-coordinate base.
fn append(base: &mut CityModel, model: CityModel) -> Result<(), MergeError> {
    if let Some(id) = model.objects.keys().find(|id| base.objects.contains_key(*id)) {
        return Err(MergeError::Collision { id: id.clone() });
    }

    let offset = base.vertices.len();
    debug!(
        offset,
        vertices = model.vertices.len(),
        objects = model.objects.len(),
        "Appending model"
    );

    let mut points = std::mem::take(&mut base.vertices).into_real();
    points.extend(model.vertices.into_real());
    base.vertices = Vertices::Real(points);

    for (id, mut object) in model.objects {
        for geometry in &mut object.geometry {
            geometry.boundaries.offset_indices(offset);
        }
        base.objects.insert(id, object);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citymodel::{
        Boundary, CityObject, CityObjectType, Geometry, GeometryType, Transform,
    };

    fn tile(ids: &[&str], points: Vec<[i64; 3]>, translate: [f64; 3]) -> CityModel {
        let n = points.len();
        let mut model = CityModel::new(Vertices::Quantized {
            transform: Transform::new([0.5, 0.5, 0.5], translate),
            points,
        });
        for id in ids {
            model.objects.insert(
                id.to_string(),
                CityObject::new(CityObjectType::BuildingPart).with_geometry(Geometry::new(
                    GeometryType::MultiSurface,
                    "2.2",
                    Boundary::MultiSurface(vec![vec![(0..n).collect()]]),
                )),
            );
        }
        model
    }

    fn indices(model: &CityModel, id: &str) -> Vec<usize> {
        let mut seen = Vec::new();
        for g in &model.objects[id].geometry {
            g.boundaries.for_each_index(|i| seen.push(i));
        }
        seen
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(merge(Vec::new()).unwrap_err(), MergeError::Empty);
    }

    #[test]
    fn test_single_model_is_dequantized() {
        let a = tile(&["a"], vec![[2, 4, 6]], [10.0, 20.0, 0.0]);
        let merged = merge(vec![a.clone()]).unwrap();

        assert!(merged.transform().is_none());
        assert_eq!(merged.vertices, Vertices::Real(vec![[11.0, 22.0, 3.0]]));
        assert_eq!(merged.objects, a.objects);
    }

    #[test]
    fn test_offsets_follow_running_vertex_count() {
        let a = tile(&["a"], vec![[0, 0, 0]; 4], [0.0; 3]);
        let b = tile(&["b"], vec![[0, 0, 0]; 3], [0.0; 3]);
        let c = tile(&["c"], vec![[0, 0, 0]; 2], [0.0; 3]);

        let merged = merge(vec![a, b, c]).unwrap();

        assert_eq!(merged.vertices.len(), 9);
        assert_eq!(indices(&merged, "a"), vec![0, 1, 2, 3]);
        assert_eq!(indices(&merged, "b"), vec![4, 5, 6]);
        assert_eq!(indices(&merged, "c"), vec![7, 8]);
        merged.check_indices().unwrap();
    }

    #[test]
    fn test_each_tile_uses_its_own_transform() {
        let a = tile(&["a"], vec![[2, 2, 2]], [0.0, 0.0, 0.0]);
        let b = tile(&["b"], vec![[2, 2, 2]], [100.0, 200.0, 0.0]);

        let merged = merge(vec![a, b]).unwrap();

        assert_eq!(
            merged.vertices,
            Vertices::Real(vec![[1.0, 1.0, 1.0], [101.0, 201.0, 1.0]])
        );
    }

    #[test]
    fn test_collision_names_the_id() {
        let a = tile(&["a", "shared"], vec![[0, 0, 0]], [0.0; 3]);
        let b = tile(&["shared"], vec![[0, 0, 0]], [0.0; 3]);

        let err = merge(vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            MergeError::Collision {
                id: "shared".to_string()
            }
        );
    }

    #[test]
    fn test_object_order_follows_input_order() {
        let a = tile(&["z"], vec![[0, 0, 0]], [0.0; 3]);
        let b = tile(&["a"], vec![[0, 0, 0]], [0.0; 3]);
        let merged = merge(vec![a, b]).unwrap();
        let ids: Vec<_> = merged.objects.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_merged_indices_stay_in_range(sizes in prop::collection::vec(1usize..20, 1..8)) {
                let models: Vec<_> = sizes
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| tile(&[format!("obj{}", i).as_str()], vec![[1, 1, 1]; n], [0.0; 3]))
                    .collect();

                let merged = merge(models).unwrap();

                prop_assert_eq!(merged.vertices.len(), sizes.iter().sum::<usize>());
                prop_assert!(merged.check_indices().is_ok());
            }
        }
    }
}
