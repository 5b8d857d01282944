//! The CityJSON document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ModelError, ModelResult};
use super::gzip::gunzip;
use super::types::{CityObject, Transform, Vertices};

/// Value of the top-level `type` member.
const CITYJSON_TYPE: &str = "CityJSON";

/// Version written for models built from scratch.
const DEFAULT_VERSION: &str = "1.1";

/// A CityJSON document: city objects sharing one vertex pool.
///
/// Objects keep their document order. Every vertex index in every boundary
/// is checked against the vertex pool when a model is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCityModel", into = "RawCityModel")]
pub struct CityModel {
    pub version: String,
    pub objects: IndexMap<String, CityObject>,
    pub vertices: Vertices,
    /// Metadata, extensions and anything else at the top level, kept verbatim.
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct RawCityModel {
    #[serde(rename = "type")]
    kind: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transform: Option<Transform>,
    #[serde(rename = "CityObjects")]
    objects: IndexMap<String, CityObject>,
    vertices: RawVertices,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawVertices {
    Integer(Vec<[i64; 3]>),
    Float(Vec<[f64; 3]>),
}

impl TryFrom<RawCityModel> for CityModel {
    type Error = ModelError;

    fn try_from(raw: RawCityModel) -> Result<Self, Self::Error> {
        if raw.kind != CITYJSON_TYPE {
            return Err(ModelError::NotCityJson(raw.kind));
        }

        let vertices = match (raw.transform, raw.vertices) {
            (Some(transform), RawVertices::Integer(points)) => {
                Vertices::Quantized { transform, points }
            }
            // Writers sometimes emit quantized values as `12.0`.
            (Some(transform), RawVertices::Float(points)) => {
                let mut quantized = Vec::with_capacity(points.len());
                for (index, p) in points.iter().enumerate() {
                    if p.iter().any(|c| c.fract() != 0.0) {
                        return Err(ModelError::NonIntegerVertex { index });
                    }
                    quantized.push([p[0] as i64, p[1] as i64, p[2] as i64]);
                }
                Vertices::Quantized {
                    transform,
                    points: quantized,
                }
            }
            (None, RawVertices::Integer(points)) => Vertices::Real(
                points
                    .into_iter()
                    .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
                    .collect(),
            ),
            (None, RawVertices::Float(points)) => Vertices::Real(points),
        };

        let model = CityModel {
            version: raw.version,
            objects: raw.objects,
            vertices,
            extra: raw.extra,
        };
        model.check_indices()?;
        Ok(model)
    }
}

impl From<CityModel> for RawCityModel {
    fn from(model: CityModel) -> Self {
        let (transform, vertices) = match model.vertices {
            Vertices::Quantized { transform, points } => {
                (Some(transform), RawVertices::Integer(points))
            }
            Vertices::Real(points) => (None, RawVertices::Float(points)),
        };
        RawCityModel {
            kind: CITYJSON_TYPE.to_string(),
            version: model.version,
            transform,
            objects: model.objects,
            vertices,
            extra: model.extra,
        }
    }
}

impl Default for CityModel {
    fn default() -> Self {
        Self::new(Vertices::default())
    }
}

impl CityModel {
    /// Create an empty model around the given vertex pool.
    pub fn new(vertices: Vertices) -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            objects: IndexMap::new(),
            vertices,
            extra: Map::new(),
        }
    }

    /// Parse a model from CityJSON bytes.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Read and parse a CityJSON file, gzipped or not.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let read_err = |e| ModelError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        };
        let bytes = fs::read(path).map_err(read_err)?;
        let bytes = gunzip(bytes).map_err(read_err)?;
        Self::from_slice(&bytes)
    }

    /// Serialize the model as CityJSON.
    pub fn to_vec(&self) -> ModelResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Write the model as a CityJSON file.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let file = File::create(path).map_err(|e| ModelError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush().map_err(|e| ModelError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The quantization transform, present only before merging.
    pub fn transform(&self) -> Option<&Transform> {
        self.vertices.transform()
    }

    /// Iterate over the buildings in document order.
    pub fn buildings(&self) -> impl Iterator<Item = (&String, &CityObject)> {
        self.objects.iter().filter(|(_, object)| object.is_building())
    }

    /// Number of geometries across all objects.
    pub fn geometry_count(&self) -> usize {
        self.objects.values().map(|o| o.geometry.len()).sum()
    }

    /// Verify that every boundary index points into the vertex pool.
    pub fn check_indices(&self) -> ModelResult<()> {
        let len = self.vertices.len();
        for (id, object) in &self.objects {
            for geometry in &object.geometry {
                if let Some(index) = geometry.boundaries.max_index().filter(|&i| i >= len) {
                    return Err(ModelError::IndexOutOfRange {
                        object: id.clone(),
                        index,
                        len,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citymodel::CityObjectType;
    use serde_json::json;

    fn tile_json() -> Value {
        json!({
            "type": "CityJSON",
            "version": "1.1",
            "transform": {"scale": [0.001, 0.001, 0.001], "translate": [85000.0, 447000.0, 0.0]},
            "metadata": {"referenceSystem": "https://www.opengis.net/def/crs/EPSG/0/7415"},
            "CityObjects": {
                "b2": {"type": "Building", "attributes": {"h_maaiveld": 0.5}, "children": ["b2-0"]},
                "b2-0": {
                    "type": "BuildingPart",
                    "parents": ["b2"],
                    "geometry": [{"type": "MultiSurface", "lod": "2.2", "boundaries": [[[0, 1, 2]]]}]
                },
                "b1": {"type": "Building", "attributes": {"h_maaiveld": 0.5}}
            },
            "vertices": [[0, 0, 0], [1000, 0, 0], [1000, 1000, 0]]
        })
    }

    #[test]
    fn test_parse_quantized_tile() {
        let bytes = serde_json::to_vec(&tile_json()).unwrap();
        let model = CityModel::from_slice(&bytes).unwrap();

        assert_eq!(model.vertices.len(), 3);
        assert_eq!(model.transform().unwrap().scale, [0.001, 0.001, 0.001]);
        assert!(model.extra.contains_key("metadata"));
        assert_eq!(model.objects["b2-0"].kind, CityObjectType::BuildingPart);
    }

    #[test]
    fn test_document_order_is_preserved() {
        // `json!` sorts object keys, so the document is spelled out as text
        let text = r#"{
            "type": "CityJSON",
            "version": "1.1",
            "transform": {"scale": [0.01, 0.01, 0.01], "translate": [0.0, 0.0, 0.0]},
            "CityObjects": {
                "z": {"type": "Building", "attributes": {"h_maaiveld": 1.0}},
                "m": {"type": "BuildingPart", "parents": ["z"]},
                "a": {"type": "Building", "attributes": {"h_maaiveld": 3.0}}
            },
            "vertices": []
        }"#;
        let model = CityModel::from_slice(text.as_bytes()).unwrap();

        let ids: Vec<_> = model.objects.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
        let buildings: Vec<_> = model.buildings().map(|(id, _)| id.as_str()).collect();
        assert_eq!(buildings, vec!["z", "a"]);

        let written = String::from_utf8(model.to_vec().unwrap()).unwrap();
        let z = written.find("\"z\"").unwrap();
        let a = written.find("\"a\"").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let bytes = serde_json::to_vec(&tile_json()).unwrap();
        let model = CityModel::from_slice(&bytes).unwrap();
        let reparsed = CityModel::from_slice(&model.to_vec().unwrap()).unwrap();
        assert_eq!(model.to_vec().unwrap(), reparsed.to_vec().unwrap());
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut value = tile_json();
        value["CityObjects"]["b2-0"]["geometry"][0]["boundaries"] = json!([[[0, 1, 3]]]);
        let err = CityModel::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap_err();
        // serde wraps conversion errors as a parse error carrying the message
        assert!(err.to_string().contains("references vertex 3"));
    }

    #[test]
    fn test_non_integer_quantized_vertex_is_rejected() {
        let mut value = tile_json();
        value["vertices"] = json!([[0, 0, 0], [0.5, 0, 0], [0, 0, 0]]);
        let err = CityModel::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap_err();
        assert!(err.to_string().contains("vertex 1"));
    }

    #[test]
    fn test_wrong_document_type_is_rejected() {
        let mut value = tile_json();
        value["type"] = json!("FeatureCollection");
        let err = CityModel::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn test_model_without_transform_is_real() {
        let mut value = tile_json();
        value.as_object_mut().unwrap().remove("transform");
        let model = CityModel::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap();
        assert!(matches!(model.vertices, Vertices::Real(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tile.json");
        let model = CityModel::from_slice(&serde_json::to_vec(&tile_json()).unwrap()).unwrap();
        model.save(&path).unwrap();
        assert_eq!(CityModel::load(&path).unwrap(), model);
    }

    #[test]
    fn test_load_gzipped_tile() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write as _;

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("3dbag_v210908_fd2cee53_5910.json.gz");
        let bytes = serde_json::to_vec(&tile_json()).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let model = CityModel::load(&path).unwrap();
        assert_eq!(model, CityModel::from_slice(&bytes).unwrap());
    }

    #[test]
    fn test_load_corrupt_gzip_is_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.json.gz");
        fs::write(&path, [0x1f, 0x8b, 0x00, 0x01]).unwrap();

        let err = CityModel::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::ReadFailed { .. }));
    }
}
