//! City object, geometry and vertex types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::boundary::Boundary;

/// Geometry types defined by CityJSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    MultiPoint,
    MultiLineString,
    MultiSurface,
    CompositeSurface,
    Solid,
    MultiSolid,
    CompositeSolid,
    GeometryInstance,
}

/// Level of detail tag of a geometry, such as `"2.2"`.
///
/// Older files write the LoD as a JSON number; both forms compare by their
/// textual value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LodRepr", into = "String")]
pub struct Lod(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum LodRepr {
    Text(String),
    Number(serde_json::Number),
}

impl From<LodRepr> for Lod {
    fn from(repr: LodRepr) -> Self {
        match repr {
            LodRepr::Text(s) => Lod(s),
            LodRepr::Number(n) => Lod(n.to_string()),
        }
    }
}

impl From<Lod> for String {
    fn from(lod: Lod) -> Self {
        lod.0
    }
}

impl From<&str> for Lod {
    fn from(s: &str) -> Self {
        Lod(s.to_string())
    }
}

impl FromStr for Lod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Lod(s.trim().to_string()))
    }
}

impl Lod {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geometry record of a city object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry", into = "RawGeometry")]
pub struct Geometry {
    pub kind: GeometryType,
    pub lod: Option<Lod>,
    pub boundaries: Boundary,
    /// Semantics, materials, textures and anything else, kept verbatim.
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: GeometryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lod: Option<Lod>,
    boundaries: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = serde_json::Error;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Ok(Geometry {
            kind: raw.kind,
            lod: raw.lod,
            boundaries: Boundary::from_json(raw.kind, raw.boundaries)?,
            extra: raw.extra,
        })
    }
}

impl From<Geometry> for RawGeometry {
    fn from(geometry: Geometry) -> Self {
        // Serializing a Boundary cannot fail: it only holds integers.
        let boundaries = serde_json::to_value(&geometry.boundaries).unwrap_or(Value::Null);
        RawGeometry {
            kind: geometry.kind,
            lod: geometry.lod,
            boundaries,
            extra: geometry.extra,
        }
    }
}

impl Geometry {
    pub fn new(kind: GeometryType, lod: impl Into<Lod>, boundaries: Boundary) -> Self {
        Self {
            kind,
            lod: Some(lod.into()),
            boundaries,
            extra: Map::new(),
        }
    }

    /// Whether this geometry is tagged with the given level of detail.
    pub fn has_lod(&self, lod: &Lod) -> bool {
        self.lod.as_ref() == Some(lod)
    }
}

/// City object type. Only buildings and their parts drive behaviour; every
/// other type is carried through by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CityObjectType {
    Building,
    BuildingPart,
    Other(String),
}

impl From<String> for CityObjectType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Building" => CityObjectType::Building,
            "BuildingPart" => CityObjectType::BuildingPart,
            _ => CityObjectType::Other(s),
        }
    }
}

impl From<CityObjectType> for String {
    fn from(kind: CityObjectType) -> Self {
        match kind {
            CityObjectType::Building => "Building".to_string(),
            CityObjectType::BuildingPart => "BuildingPart".to_string(),
            CityObjectType::Other(s) => s,
        }
    }
}

/// A member of the `CityObjects` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityObject {
    #[serde(rename = "type")]
    pub kind: CityObjectType,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<Geometry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CityObject {
    /// Create an empty object of the given type.
    pub fn new(kind: CityObjectType) -> Self {
        Self {
            kind,
            attributes: Map::new(),
            children: Vec::new(),
            parents: Vec::new(),
            geometry: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn is_building(&self) -> bool {
        self.kind == CityObjectType::Building
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, id: impl Into<String>) -> Self {
        self.children.push(id.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry.push(geometry);
        self
    }
}

/// Quantization transform: `real = q * scale + translate`, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 3],
    pub translate: [f64; 3],
}

impl Transform {
    pub fn new(scale: [f64; 3], translate: [f64; 3]) -> Self {
        Self { scale, translate }
    }

    /// Convert a quantized vertex to real-world units.
    #[inline]
    pub fn apply(&self, q: [i64; 3]) -> [f64; 3] {
        [
            q[0] as f64 * self.scale[0] + self.translate[0],
            q[1] as f64 * self.scale[1] + self.translate[1],
            q[2] as f64 * self.scale[2] + self.translate[2],
        ]
    }
}

/// The shared vertex pool of a city model.
///
/// Tiles arrive quantized; the transform lives with the integer points so a
/// model can never hold one without the other.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertices {
    Quantized {
        transform: Transform,
        points: Vec<[i64; 3]>,
    },
    Real(Vec<[f64; 3]>),
}

impl Default for Vertices {
    fn default() -> Self {
        Vertices::Real(Vec::new())
    }
}

impl Vertices {
    pub fn len(&self) -> usize {
        match self {
            Vertices::Quantized { points, .. } => points.len(),
            Vertices::Real(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Vertices::Quantized { transform, .. } => Some(transform),
            Vertices::Real(_) => None,
        }
    }

    /// Consume the pool and return real-world coordinates.
    pub fn into_real(self) -> Vec<[f64; 3]> {
        match self {
            Vertices::Quantized { transform, points } => {
                points.into_iter().map(|q| transform.apply(q)).collect()
            }
            Vertices::Real(points) => points,
        }
    }

    /// Convert in place to real-world coordinates, dropping the transform.
    pub fn make_real(&mut self) -> &mut [[f64; 3]] {
        let points = std::mem::take(self).into_real();
        *self = Vertices::Real(points);
        match self {
            Vertices::Real(points) => points,
            Vertices::Quantized { .. } => &mut [],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lod_accepts_numbers_and_strings() {
        let a: Lod = serde_json::from_value(json!("2.2")).unwrap();
        let b: Lod = serde_json::from_value(json!(2.2)).unwrap();
        let c: Lod = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(c.as_str(), "1");
    }

    #[test]
    fn test_geometry_roundtrip_keeps_extra_members() {
        let value = json!({
            "type": "MultiSurface",
            "lod": "1.2",
            "boundaries": [[[0, 1, 2]]],
            "semantics": {"surfaces": [{"type": "RoofSurface"}], "values": [0]}
        });
        let geometry: Geometry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(geometry.kind, GeometryType::MultiSurface);
        assert!(geometry.extra.contains_key("semantics"));
        assert_eq!(serde_json::to_value(&geometry).unwrap(), value);
    }

    #[test]
    fn test_unknown_object_type_is_kept() {
        let object: CityObject =
            serde_json::from_value(json!({"type": "+GenericThing", "geometry": []})).unwrap();
        assert_eq!(object.kind, CityObjectType::Other("+GenericThing".to_string()));
        assert_eq!(serde_json::to_value(&object).unwrap(), json!({"type": "+GenericThing"}));
    }

    #[test]
    fn test_transform_apply() {
        let t = Transform::new([0.01, 0.01, 0.01], [100.0, 200.0, 0.0]);
        assert_eq!(t.apply([100, 200, 300]), [101.0, 202.0, 3.0]);
    }

    #[test]
    fn test_make_real_drops_transform() {
        let mut vertices = Vertices::Quantized {
            transform: Transform::new([0.5, 0.5, 0.5], [1.0, 1.0, 1.0]),
            points: vec![[2, 4, 6]],
        };
        assert_eq!(vertices.make_real().to_vec(), vec![[2.0, 3.0, 4.0]]);
        assert!(vertices.transform().is_none());
    }
}
