//! Planar bounding boxes and tile footprints.

use super::request::TileId;

/// Axis-aligned bounding box in projected coordinates (e.g. EPSG:28992).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Square box of half-width `radius` centred on `(x, y)`.
    pub fn around(x: f64, y: f64, radius: f64) -> Self {
        Self::new(x - radius, y - radius, x + radius, y + radius)
    }

    /// Smallest box containing all points, or `None` for an empty slice.
    pub fn of_points(points: &[[f64; 2]]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first[0], first[1], first[0], first[1]);
        Some(points.iter().fold(init, |b, p| {
            Self::new(
                b.min_x.min(p[0]),
                b.min_y.min(p[1]),
                b.max_x.max(p[0]),
                b.max_y.max(p[1]),
            )
        }))
    }

    /// Whether the boxes overlap or touch.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Comma-separated `minx,miny,maxx,maxy`, as used in WFS `bbox` parameters.
    pub fn to_query(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// A tile as reported by the tile index: its id and footprint polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    pub id: TileId,
    /// Exterior ring of the footprint
    pub footprint: Vec<[f64; 2]>,
}

impl TileRecord {
    pub fn new(id: TileId, footprint: Vec<[f64; 2]>) -> Self {
        Self { id, footprint }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::of_points(&self.footprint)
    }
}
