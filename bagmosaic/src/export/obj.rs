//! Wavefront OBJ writer.

use std::io::{self, Write};

use crate::citymodel::CityModel;

/// Counts of what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    pub vertices: usize,
    pub objects: usize,
    pub faces: usize,
    /// Interior rings (holes) that have no OBJ face of their own
    pub holes_skipped: usize,
}

/// Write `model` as OBJ text.
///
/// Every vertex becomes a `v` record in pool order, so face records can use
/// the pool index + 1. Each object with polygonal geometry gets an `o` record
/// followed by one `f` record per surface, built from the exterior ring.
pub fn write_obj<W: Write>(model: &CityModel, mut out: W) -> io::Result<ObjStats> {
    let mut stats = ObjStats::default();
    let points = model.vertices.clone().into_real();

    writeln!(out, "# bagmosaic OBJ export")?;
    writeln!(out, "# vertices: {}", points.len())?;
    writeln!(out, "# objects: {}", model.objects.len())?;

    for p in &points {
        writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
    }
    stats.vertices = points.len();

    for (id, object) in &model.objects {
        let mut faces = Vec::new();
        for geometry in &object.geometry {
            geometry.boundaries.for_each_surface(|surface| {
                if let Some((exterior, holes)) = surface.split_first() {
                    stats.holes_skipped += holes.len();
                    if exterior.len() >= 3 {
                        faces.push(exterior);
                    }
                }
            });
        }
        if faces.is_empty() {
            continue;
        }

        writeln!(out, "o {}", id)?;
        for ring in &faces {
            write!(out, "f")?;
            for index in ring.iter() {
                write!(out, " {}", index + 1)?;
            }
            writeln!(out)?;
        }
        stats.objects += 1;
        stats.faces += faces.len();
    }

    Ok(stats)
}
