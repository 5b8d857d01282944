//! Mesh export.
//!
//! The merged model is written as Wavefront OBJ, which every 3D editor can
//! import. The file is first written to a temporary file next to the target
//! and then renamed into place, so the target path either holds a complete
//! export or is left as it was.

mod obj;

pub use obj::{write_obj, ObjStats};

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::citymodel::CityModel;

/// Errors that can occur while exporting a mesh.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the mesh failed; no partial file was left at the target.
    #[error("failed to write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Export `model` as an OBJ file at `path`.
pub fn export_obj(model: &CityModel, path: &Path) -> Result<ObjStats, ExportError> {
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    let stats = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let stats = write_obj(model, &mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        stats
    };
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    info!(
        path = %path.display(),
        vertices = stats.vertices,
        objects = stats.objects,
        faces = stats.faces,
        "Mesh exported"
    );

    Ok(stats)
}
