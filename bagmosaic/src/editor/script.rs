//! Blender control script generation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Import settings for the mosaic OBJ: one object, no splitting, Z up.
/// `wm.obj_import` is the importer of Blender 3.2 and later.
const IMPORT_OPTIONS: &str = "use_split_objects=False, use_split_groups=False, \
forward_axis='Y', up_axis='Z'";

/// The same settings for the legacy `import_scene.obj` add-on.
const LEGACY_IMPORT_OPTIONS: &str = "filter_glob='*.obj;*.mtl', use_edges=False, \
use_smooth_groups=False, use_split_objects=False, use_split_groups=False, \
use_groups_as_vgroups=False, use_image_search=False, split_mode='OFF', \
global_clight_size=0, axis_forward='Y', axis_up='Z'";

/// Script importing a mesh and saving it as a Blender project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorScript {
    pub mesh_path: PathBuf,
    pub project_path: PathBuf,
}

impl EditorScript {
    pub fn new(mesh_path: impl Into<PathBuf>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            project_path: project_path.into(),
        }
    }

    /// Render the Python source.
    ///
    /// The script picks whichever OBJ importer the running Blender has.
    pub fn render(&self) -> String {
        let mesh = python_string(&self.mesh_path);
        format!(
            "import bpy\n\
             \n\
             bpy.ops.wm.read_factory_settings(use_empty=True)\n\
             if \"obj_import\" in dir(bpy.ops.wm):\n    \
             bpy.ops.wm.obj_import(filepath={mesh}, {IMPORT_OPTIONS})\n\
             else:\n    \
             bpy.ops.import_scene.obj(filepath={mesh}, {LEGACY_IMPORT_OPTIONS})\n\
             bpy.ops.wm.save_as_mainfile(filepath={})\n",
            python_string(&self.project_path),
        )
    }

    /// Write the script to `path`.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }
}

/// Quote a path as a Python string literal.
///
/// JSON string escaping is a subset of Python's, so the JSON encoding of the
/// path is a valid literal.
fn python_string(path: &Path) -> String {
    serde_json::Value::String(path.to_string_lossy().into_owned()).to_string()
}
