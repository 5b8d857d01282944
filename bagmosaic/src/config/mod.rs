//! User configuration.
//!
//! Settings live in an INI file at `~/.config/bagmosaic/config.ini` (platform
//! config directory). A missing file means defaults; CLI flags override
//! whatever the file says.
//!
//! ```text
//! [source]
//! tile_url = https://data.3dbag.nl/cityjson/.../3dbag_..._{TID}.json.gz
//! index_url = https://data.3dbag.nl/api/BAG3D_v2/wfs
//! timeout = 60
//!
//! [normalize]
//! lod = 2.2
//! ground_attribute = h_maaiveld
//!
//! [pipeline]
//! threads = 0
//! min_tiles = 1
//!
//! [editor]
//! blender = blender
//! ```

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, ConfigError, ConfigFile, EditorSettings,
    NormalizeSettings, PipelineSettings, SourceSettings, CONFIG_FILE_NAME,
};
pub use keys::ConfigKey;
