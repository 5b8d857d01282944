//! Loading and saving the INI configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::editor::DEFAULT_BLENDER;
use crate::normalize::{DEFAULT_GROUND_ATTRIBUTE, DEFAULT_LOD};
use crate::source::{DEFAULT_INDEX_URL, DEFAULT_TILE_URL, DEFAULT_TIMEOUT_SECS};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `~/.config/bagmosaic` or the platform equivalent.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bagmosaic")
}

/// Default location of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// `[source]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Tile URL template containing `{TID}`
    pub tile_url: String,
    /// WFS endpoint of the tile index
    pub index_url: String,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[normalize]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeSettings {
    pub lod: String,
    pub ground_attribute: String,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            lod: DEFAULT_LOD.to_string(),
            ground_attribute: DEFAULT_GROUND_ATTRIBUTE.to_string(),
        }
    }
}

/// `[pipeline]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Worker threads, 0 for available parallelism
    pub threads: usize,
    /// Minimum number of normalized tiles for a run to proceed
    pub min_tiles: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            min_tiles: 1,
        }
    }
}

/// `[editor]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    /// Blender executable; `None` disables the editor step.
    pub blender: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            blender: Some(PathBuf::from(DEFAULT_BLENDER)),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub source: SourceSettings,
    pub normalize: NormalizeSettings,
    pub pipeline: PipelineSettings,
    pub editor: EditorSettings,
}

impl ConfigFile {
    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if it does not exist.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("source")) {
            if let Some(v) = section.get("tile_url") {
                config.source.tile_url = v.to_string();
            }
            if let Some(v) = section.get("index_url") {
                config.source.index_url = v.to_string();
            }
            if let Some(v) = section.get("timeout") {
                config.source.timeout = parse_value("source.timeout", v)?;
            }
        }

        if let Some(section) = ini.section(Some("normalize")) {
            if let Some(v) = section.get("lod") {
                config.normalize.lod = v.to_string();
            }
            if let Some(v) = section.get("ground_attribute") {
                config.normalize.ground_attribute = v.to_string();
            }
        }

        if let Some(section) = ini.section(Some("pipeline")) {
            if let Some(v) = section.get("threads") {
                config.pipeline.threads = parse_value("pipeline.threads", v)?;
            }
            if let Some(v) = section.get("min_tiles") {
                config.pipeline.min_tiles = parse_value("pipeline.min_tiles", v)?;
            }
        }

        if let Some(section) = ini.section(Some("editor")) {
            if let Some(v) = section.get("blender") {
                config.editor.blender = optional_path(v);
            }
        }

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("source"))
            .set("tile_url", self.source.tile_url.as_str())
            .set("index_url", self.source.index_url.as_str())
            .set("timeout", self.source.timeout.to_string());
        ini.with_section(Some("normalize"))
            .set("lod", self.normalize.lod.as_str())
            .set("ground_attribute", self.normalize.ground_attribute.as_str());
        ini.with_section(Some("pipeline"))
            .set("threads", self.pipeline.threads.to_string())
            .set("min_tiles", self.pipeline.min_tiles.to_string());
        ini.with_section(Some("editor")).set(
            "blender",
            self.editor
                .blender
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        ini
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }
}

pub(super) fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

pub(super) fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}
