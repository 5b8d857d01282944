//! Addressing individual settings as `section.key`.

use std::fmt;
use std::str::FromStr;

use super::file::{optional_path, parse_value, ConfigError, ConfigFile};

/// One setting of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SourceTileUrl,
    SourceIndexUrl,
    SourceTimeout,
    NormalizeLod,
    NormalizeGroundAttribute,
    PipelineThreads,
    PipelineMinTiles,
    EditorBlender,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SourceTileUrl,
            ConfigKey::SourceIndexUrl,
            ConfigKey::SourceTimeout,
            ConfigKey::NormalizeLod,
            ConfigKey::NormalizeGroundAttribute,
            ConfigKey::PipelineThreads,
            ConfigKey::PipelineMinTiles,
            ConfigKey::EditorBlender,
        ]
    }

    /// INI section the key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SourceTileUrl | ConfigKey::SourceIndexUrl | ConfigKey::SourceTimeout => {
                "source"
            }
            ConfigKey::NormalizeLod | ConfigKey::NormalizeGroundAttribute => "normalize",
            ConfigKey::PipelineThreads | ConfigKey::PipelineMinTiles => "pipeline",
            ConfigKey::EditorBlender => "editor",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SourceTileUrl => "tile_url",
            ConfigKey::SourceIndexUrl => "index_url",
            ConfigKey::SourceTimeout => "timeout",
            ConfigKey::NormalizeLod => "lod",
            ConfigKey::NormalizeGroundAttribute => "ground_attribute",
            ConfigKey::PipelineThreads => "threads",
            ConfigKey::PipelineMinTiles => "min_tiles",
            ConfigKey::EditorBlender => "blender",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SourceTileUrl => config.source.tile_url.clone(),
            ConfigKey::SourceIndexUrl => config.source.index_url.clone(),
            ConfigKey::SourceTimeout => config.source.timeout.to_string(),
            ConfigKey::NormalizeLod => config.normalize.lod.clone(),
            ConfigKey::NormalizeGroundAttribute => config.normalize.ground_attribute.clone(),
            ConfigKey::PipelineThreads => config.pipeline.threads.to_string(),
            ConfigKey::PipelineMinTiles => config.pipeline.min_tiles.to_string(),
            ConfigKey::EditorBlender => config
                .editor
                .blender
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Parse `value` and store it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let name = self.name();
        match self {
            ConfigKey::SourceTileUrl => config.source.tile_url = value.to_string(),
            ConfigKey::SourceIndexUrl => config.source.index_url = value.to_string(),
            ConfigKey::SourceTimeout => config.source.timeout = parse_value(&name, value)?,
            ConfigKey::NormalizeLod => config.normalize.lod = value.to_string(),
            ConfigKey::NormalizeGroundAttribute => {
                config.normalize.ground_attribute = value.to_string()
            }
            ConfigKey::PipelineThreads => config.pipeline.threads = parse_value(&name, value)?,
            ConfigKey::PipelineMinTiles => config.pipeline.min_tiles = parse_value(&name, value)?,
            ConfigKey::EditorBlender => config.editor.blender = optional_path(value),
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
