//! Model configuration.
//!
//! Loaded from a JSON or RON file (format chosen by extension); every section
//! falls back to its defaults when omitted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    BACKGROUND_LAYER_NAME, DEFAULT_MAP_NAME, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH,
    DEFINITION_EXTENSIONS, OBJECTS_LAYER_NAME, TERRAIN_LAYER_NAME,
};
use crate::enums::{BiomeType, LayerType};
use crate::logging::TracingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub map: MapDefaults,
    pub assets: AssetConfig,
    pub logging: TracingConfig,
}

impl ModelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(serde_json::from_str(&contents)?),
            "ron" => Ok(ron::from_str(&contents)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Layer created when a map is constructed without explicit layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub layer_type: LayerType,
    pub name: String,
    #[serde(default)]
    pub z_index: Option<i32>,
}

impl LayerSpec {
    pub fn new(layer_type: LayerType, name: &str, z_index: i32) -> Self {
        Self {
            layer_type,
            name: name.to_string(),
            z_index: Some(z_index),
        }
    }
}

/// Values applied to newly constructed maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDefaults {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub default_biome: BiomeType,
    pub layers: Vec<LayerSpec>,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_MAP_NAME.to_string(),
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            default_biome: BiomeType::Dungeon,
            layers: vec![
                LayerSpec::new(LayerType::Background, BACKGROUND_LAYER_NAME, 0),
                LayerSpec::new(LayerType::Terrain, TERRAIN_LAYER_NAME, 1),
                LayerSpec::new(LayerType::Objects, OBJECTS_LAYER_NAME, 2),
            ],
        }
    }
}

/// Where the file-backed asset manager looks for definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub definition_extensions: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/definitions"),
            definition_extensions: DEFINITION_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
