//! Asset definitions, asset instances and the asset manager contract.
//!
//! A definition is a reusable template (sprite, animation, tileset, sound,
//! model). An instance is one placed usage of a definition with its own
//! transform, visual and animation state. Instances reference definitions by
//! id only; tiles hold [`SharedAssetInstance`] handles so an update made
//! through the manager is visible from every tile the instance is attached to.

pub mod file;
pub mod memory;
pub mod registry;

pub use file::FileAssetManager;
pub use memory::InMemoryAssetManager;
pub use registry::AssetRegistry;

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::Properties;

/// Shared handle to an asset instance. Tiles and managers hold clones of the
/// same handle; the model is single-threaded so `Rc<RefCell<_>>` suffices.
pub type SharedAssetInstance = Rc<RefCell<AssetInstance>>;

/// Error type for asset loading and instance creation
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
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
    #[error("Unsupported definition format: {0}")]
    UnsupportedFormat(String),
    #[error("Definition source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("Unknown asset definition: {0}")]
    UnknownDefinition(String),
    #[error("Asset instance already exists: {0}")]
    DuplicateInstance(String),
}

/// Template for assets that can be instantiated many times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub id: String,
    pub name: String,
    /// e.g. "sprite", "animation", "tileset", "sound", "model"
    pub asset_type: String,

    pub resource_path: String,
    /// e.g. "png", "gif", "wav", "ogg", "fbx"
    pub resource_format: String,

    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub frame_count: Option<u32>,
    /// Seconds per frame
    #[serde(default)]
    pub frame_duration: Option<f32>,
    #[serde(default = "default_true")]
    pub animation_loop: bool,

    #[serde(default)]
    pub tile_width: Option<u32>,
    #[serde(default)]
    pub tile_height: Option<u32>,
    #[serde(default)]
    pub tiles_per_row: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
}

fn default_true() -> bool {
    true
}

impl AssetDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
        resource_path: impl Into<String>,
        resource_format: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset_type: asset_type.into(),
            resource_path: resource_path.into(),
            resource_format: resource_format.into(),
            width: None,
            height: None,
            frame_count: None,
            frame_duration: None,
            animation_loop: true,
            tile_width: None,
            tile_height: None,
            tiles_per_row: None,
            tags: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_animation(mut self, frame_count: u32, frame_duration: f32, looping: bool) -> Self {
        self.frame_count = Some(frame_count);
        self.frame_duration = Some(frame_duration);
        self.animation_loop = looping;
        self
    }

    pub fn with_tileset(mut self, tile_width: u32, tile_height: u32, tiles_per_row: u32) -> Self {
        self.tile_width = Some(tile_width);
        self.tile_height = Some(tile_height);
        self.tiles_per_row = Some(tiles_per_row);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// More than one frame means the definition describes an animation
    pub fn is_animated(&self) -> bool {
        self.frame_count.is_some_and(|n| n > 1)
    }

    pub fn is_tileset(&self) -> bool {
        self.tile_width.is_some() && self.tile_height.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Total animation length in seconds for one pass over all frames
    pub fn animation_duration(&self) -> Option<f32> {
        match (self.frame_count, self.frame_duration) {
            (Some(frames), Some(duration)) => Some(frames as f32 * duration),
            _ => None,
        }
    }
}

/// One placed usage of an [`AssetDefinition`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInstance {
    pub instance_id: String,
    pub asset_definition_id: String,

    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Degrees
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,

    pub opacity: f32,
    /// Hex color string like "#FF0000"
    pub tint_color: Option<String>,

    pub current_frame: u32,
    /// Playback speed multiplier
    pub animation_speed: f32,
    pub is_playing: bool,

    #[serde(default)]
    pub properties: Properties,

    pub layer_index: i32,
    /// Sort order within the same layer
    pub z_index: i32,
}

impl AssetInstance {
    /// Create an instance; an empty `instance_id` is replaced by a fresh UUID.
    pub fn new(instance_id: impl Into<String>, asset_definition_id: impl Into<String>) -> Self {
        let mut instance_id = instance_id.into();
        if instance_id.is_empty() {
            instance_id = generate_instance_id();
        }
        Self {
            instance_id,
            asset_definition_id: asset_definition_id.into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            tint_color: None,
            current_frame: 0,
            animation_speed: 1.0,
            is_playing: true,
            properties: Properties::new(),
            layer_index: 0,
            z_index: 0,
        }
    }

    /// Create an instance with a generated id
    pub fn for_definition(asset_definition_id: impl Into<String>) -> Self {
        Self::new(String::new(), asset_definition_id)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn on_layer(mut self, layer_index: i32) -> Self {
        self.layer_index = layer_index;
        self
    }

    pub fn into_shared(self) -> SharedAssetInstance {
        Rc::new(RefCell::new(self))
    }
}

pub(crate) fn generate_instance_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Per-field overrides applied when an instance is created through a manager.
/// Unset fields keep the [`AssetInstance`] defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceOverrides {
    pub instance_id: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub rotation: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub opacity: Option<f32>,
    pub tint_color: Option<String>,
    pub animation_speed: Option<f32>,
    pub is_playing: Option<bool>,
    pub layer_index: Option<i32>,
    pub z_index: Option<i32>,
    pub properties: Option<Properties>,
}

impl InstanceOverrides {
    pub fn with_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.z = Some(z);
        self
    }

    pub fn with_layer(mut self, layer_index: i32, z_index: i32) -> Self {
        self.layer_index = Some(layer_index);
        self.z_index = Some(z_index);
        self
    }

    pub fn apply_to(self, instance: &mut AssetInstance) {
        if let Some(v) = self.x {
            instance.x = v;
        }
        if let Some(v) = self.y {
            instance.y = v;
        }
        if let Some(v) = self.z {
            instance.z = v;
        }
        if let Some(v) = self.rotation {
            instance.rotation = v;
        }
        if let Some(v) = self.scale_x {
            instance.scale_x = v;
        }
        if let Some(v) = self.scale_y {
            instance.scale_y = v;
        }
        if let Some(v) = self.opacity {
            instance.opacity = v;
        }
        if self.tint_color.is_some() {
            instance.tint_color = self.tint_color;
        }
        if let Some(v) = self.animation_speed {
            instance.animation_speed = v;
        }
        if let Some(v) = self.is_playing {
            instance.is_playing = v;
        }
        if let Some(v) = self.layer_index {
            instance.layer_index = v;
        }
        if let Some(v) = self.z_index {
            instance.z_index = v;
        }
        if let Some(props) = self.properties {
            instance.properties = props;
        }
    }
}

/// Capability contract for loading definitions and managing instances.
///
/// Backends (file system, in-memory, database) implement this independently;
/// map and tile code never depend on a concrete backend.
pub trait AssetManager {
    /// Load a definition from `path` and register it under its id.
    fn load_asset_definition(&mut self, path: &Path) -> Result<AssetDefinition, AssetError>;

    /// Create and register a new instance of a registered definition.
    fn create_asset_instance(
        &mut self,
        definition_id: &str,
        overrides: InstanceOverrides,
    ) -> Result<SharedAssetInstance, AssetError>;

    fn get_asset_definition(&self, definition_id: &str) -> Option<&AssetDefinition>;

    fn get_asset_instance(&self, instance_id: &str) -> Option<SharedAssetInstance>;

    /// Replace the stored state of an existing instance. Returns false when
    /// no instance with that id is registered or its handle is borrowed.
    fn update_asset_instance(&mut self, instance: AssetInstance) -> bool;

    /// Returns false when no instance with that id is registered.
    fn remove_asset_instance(&mut self, instance_id: &str) -> bool;

    /// Register an already-constructed definition (replaces any with the same id).
    fn register_asset_definition(&mut self, definition: AssetDefinition) -> Result<(), AssetError>;

    fn definition_count(&self) -> usize;

    fn instance_count(&self) -> usize;
}

/// Parse definition source text, picking the format from the file extension.
pub(crate) fn parse_definition(path: &Path, contents: &str) -> Result<AssetDefinition, AssetError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let definition: AssetDefinition = match extension.as_str() {
        "json" => serde_json::from_str(contents)?,
        "ron" => ron::from_str(contents)?,
        other => return Err(AssetError::UnsupportedFormat(other.to_string())),
    };

    if definition.id.is_empty() {
        return Err(AssetError::InvalidDefinition(format!(
            "{} has an empty id",
            path.display()
        )));
    }
    Ok(definition)
}
