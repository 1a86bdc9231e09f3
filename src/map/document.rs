//! Serialized form of a map.
//!
//! Only map and layer metadata are written; tile grid contents are not part
//! of the document. Reading a document back yields a map whose layers have
//! the recorded metadata and empty grids.

use serde::{Deserialize, Serialize};

use super::layer::LayerDocument;
use super::MapData;
use crate::enums::BiomeType;
use crate::Properties;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub map_id: String,
    pub name: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub default_biome: BiomeType,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spawn_points: Vec<(i32, i32)>,
    pub exit_points: Vec<(i32, i32)>,
    #[serde(default)]
    pub properties: Properties,
    pub layers: Vec<LayerDocument>,
}

impl From<&MapData> for MapDocument {
    fn from(map: &MapData) -> Self {
        Self {
            map_id: map.map_id.clone(),
            name: map.name.clone(),
            description: map.description.clone(),
            width: map.width(),
            height: map.height(),
            default_biome: map.default_biome,
            tile_width: map.tile_width,
            tile_height: map.tile_height,
            spawn_points: map.spawn_points.clone(),
            exit_points: map.exit_points.clone(),
            properties: map.properties.clone(),
            layers: map.layers().iter().map(LayerDocument::from).collect(),
        }
    }
}
