//! Map data - an ordered stack of same-sized tile layers plus map-wide
//! metadata, spawn/exit points and JSON serialization.

pub mod document;
pub mod layer;

pub use document::MapDocument;
pub use layer::{LayerDocument, MapLayer};

use tracing::{debug, info, warn};

use crate::config::MapDefaults;
use crate::enums::{BiomeType, LayerType};
use crate::tile::Tile;
use crate::Properties;

/// Complete game map with multiple layers.
///
/// Layers are kept sorted ascending by `z_index` (stable among equal
/// indices). Every layer created through the map matches the map's
/// dimensions, and [`MapData::resize`] keeps them in step.
#[derive(Debug, Clone)]
pub struct MapData {
    width: u32,
    height: u32,

    pub map_id: String,
    pub name: String,
    pub description: String,

    layers: Vec<MapLayer>,

    pub default_biome: BiomeType,

    /// Rendering hints, pixels per tile
    pub tile_width: u32,
    pub tile_height: u32,

    spawn_points: Vec<(i32, i32)>,
    exit_points: Vec<(i32, i32)>,

    pub properties: Properties,
}

impl MapData {
    /// Map with the default Background / Terrain / Objects layers
    pub fn new(width: u32, height: u32, map_id: impl Into<String>) -> Self {
        Self::with_defaults(width, height, map_id, &MapDefaults::default())
    }

    /// Map whose name, tile size, biome and initial layers come from `defaults`
    pub fn with_defaults(
        width: u32,
        height: u32,
        map_id: impl Into<String>,
        defaults: &MapDefaults,
    ) -> Self {
        let mut map = Self::bare(width, height, map_id.into(), defaults);
        for spec in &defaults.layers {
            map.add_layer(spec.layer_type, spec.name.clone(), spec.z_index);
        }
        map
    }

    /// Map built from explicit layers; an empty list falls back to the
    /// default layer set.
    pub fn with_layers(
        width: u32,
        height: u32,
        map_id: impl Into<String>,
        layers: Vec<MapLayer>,
    ) -> Self {
        if layers.is_empty() {
            return Self::new(width, height, map_id);
        }
        let mut map = Self::bare(width, height, map_id.into(), &MapDefaults::default());
        map.layers = layers;
        map.sort_layers();
        map
    }

    fn bare(width: u32, height: u32, map_id: String, defaults: &MapDefaults) -> Self {
        Self {
            width,
            height,
            map_id,
            name: defaults.name.clone(),
            description: String::new(),
            layers: Vec::new(),
            default_biome: defaults.default_biome,
            tile_width: defaults.tile_width,
            tile_height: defaults.tile_height,
            spawn_points: Vec::new(),
            exit_points: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_biome(mut self, biome: BiomeType) -> Self {
        self.default_biome = biome;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // ========================================================================
    // Layers
    // ========================================================================

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> impl Iterator<Item = &mut MapLayer> + '_ {
        self.layers.iter_mut()
    }

    /// Add an empty layer sized to the map. `z_index` defaults to the current
    /// layer count, which places the new layer on top.
    pub fn add_layer(
        &mut self,
        layer_type: LayerType,
        name: impl Into<String>,
        z_index: Option<i32>,
    ) -> &mut MapLayer {
        let z_index = z_index.unwrap_or(self.layers.len() as i32);
        let layer = MapLayer::new(layer_type, name, self.width, self.height).with_z_index(z_index);
        debug!(layer = %layer.name, %layer_type, z_index, "Layer added");

        self.layers.push(layer);
        self.sort_layers();

        // Stable sort keeps the new layer last among equal z-indices
        let index = self
            .layers
            .iter()
            .rposition(|l| l.z_index == z_index)
            .unwrap_or(self.layers.len() - 1);
        &mut self.layers[index]
    }

    fn sort_layers(&mut self) {
        self.layers.sort_by_key(|layer| layer.z_index);
    }

    /// First layer with exactly this name (case-sensitive)
    pub fn get_layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn get_layer_mut(&mut self, name: &str) -> Option<&mut MapLayer> {
        self.layers.iter_mut().find(|layer| layer.name == name)
    }

    /// First layer of the given kind
    pub fn get_layer_by_type(&self, layer_type: LayerType) -> Option<&MapLayer> {
        self.layers.iter().find(|layer| layer.layer_type == layer_type)
    }

    pub fn get_layer_by_type_mut(&mut self, layer_type: LayerType) -> Option<&mut MapLayer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.layer_type == layer_type)
    }

    /// Remove the first layer named `name`
    pub fn remove_layer(&mut self, name: &str) -> bool {
        match self.layers.iter().position(|layer| layer.name == name) {
            Some(index) => {
                self.layers.remove(index);
                debug!(layer = name, "Layer removed");
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Tiles
    // ========================================================================

    pub fn get_tile(&self, x: i32, y: i32, layer_name: &str) -> Option<&Tile> {
        self.get_layer(layer_name)?.get_tile(x, y)
    }

    pub fn get_tile_mut(&mut self, x: i32, y: i32, layer_name: &str) -> Option<&mut Tile> {
        self.get_layer_mut(layer_name)?.get_tile_mut(x, y)
    }

    /// Place a tile on the named layer; false for an unknown layer or an
    /// out-of-bounds position.
    pub fn set_tile(&mut self, x: i32, y: i32, layer_name: &str, tile: Option<Tile>) -> bool {
        match self.get_layer_mut(layer_name) {
            Some(layer) => layer.set_tile(x, y, tile),
            None => false,
        }
    }

    /// The cell at `(x, y)` on every layer, bottom to top
    pub fn get_tiles_at_position(&self, x: i32, y: i32) -> Vec<(&MapLayer, Option<&Tile>)> {
        self.layers
            .iter()
            .map(|layer| (layer, layer.get_tile(x, y)))
            .collect()
    }

    /// Occupied, passable cells of the named layer; empty for an unknown layer
    pub fn get_passable_tiles(&self, layer_name: &str) -> Vec<(i32, i32, &Tile)> {
        let Some(layer) = self.get_layer(layer_name) else {
            return Vec::new();
        };
        layer
            .get_all_tiles()
            .filter_map(|(x, y, tile)| tile.filter(|t| t.is_passable).map(|t| (x, y, t)))
            .collect()
    }

    // ========================================================================
    // Spawn and exit points
    // ========================================================================

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn spawn_points(&self) -> &[(i32, i32)] {
        &self.spawn_points
    }

    pub fn exit_points(&self) -> &[(i32, i32)] {
        &self.exit_points
    }

    /// Record a spawn point if it lies inside the map. Duplicates are kept.
    pub fn add_spawn_point(&mut self, x: i32, y: i32) -> bool {
        if !self.is_valid_position(x, y) {
            debug!(x, y, "Spawn point outside map rejected");
            return false;
        }
        self.spawn_points.push((x, y));
        true
    }

    /// Record an exit point if it lies inside the map. Duplicates are kept.
    pub fn add_exit_point(&mut self, x: i32, y: i32) -> bool {
        if !self.is_valid_position(x, y) {
            debug!(x, y, "Exit point outside map rejected");
            return false;
        }
        self.exit_points.push((x, y));
        true
    }

    // ========================================================================
    // Resize
    // ========================================================================

    /// Resize the map and every layer, keeping the overlapping top-left
    /// rectangle of each grid. Spawn and exit points are left as recorded.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        info!(
            map_id = %self.map_id,
            from = %format!("{}x{}", self.width, self.height),
            to = %format!("{}x{}", new_width, new_height),
            "Resizing map"
        );
        self.width = new_width;
        self.height = new_height;
        for layer in &mut self.layers {
            layer.resize(new_width, new_height);
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    pub fn to_document(&self) -> MapDocument {
        MapDocument::from(self)
    }

    /// Map and layer metadata as a JSON value; tile contents are omitted
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self.to_document()).unwrap_or_default()
    }

    /// Pretty JSON with 2-space indentation
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_document()).unwrap_or_default()
    }

    /// Rebuild a map from its metadata document; every layer grid is empty.
    ///
    /// Layers recorded with a different size are resized to the map, and
    /// spawn/exit points outside the map are dropped.
    pub fn from_document(doc: MapDocument) -> Self {
        let mut map = Self {
            width: doc.width,
            height: doc.height,
            map_id: doc.map_id,
            name: doc.name,
            description: doc.description,
            layers: Vec::with_capacity(doc.layers.len()),
            default_biome: doc.default_biome,
            tile_width: doc.tile_width,
            tile_height: doc.tile_height,
            spawn_points: Vec::new(),
            exit_points: Vec::new(),
            properties: doc.properties,
        };

        for layer_doc in doc.layers {
            let mut layer = MapLayer::from(layer_doc);
            if (layer.width(), layer.height()) != (map.width, map.height) {
                warn!(
                    layer = %layer.name,
                    recorded = %format!("{}x{}", layer.width(), layer.height()),
                    map = %format!("{}x{}", map.width, map.height),
                    "Layer size does not match map, resizing"
                );
                layer.resize(map.width, map.height);
            }
            map.layers.push(layer);
        }
        map.sort_layers();

        for (x, y) in doc.spawn_points {
            map.add_spawn_point(x, y);
        }
        for (x, y) in doc.exit_points {
            map.add_exit_point(x, y);
        }
        map
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<MapDocument>(json).map(Self::from_document)
    }
}
