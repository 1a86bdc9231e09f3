use serde::{Deserialize, Serialize};

use crate::enums::LayerType;
use crate::tile::Tile;
use crate::Properties;

/// One layer of a map: a row-major grid of optional tiles plus rendering
/// metadata.
///
/// The grid always holds exactly `width * height` cells; only
/// [`MapLayer::resize`] changes the dimensions.
#[derive(Debug, Clone)]
pub struct MapLayer {
    pub layer_type: LayerType,
    pub name: String,
    width: u32,
    height: u32,
    tiles: Vec<Option<Tile>>,

    pub is_visible: bool,
    pub opacity: f32,
    /// Render order; maps keep layers sorted ascending by this
    pub z_index: i32,

    pub properties: Properties,
}

impl MapLayer {
    /// Empty layer of the given size
    pub fn new(layer_type: LayerType, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            layer_type,
            name: name.into(),
            width,
            height,
            tiles: empty_grid(width, height),
            is_visible: true,
            opacity: 1.0,
            z_index: 0,
            properties: Properties::new(),
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        let i = self.index(x, y)?;
        self.tiles[i].as_ref()
    }

    pub fn get_tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let i = self.index(x, y)?;
        self.tiles[i].as_mut()
    }

    /// Place `tile` (or clear with `None`) at `(x, y)`.
    ///
    /// The tile's own coordinates are rewritten to match the slot. Returns
    /// false, leaving the grid untouched, when the position is out of bounds.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<Tile>) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        self.tiles[i] = tile.map(|mut t| {
            t.x = x;
            t.y = y;
            t
        });
        true
    }

    pub fn clear_tile(&mut self, x: i32, y: i32) -> bool {
        self.set_tile(x, y, None)
    }

    /// Remove and return the tile at `(x, y)`
    pub fn take_tile(&mut self, x: i32, y: i32) -> Option<Tile> {
        let i = self.index(x, y)?;
        self.tiles[i].take()
    }

    /// Cells in the inclusive rectangle spanned by the two corners, clipped
    /// to the layer. Corner order does not matter; empty cells are included.
    pub fn get_tiles_in_area(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Vec<(i32, i32, Option<&Tile>)> {
        let (min_x, max_x) = (x1.min(x2).max(0), x1.max(x2).min(last_coordinate(self.width)));
        let (min_y, max_y) = (y1.min(y2).max(0), y1.max(y2).min(last_coordinate(self.height)));

        let mut cells = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                cells.push((x, y, self.get_tile(x, y)));
            }
        }
        cells
    }

    /// Every cell in row-major order (y outer, x inner). Call again to restart.
    pub fn get_all_tiles(&self) -> impl Iterator<Item = (i32, i32, Option<&Tile>)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as i32, (i / width) as i32, cell.as_ref()))
    }

    /// Occupied cells only
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.tiles.iter_mut().flatten()
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|cell| cell.is_some()).count()
    }

    /// Reallocate the grid, keeping the overlapping top-left rectangle.
    /// Tiles outside the new bounds are dropped; new cells start empty.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        let mut new_tiles = empty_grid(new_width, new_height);
        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;

        let mut old_tiles = std::mem::take(&mut self.tiles);
        for y in 0..copy_height {
            for x in 0..copy_width {
                let old = y * self.width as usize + x;
                let new = y * new_width as usize + x;
                new_tiles[new] = old_tiles[old].take();
            }
        }

        self.tiles = new_tiles;
        self.width = new_width;
        self.height = new_height;
    }
}

/// Largest in-bounds coordinate along an axis of `extent` cells; -1 when empty
fn last_coordinate(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX) - 1
}

fn empty_grid(width: u32, height: u32) -> Vec<Option<Tile>> {
    let mut grid = Vec::new();
    grid.resize_with(width as usize * height as usize, || None);
    grid
}

/// Serialized form of a layer: metadata only, tile contents are not included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDocument {
    pub layer_type: LayerType,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_visible: bool,
    pub opacity: f32,
    pub z_index: i32,
    #[serde(default)]
    pub properties: Properties,
}

impl From<&MapLayer> for LayerDocument {
    fn from(layer: &MapLayer) -> Self {
        Self {
            layer_type: layer.layer_type,
            name: layer.name.clone(),
            width: layer.width,
            height: layer.height,
            is_visible: layer.is_visible,
            opacity: layer.opacity,
            z_index: layer.z_index,
            properties: layer.properties.clone(),
        }
    }
}

impl From<LayerDocument> for MapLayer {
    fn from(doc: LayerDocument) -> Self {
        let mut layer = MapLayer::new(doc.layer_type, doc.name, doc.width, doc.height);
        layer.is_visible = doc.is_visible;
        layer.opacity = doc.opacity;
        layer.z_index = doc.z_index;
        layer.properties = doc.properties;
        layer
    }
}
