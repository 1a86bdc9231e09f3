//! Dungeon Map Model Library
//!
//! Rendering-agnostic data structures for a tile-based dungeon game:
//! - Tile, biome and layer enumerations
//! - Asset definitions (templates) and asset instances (placed usages)
//! - Asset manager trait with in-memory and file-backed stores
//! - Tiles with gameplay flags, fog-of-war state and destructible health
//! - Map layers (row-major tile grids) stacked into a map
//! - Map metadata serialization to JSON
//! - Configuration and structured logging

pub mod assets;
pub mod config;
pub mod constants;
pub mod enums;
pub mod logging;
pub mod map;
pub mod tile;

pub use assets::{
    AssetDefinition, AssetError, AssetInstance, AssetManager, FileAssetManager,
    InMemoryAssetManager, InstanceOverrides, SharedAssetInstance,
};
pub use enums::{BiomeType, LayerType, ParseEnumError, TileType};
pub use map::{MapData, MapLayer};
pub use tile::{Tile, TileBuilder};

/// Open string-keyed property bag carried by tiles, layers, maps and assets.
pub type Properties = std::collections::HashMap<String, serde_json::Value>;
