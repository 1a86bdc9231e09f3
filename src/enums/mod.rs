//! Tile, biome and layer enumerations.
//!
//! All three serialize as their symbolic upper-case name (`"WALL"`,
//! `"STAIRS_UP"`), never as an ordinal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a symbolic name does not match any variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} name: {name}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub name: String,
}

/// Kinds of tile that can exist in a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    // Terrain
    Floor,
    Wall,
    Door,
    Water,
    Lava,
    Pit,
    StairsUp,
    StairsDown,
    // Interactive elements
    Chest,
    Switch,
    PressurePlate,
    Trap,
    // Special
    SpawnPoint,
    Exit,
    Teleporter,
}

impl TileType {
    pub fn all() -> [TileType; 15] {
        [
            TileType::Floor,
            TileType::Wall,
            TileType::Door,
            TileType::Water,
            TileType::Lava,
            TileType::Pit,
            TileType::StairsUp,
            TileType::StairsDown,
            TileType::Chest,
            TileType::Switch,
            TileType::PressurePlate,
            TileType::Trap,
            TileType::SpawnPoint,
            TileType::Exit,
            TileType::Teleporter,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::Floor => "FLOOR",
            TileType::Wall => "WALL",
            TileType::Door => "DOOR",
            TileType::Water => "WATER",
            TileType::Lava => "LAVA",
            TileType::Pit => "PIT",
            TileType::StairsUp => "STAIRS_UP",
            TileType::StairsDown => "STAIRS_DOWN",
            TileType::Chest => "CHEST",
            TileType::Switch => "SWITCH",
            TileType::PressurePlate => "PRESSURE_PLATE",
            TileType::Trap => "TRAP",
            TileType::SpawnPoint => "SPAWN_POINT",
            TileType::Exit => "EXIT",
            TileType::Teleporter => "TELEPORTER",
        }
    }

    /// Passability a freshly constructed tile of this kind starts with
    pub fn default_passable(&self) -> bool {
        !matches!(self, TileType::Wall | TileType::Pit | TileType::Lava)
    }

    /// Transparency (line of sight) a freshly constructed tile starts with
    pub fn default_transparent(&self) -> bool {
        !matches!(self, TileType::Wall)
    }
}

impl FromStr for TileType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileType::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "tile type",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Biomes influence a tile's default appearance and behavior context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiomeType {
    #[default]
    Dungeon,
    Cave,
    Forest,
    Desert,
    Ice,
    Volcanic,
    Swamp,
    Ruins,
    Underwater,
    Ethereal,
}

impl BiomeType {
    pub fn all() -> [BiomeType; 10] {
        [
            BiomeType::Dungeon,
            BiomeType::Cave,
            BiomeType::Forest,
            BiomeType::Desert,
            BiomeType::Ice,
            BiomeType::Volcanic,
            BiomeType::Swamp,
            BiomeType::Ruins,
            BiomeType::Underwater,
            BiomeType::Ethereal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BiomeType::Dungeon => "DUNGEON",
            BiomeType::Cave => "CAVE",
            BiomeType::Forest => "FOREST",
            BiomeType::Desert => "DESERT",
            BiomeType::Ice => "ICE",
            BiomeType::Volcanic => "VOLCANIC",
            BiomeType::Swamp => "SWAMP",
            BiomeType::Ruins => "RUINS",
            BiomeType::Underwater => "UNDERWATER",
            BiomeType::Ethereal => "ETHEREAL",
        }
    }
}

impl FromStr for BiomeType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BiomeType::all()
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "biome type",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for BiomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layers a map can be composed of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerType {
    Background,
    Terrain,
    Objects,
    Entities,
    Effects,
    Ui,
}

impl LayerType {
    pub fn all() -> [LayerType; 6] {
        [
            LayerType::Background,
            LayerType::Terrain,
            LayerType::Objects,
            LayerType::Entities,
            LayerType::Effects,
            LayerType::Ui,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Background => "BACKGROUND",
            LayerType::Terrain => "TERRAIN",
            LayerType::Objects => "OBJECTS",
            LayerType::Entities => "ENTITIES",
            LayerType::Effects => "EFFECTS",
            LayerType::Ui => "UI",
        }
    }
}

impl FromStr for LayerType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerType::all()
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "layer type",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
