//! Centralized defaults for the dungeon map model.
//!
//! Values shared between map construction, configuration defaults and the
//! demo binary live here so they are defined exactly once.

// =====================================================
// Map
// =====================================================

/// Name given to maps constructed without an explicit name
pub const DEFAULT_MAP_NAME: &str = "Untitled Map";

/// Rendering hint: width of one tile in pixels
pub const DEFAULT_TILE_WIDTH: u32 = 32;

/// Rendering hint: height of one tile in pixels
pub const DEFAULT_TILE_HEIGHT: u32 = 32;

// =====================================================
// Default layers
// =====================================================

pub const BACKGROUND_LAYER_NAME: &str = "Background";
pub const TERRAIN_LAYER_NAME: &str = "Terrain";
pub const OBJECTS_LAYER_NAME: &str = "Objects";

// =====================================================
// Tiles
// =====================================================

/// Pathfinding cost of entering an ordinary tile
pub const DEFAULT_MOVEMENT_COST: f32 = 1.0;

/// Distance (in tiles) from which an interactive tile can be used
pub const DEFAULT_INTERACTION_RANGE: f32 = 1.0;

// =====================================================
// Assets
// =====================================================

/// File extensions recognised as asset definition sources
pub const DEFINITION_EXTENSIONS: [&str; 2] = ["json", "ron"];
