//! Tile - a single grid cell of a map layer.
//!
//! A tile carries its classification, gameplay flags, fog-of-war state,
//! optional health for destructible tiles, and handles to the asset
//! instances that visualise it.

use std::rc::Rc;
use tracing::debug;

use crate::assets::SharedAssetInstance;
use crate::constants::{DEFAULT_INTERACTION_RANGE, DEFAULT_MOVEMENT_COST};
use crate::enums::{BiomeType, TileType};
use crate::Properties;

/// Single cell of a map layer.
///
/// `Clone` copies every scalar field and the property map, while the asset
/// instance list is cloned handle-by-handle: the clone shares the same
/// instances as the original.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Grid position; rewritten by `MapLayer::set_tile` on insertion
    pub x: i32,
    pub y: i32,

    pub tile_type: TileType,
    pub biome_type: BiomeType,

    pub asset_instances: Vec<SharedAssetInstance>,

    pub is_passable: bool,
    /// Line of sight passes through this tile
    pub is_transparent: bool,
    /// Cost for pathfinding
    pub movement_cost: f32,

    pub is_interactive: bool,
    pub interaction_range: f32,

    // Fog of war
    pub is_discovered: bool,
    pub is_visible: bool,

    pub properties: Properties,

    pub max_health: Option<f32>,
    pub current_health: Option<f32>,
}

impl Tile {
    /// Tile with the kind's default passability and transparency
    pub fn new(x: i32, y: i32, tile_type: TileType) -> Self {
        TileBuilder::new(tile_type).at(x, y).build()
    }

    pub fn builder(tile_type: TileType) -> TileBuilder {
        TileBuilder::new(tile_type)
    }

    /// Health is tracked and has reached zero
    pub fn is_destroyed(&self) -> bool {
        self.current_health.is_some_and(|hp| hp <= 0.0)
    }

    /// Apply damage, flooring health at zero. Negative amounts count as zero.
    ///
    /// Returns true only when this call destroyed the tile; damaging an
    /// already destroyed tile, or one without health tracking, returns false.
    pub fn damage(&mut self, amount: f32) -> bool {
        let Some(hp) = self.current_health else {
            return false;
        };
        let was_destroyed = self.is_destroyed();
        self.current_health = Some((hp - amount.max(0.0)).max(0.0));

        if !was_destroyed && self.is_destroyed() {
            self.on_destroyed();
            return true;
        }
        false
    }

    /// Restore health, capped at `max_health`. Negative amounts count as zero.
    ///
    /// Returns false (and changes nothing) when either health field is untracked.
    pub fn heal(&mut self, amount: f32) -> bool {
        match (self.current_health, self.max_health) {
            (Some(hp), Some(max)) => {
                self.current_health = Some((hp + amount.max(0.0)).min(max).max(0.0));
                true
            }
            _ => false,
        }
    }

    /// Remaining health as a fraction of the maximum
    pub fn health_fraction(&self) -> Option<f32> {
        match (self.current_health, self.max_health) {
            (Some(hp), Some(max)) if max > 0.0 => Some(hp / max),
            _ => None,
        }
    }

    fn on_destroyed(&mut self) {
        self.apply_destruction_effects();
        debug!(x = self.x, y = self.y, tile_type = %self.tile_type, "Tile destroyed");
    }

    fn apply_destruction_effects(&mut self) {
        // Collapsed walls become rubble: walkable and see-through.
        // TODO: per-kind destruction reactions (doors, chests) once gameplay defines them
        if self.tile_type == TileType::Wall {
            self.is_passable = true;
            self.is_transparent = true;
        }
    }

    /// Attach an instance; duplicates are not filtered
    pub fn add_asset_instance(&mut self, instance: SharedAssetInstance) {
        self.asset_instances.push(instance);
    }

    pub fn get_asset_instance(&self, instance_id: &str) -> Option<SharedAssetInstance> {
        self.asset_instances
            .iter()
            .find(|inst| has_instance_id(inst, instance_id))
            .map(Rc::clone)
    }

    /// Detach the first instance with `instance_id`
    pub fn remove_asset_instance(&mut self, instance_id: &str) -> bool {
        match self
            .asset_instances
            .iter()
            .position(|inst| has_instance_id(inst, instance_id))
        {
            Some(index) => {
                self.asset_instances.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_asset_instances(&mut self) {
        self.asset_instances.clear();
    }
}

/// Handles mutably borrowed elsewhere are skipped rather than matched
fn has_instance_id(instance: &SharedAssetInstance, instance_id: &str) -> bool {
    instance
        .try_borrow()
        .is_ok_and(|inst| inst.instance_id == instance_id)
}

/// Builder applying tile-kind defaults first and explicit settings on top
#[derive(Debug, Clone)]
pub struct TileBuilder {
    x: i32,
    y: i32,
    tile_type: TileType,
    biome_type: BiomeType,
    is_passable: Option<bool>,
    is_transparent: Option<bool>,
    movement_cost: f32,
    is_interactive: bool,
    interaction_range: f32,
    is_discovered: bool,
    is_visible: bool,
    properties: Properties,
    max_health: Option<f32>,
    current_health: Option<f32>,
    asset_instances: Vec<SharedAssetInstance>,
}

impl TileBuilder {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            x: 0,
            y: 0,
            tile_type,
            biome_type: BiomeType::default(),
            is_passable: None,
            is_transparent: None,
            movement_cost: DEFAULT_MOVEMENT_COST,
            is_interactive: false,
            interaction_range: DEFAULT_INTERACTION_RANGE,
            is_discovered: false,
            is_visible: false,
            properties: Properties::new(),
            max_health: None,
            current_health: None,
            asset_instances: Vec::new(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn biome(mut self, biome: BiomeType) -> Self {
        self.biome_type = biome;
        self
    }

    /// Override the kind's default passability
    pub fn passable(mut self, passable: bool) -> Self {
        self.is_passable = Some(passable);
        self
    }

    /// Override the kind's default transparency
    pub fn transparent(mut self, transparent: bool) -> Self {
        self.is_transparent = Some(transparent);
        self
    }

    pub fn movement_cost(mut self, cost: f32) -> Self {
        self.movement_cost = cost;
        self
    }

    pub fn interactive(mut self, range: f32) -> Self {
        self.is_interactive = true;
        self.interaction_range = range;
        self
    }

    pub fn discovered(mut self, discovered: bool) -> Self {
        self.is_discovered = discovered;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    /// Track health; current health starts at `max` unless set separately
    pub fn health(mut self, max: f32) -> Self {
        self.max_health = Some(max);
        self
    }

    pub fn current_health(mut self, current: f32) -> Self {
        self.current_health = Some(current);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn asset_instance(mut self, instance: SharedAssetInstance) -> Self {
        self.asset_instances.push(instance);
        self
    }

    /// Starting health is clamped into `[0, max_health]`; a tile that starts
    /// at zero health is built already collapsed.
    pub fn build(self) -> Tile {
        let current_health = match (self.current_health, self.max_health) {
            (Some(hp), Some(max)) => Some(hp.min(max).max(0.0)),
            (Some(hp), None) => Some(hp.max(0.0)),
            (None, max) => max,
        };
        let mut tile = Tile {
            x: self.x,
            y: self.y,
            tile_type: self.tile_type,
            biome_type: self.biome_type,
            asset_instances: self.asset_instances,
            is_passable: self
                .is_passable
                .unwrap_or_else(|| self.tile_type.default_passable()),
            is_transparent: self
                .is_transparent
                .unwrap_or_else(|| self.tile_type.default_transparent()),
            movement_cost: self.movement_cost,
            is_interactive: self.is_interactive,
            interaction_range: self.interaction_range,
            is_discovered: self.is_discovered,
            is_visible: self.is_visible,
            properties: self.properties,
            max_health: self.max_health,
            current_health,
        };
        if tile.is_destroyed() {
            tile.apply_destruction_effects();
        }
        tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetInstance;

    fn destructible_wall() -> Tile {
        Tile::builder(TileType::Wall).at(3, 4).health(10.0).build()
    }

    #[test]
    fn test_wall_defaults() {
        let tile = Tile::new(0, 0, TileType::Wall);
        assert!(!tile.is_passable);
        assert!(!tile.is_transparent);
        assert_eq!(tile.biome_type, BiomeType::Dungeon);
        assert_eq!(tile.movement_cost, 1.0);
        assert!(tile.asset_instances.is_empty());
        assert!(tile.properties.is_empty());
    }

    #[test]
    fn test_pit_and_lava_block_movement_but_not_sight() {
        for kind in [TileType::Pit, TileType::Lava] {
            let tile = Tile::new(0, 0, kind);
            assert!(!tile.is_passable, "{kind} should not be passable");
            assert!(tile.is_transparent, "{kind} should be transparent");
        }
    }

    #[test]
    fn test_floor_defaults() {
        let tile = Tile::new(1, 2, TileType::Floor);
        assert!(tile.is_passable);
        assert!(tile.is_transparent);
        assert!(!tile.is_discovered);
        assert!(!tile.is_visible);
        assert_eq!((tile.x, tile.y), (1, 2));
    }

    #[test]
    fn test_explicit_override_wins_over_kind_default() {
        let secret_wall = Tile::builder(TileType::Wall).passable(true).build();
        assert!(secret_wall.is_passable);
        assert!(!secret_wall.is_transparent);
    }

    #[test]
    fn test_defaults_not_enforced_after_construction() {
        let mut tile = Tile::new(0, 0, TileType::Wall);
        tile.is_passable = true;
        assert!(tile.is_passable);
    }

    #[test]
    fn test_health_defaults_to_max() {
        let tile = destructible_wall();
        assert_eq!(tile.max_health, Some(10.0));
        assert_eq!(tile.current_health, Some(10.0));

        let worn = Tile::builder(TileType::Door).health(10.0).current_health(4.0).build();
        assert_eq!(worn.current_health, Some(4.0));
        assert_eq!(worn.health_fraction(), Some(0.4));
    }

    #[test]
    fn test_damage_clamps_and_collapses_wall() {
        let mut tile = destructible_wall();
        assert!(tile.damage(15.0));
        assert_eq!(tile.current_health, Some(0.0));
        assert!(tile.is_destroyed());
        assert!(tile.is_passable);
        assert!(tile.is_transparent);
        assert_eq!(tile.tile_type, TileType::Wall);
    }

    #[test]
    fn test_partial_damage_does_not_destroy() {
        let mut tile = destructible_wall();
        assert!(!tile.damage(4.0));
        assert_eq!(tile.current_health, Some(6.0));
        assert!(!tile.is_passable);
    }

    #[test]
    fn test_damage_reports_destruction_only_once() {
        let mut tile = destructible_wall();
        assert!(tile.damage(10.0));
        assert!(!tile.damage(5.0));
        assert!(!tile.damage(0.0));
        assert_eq!(tile.current_health, Some(0.0));
    }

    #[test]
    fn test_damage_without_health_is_noop() {
        let mut tile = Tile::new(0, 0, TileType::Wall);
        assert!(!tile.damage(100.0));
        assert!(tile.current_health.is_none());
        assert!(!tile.is_destroyed());
        assert!(!tile.is_passable);
    }

    #[test]
    fn test_destroying_non_wall_keeps_flags() {
        let mut chest = Tile::builder(TileType::Chest)
            .health(5.0)
            .passable(false)
            .build();
        assert!(chest.damage(5.0));
        assert!(!chest.is_passable);
    }

    #[test]
    fn test_negative_amounts_do_not_escape_bounds() {
        let mut tile = destructible_wall();
        assert!(tile.heal(-50.0));
        assert_eq!(tile.current_health, Some(10.0));

        assert!(!tile.damage(-50.0));
        assert_eq!(tile.current_health, Some(10.0));

        tile.damage(4.0);
        assert!(tile.heal(-1.0));
        assert_eq!(tile.current_health, Some(6.0));
    }

    #[test]
    fn test_starting_health_is_clamped() {
        let over = Tile::builder(TileType::Door).health(10.0).current_health(25.0).build();
        assert_eq!(over.current_health, Some(10.0));

        let under = Tile::builder(TileType::Door).health(10.0).current_health(-3.0).build();
        assert_eq!(under.current_health, Some(0.0));
        assert!(under.is_destroyed());
    }

    #[test]
    fn test_wall_built_at_zero_health_is_rubble() {
        let mut tile = Tile::builder(TileType::Wall)
            .health(10.0)
            .current_health(0.0)
            .build();
        assert!(tile.is_destroyed());
        assert!(tile.is_passable);
        assert!(tile.is_transparent);
        assert!(!tile.damage(5.0));
    }

    #[test]
    fn test_instance_lookup_skips_mutably_borrowed_handles() {
        let mut tile = Tile::new(0, 0, TileType::Floor);
        let busy = AssetInstance::new("busy", "floor").into_shared();
        let idle = AssetInstance::new("idle", "torch").into_shared();
        tile.add_asset_instance(busy.clone());
        tile.add_asset_instance(idle.clone());

        let _writer = busy.borrow_mut();
        assert!(tile.get_asset_instance("busy").is_none());
        assert!(!tile.remove_asset_instance("busy"));

        let found = tile.get_asset_instance("idle").unwrap();
        assert!(Rc::ptr_eq(&found, &idle));
        assert!(tile.remove_asset_instance("idle"));
        assert_eq!(tile.asset_instances.len(), 1);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut tile = destructible_wall();
        tile.damage(6.0);
        assert!(tile.heal(100.0));
        assert_eq!(tile.current_health, Some(10.0));
    }

    #[test]
    fn test_heal_untracked_reports_noop() {
        let mut tile = Tile::new(0, 0, TileType::Floor);
        assert!(!tile.heal(5.0));
        assert!(tile.current_health.is_none());

        // current tracked but no maximum
        let mut odd = Tile::new(0, 0, TileType::Floor);
        odd.current_health = Some(3.0);
        assert!(!odd.heal(5.0));
        assert_eq!(odd.current_health, Some(3.0));
    }

    #[test]
    fn test_asset_instance_management() {
        let mut tile = Tile::new(0, 0, TileType::Floor);
        let a = AssetInstance::new("a", "floor").into_shared();
        let b = AssetInstance::new("b", "torch").into_shared();
        tile.add_asset_instance(a.clone());
        tile.add_asset_instance(b);
        tile.add_asset_instance(a.clone());
        assert_eq!(tile.asset_instances.len(), 3);

        let found = tile.get_asset_instance("a").unwrap();
        assert!(Rc::ptr_eq(&found, &a));
        assert!(tile.get_asset_instance("zzz").is_none());

        assert!(tile.remove_asset_instance("a"));
        assert_eq!(tile.asset_instances.len(), 2);
        assert!(tile.get_asset_instance("a").is_some());
        assert!(!tile.remove_asset_instance("zzz"));

        tile.clear_asset_instances();
        assert!(tile.asset_instances.is_empty());
    }

    #[test]
    fn test_clone_shares_instances_but_not_properties() {
        let shared = AssetInstance::new("torch_1", "torch").into_shared();
        let original = Tile::builder(TileType::Floor)
            .property("lit", serde_json::json!(true))
            .asset_instance(shared.clone())
            .build();

        let mut copy = original.clone();
        copy.properties.insert("lit".to_string(), serde_json::json!(false));
        copy.is_discovered = true;

        assert_eq!(original.properties["lit"], serde_json::json!(true));
        assert!(!original.is_discovered);
        assert!(Rc::ptr_eq(&original.asset_instances[0], &copy.asset_instances[0]));

        shared.borrow_mut().opacity = 0.25;
        assert_eq!(copy.asset_instances[0].borrow().opacity, 0.25);
    }
}
