//! Demo: builds a walled 10x10 room, attaches asset instances to tiles,
//! queries the map and prints its JSON document.
//!
//! Usage: `dungeon-demo [config.json|config.ron]`

use anyhow::Context;
use std::path::Path;
use tracing::info;

use dungeon_model::config::ModelConfig;
use dungeon_model::logging::init_tracing;
use dungeon_model::{
    AssetDefinition, AssetManager, BiomeType, InMemoryAssetManager, InstanceOverrides, MapData,
    Tile, TileType,
};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ModelConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => ModelConfig::default(),
    };
    init_tracing(&config.logging);

    let mut map = build_room(&config)?;

    let mut assets = InMemoryAssetManager::new();
    register_definitions(&mut assets)?;
    decorate(&mut map, &mut assets)?;

    report(&map);
    println!("{}", map.to_json());
    Ok(())
}

fn build_room(config: &ModelConfig) -> anyhow::Result<MapData> {
    let mut map = MapData::with_defaults(10, 10, "example_map_001", &config.map)
        .with_name("Simple Dungeon Room")
        .with_description("A basic 10x10 room with walls and floor");
    info!(
        name = %map.name,
        layers = ?map.layers().iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        "Created map"
    );

    let (width, height) = (map.width() as i32, map.height() as i32);
    let terrain = map
        .get_layer_mut("Terrain")
        .context("map has no Terrain layer")?;

    for y in 0..height {
        for x in 0..width {
            let edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let kind = if edge { TileType::Wall } else { TileType::Floor };
            terrain.set_tile(
                x,
                y,
                Some(Tile::builder(kind).biome(BiomeType::Dungeon).build()),
            );
        }
    }

    // Door in the middle of the south wall
    terrain.set_tile(width / 2, height - 1, Some(Tile::new(0, 0, TileType::Door)));

    map.add_spawn_point(width / 2, height / 2);
    map.add_exit_point(width / 2, height - 1);
    Ok(map)
}

fn register_definitions(assets: &mut InMemoryAssetManager) -> anyhow::Result<()> {
    assets.register_asset_definition(
        AssetDefinition::new(
            "wall_stone_001",
            "Stone Wall",
            "sprite",
            "assets/tiles/wall_stone.png",
            "png",
        )
        .with_size(32, 32)
        .with_tags(["wall", "stone", "dungeon"])
        .with_property("solid", serde_json::json!(true))
        .with_property("destructible", serde_json::json!(false)),
    )?;
    assets.register_asset_definition(
        AssetDefinition::new(
            "floor_stone_001",
            "Stone Floor",
            "sprite",
            "assets/tiles/floor_stone.png",
            "png",
        )
        .with_size(32, 32)
        .with_tags(["floor", "stone", "dungeon"]),
    )?;
    Ok(())
}

fn decorate(map: &mut MapData, assets: &mut InMemoryAssetManager) -> anyhow::Result<()> {
    let wall = assets.create_asset_instance(
        "wall_stone_001",
        InstanceOverrides::default()
            .with_id("wall_inst_001")
            .with_layer(1, 0),
    )?;
    let floor = assets.create_asset_instance(
        "floor_stone_001",
        InstanceOverrides::default()
            .with_id("floor_inst_001")
            .with_position(32.0, 32.0, 0.0),
    )?;

    if let Some(tile) = map.get_tile_mut(0, 0, "Terrain") {
        tile.add_asset_instance(wall);
    }
    if let Some(tile) = map.get_tile_mut(1, 1, "Terrain") {
        tile.add_asset_instance(floor);
    }
    info!(instances = assets.instance_count(), "Assets attached");
    Ok(())
}

fn report(map: &MapData) {
    let Some(terrain) = map.get_layer("Terrain") else {
        return;
    };
    let walls = terrain
        .tiles()
        .filter(|t| t.tile_type == TileType::Wall)
        .count();
    let floors = terrain
        .tiles()
        .filter(|t| t.tile_type == TileType::Floor)
        .count();

    info!(walls, floors, "Terrain contents");
    info!(spawn = ?map.spawn_points(), exit = ?map.exit_points(), "Markers");
    info!(
        passable = map.get_passable_tiles("Terrain").len(),
        area = terrain.get_tiles_in_area(0, 0, 2, 2).len(),
        "Queries"
    );
}
