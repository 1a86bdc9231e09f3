use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dungeon_model::{LayerType, MapData, MapLayer, Tile, TileType};

fn filled_layer(size: u32) -> MapLayer {
    let mut layer = MapLayer::new(LayerType::Terrain, "Terrain", size, size);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            layer.set_tile(x, y, Some(Tile::new(0, 0, TileType::Floor)));
        }
    }
    layer
}

fn bench_layer_access(c: &mut Criterion) {
    c.bench_function("set_tile_fill_64x64", |b| {
        b.iter(|| filled_layer(black_box(64)))
    });

    let layer = filled_layer(128);

    c.bench_function("get_tiles_in_area_32x32", |b| {
        b.iter(|| {
            layer.get_tiles_in_area(black_box(10), black_box(10), black_box(41), black_box(41))
        })
    });

    c.bench_function("get_all_tiles_128x128", |b| {
        b.iter(|| layer.get_all_tiles().filter(|(_, _, t)| t.is_some()).count())
    });
}

fn bench_map_queries(c: &mut Criterion) {
    let mut map = MapData::new(100, 100, "bench");
    for y in 0..100 {
        for x in 0..100 {
            let kind = if (x + y) % 7 == 0 {
                TileType::Wall
            } else {
                TileType::Floor
            };
            map.set_tile(x, y, "Terrain", Some(Tile::new(0, 0, kind)));
        }
    }

    c.bench_function("get_passable_tiles_100x100", |b| {
        b.iter(|| map.get_passable_tiles(black_box("Terrain")).len())
    });

    c.bench_function("get_tiles_at_position", |b| {
        b.iter(|| map.get_tiles_at_position(black_box(50), black_box(50)).len())
    });

    c.bench_function("map_to_json", |b| b.iter(|| map.to_json()));
}

fn bench_resize(c: &mut Criterion) {
    let mut map = MapData::new(64, 64, "bench");
    for y in 0..64 {
        for x in 0..64 {
            map.set_tile(x, y, "Terrain", Some(Tile::new(0, 0, TileType::Floor)));
        }
    }

    c.bench_function("resize_grow_and_shrink", |b| {
        b.iter(|| {
            let mut m = map.clone();
            m.resize(black_box(96), black_box(96));
            m.resize(black_box(48), black_box(48));
            m
        })
    });
}

criterion_group!(benches, bench_layer_access, bench_map_queries, bench_resize);
criterion_main!(benches);
