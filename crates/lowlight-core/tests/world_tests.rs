//! Integration tests for world generation and layered reachability

use glam::Vec2;
use lowlight_core::biome::{BiomeCatalog, Layer};
use lowlight_core::world::{Cell, Grid, World, WorldGenConfig, isolated_cells};
use lowlight_core::{LifeRng, world};

fn generate(seed: u64) -> (World, world::GenerationReport) {
    World::generate(BiomeCatalog::new(), &WorldGenConfig::default(), seed).unwrap()
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_generation_is_byte_identical_per_seed() {
    let (a, report_a) = generate(0);
    let (b, report_b) = generate(0);
    assert_eq!(a.cells(), b.cells());
    assert_eq!(report_a, report_b);

    let (c, _) = generate(1);
    assert_ne!(a.cells(), c.cells(), "Different seeds give different worlds");

    let (d, _) = generate(1 << 32);
    assert_ne!(a.cells(), d.cells(), "The high half of the seed counts too");
}

#[test]
fn test_seed_zero_world() {
    let (world, report) = generate(0);
    let catalog = world.catalog();
    assert_eq!(world.cells().len(), 50 * 50);
    assert_eq!(report.repair_passes.len(), 6, "Levels 0 to 5 inclusive");
    assert!(report.repair_passes.iter().all(|p| (1..=10).contains(p)));

    // Low cells are seas only
    let seas = ["ABYSSAL_SEA", "TEMPERED_SEA", "TROPICAL_SEA"];
    for id in world.cells() {
        let biome = catalog.get(*id);
        if biome.elevation <= 1 {
            assert!(seas.contains(&biome.name), "{} sits at sea level", biome.name);
        }
    }

    // No cliffs anywhere
    let grid = Grid::from_cells(50, 50, world.cells().to_vec());
    assert!(grid.continuity_violations(catalog).is_empty());

    // Single-cell islands above the abyss are rare after repair
    let singletons = grid
        .cells()
        .filter(|cell| {
            let Some(biome) = grid.get(*cell) else {
                return false;
            };
            catalog.get(biome).elevation > 0
                && grid.ring(*cell).iter().flatten().all(|n| *n != biome)
        })
        .count();
    let ratio = singletons as f64 / grid.len() as f64;
    assert!(ratio < 0.01, "{singletons} single-cell islands ({ratio:.3})");

    // Residual isolation is tolerated and only reported
    let residual = isolated_cells(&grid, |b| catalog.get(b).elevation, 0).len();
    assert_eq!(residual, report.residual_isolated);
}

#[test]
fn test_path_graphs_cover_their_layer() {
    let (world, _) = generate(3);
    let all = world.graph(Layer::All);
    let sea = world.graph(Layer::Sea);
    let ground = world.graph(Layer::Ground);
    assert_eq!(all.node_count(), 50 * 50);
    assert_eq!(sea.node_count() + ground.node_count(), 50 * 50);
    assert_eq!(all.components(), 1, "Everything is reachable with no restriction");
}

// ============================================================================
// Reachability
// ============================================================================

/// sea | land | sea, in columns
fn channel() -> World {
    let catalog = BiomeCatalog::new();
    let sea = catalog.by_name("TEMPERED_SEA").unwrap().id;
    let land = catalog.by_name("POLAR_BEACH").unwrap().id;
    let config = WorldGenConfig {
        width: 12,
        height: 6,
        ..Default::default()
    };
    let cells = (0..72)
        .map(|i| if (4..8).contains(&(i % 12)) { land } else { sea })
        .collect();
    World::from_grid(catalog, &config, cells).unwrap()
}

#[test]
fn test_disconnected_seas() {
    let world = channel();
    let mut rng = LifeRng::new(0);
    let west = Vec2::new(8.0, 40.0);
    let east = Vec2::new(180.0, 40.0);

    assert!(world.path(west, east, Layer::Sea, &mut rng).is_empty());
    assert!(!world.connected(west, east, Layer::Sea));

    let north_west = Vec2::new(40.0, 8.0);
    assert!(world.connected(west, north_west, Layer::Sea));
    assert!(!world.path(west, north_west, Layer::Sea, &mut rng).is_empty());
}

#[test]
fn test_all_layer_crosses_land() {
    let world = channel();
    let mut rng = LifeRng::new(0);
    let west = Vec2::new(8.0, 40.0);
    let east = Vec2::new(180.0, 40.0);

    let cells = world.cell_path(west, east, Layer::All);
    assert_eq!(cells.first(), Some(&Cell::new(0, 2)));
    assert_eq!(cells.last(), Some(&Cell::new(11, 2)));
    assert_eq!(cells.len(), 12, "A straight row: {cells:?}");

    let path = world.path(west, east, Layer::All, &mut rng);
    assert_eq!(path.len(), cells.len(), "One point per cell, the start cell included");
    assert_eq!(path.first().and_then(|p| world.cell_of(*p)), Some(Cell::new(0, 2)));
    assert_eq!(path.last(), Some(&east));

    assert!(world.path(west, Vec2::new(-4.0, 0.0), Layer::All, &mut rng).is_empty());
    assert!(!world.connected(Vec2::new(60.0, 40.0), west, Layer::Ground));
}
