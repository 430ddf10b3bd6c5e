//! World - the finished biome grid plus one path graph per layer

use glam::Vec2;
use lowlight_biome::{Biome, BiomeCatalog, BiomeId, Layer};

use crate::error::LifeError;
use crate::rng::LifeRng;
use crate::world::generation::{GenerationReport, WorldGenerator, histogram};
use crate::world::grid::Cell;
use crate::world::path::LayerGraph;
use crate::world::worldgen_config::WorldGenConfig;

/// Immutable terrain once built: biomes per cell and the derived path graphs
#[derive(Debug, Clone)]
pub struct World {
    catalog: BiomeCatalog,
    width: u32,
    height: u32,
    cell_size: f32,
    path_noise: f32,
    cells: Vec<BiomeId>,
    graphs: [LayerGraph; 3],
}

impl World {
    /// Generate a world from a seed
    pub fn generate(
        catalog: BiomeCatalog,
        config: &WorldGenConfig,
        seed: u64,
    ) -> Result<(Self, GenerationReport), LifeError> {
        let (cells, report) = WorldGenerator::new(&catalog, config, seed).generate()?;

        log::info!(
            "Generated {}x{} world from seed {} ({} repair passes)",
            config.width,
            config.height,
            seed,
            report.repair_passes.iter().sum::<u32>()
        );
        for (name, count) in histogram(&catalog, &cells) {
            log::info!("  {:<16} {:>5}", name, count);
        }
        if report.residual_isolated > 0 {
            log::warn!(
                "Isolation repair left {} isolated cells after {} passes per level",
                report.residual_isolated,
                config.repair_passes
            );
        }

        Ok((Self::from_grid(catalog, config, cells)?, report))
    }

    /// Build a world from an explicit row-major grid
    pub fn from_grid(
        catalog: BiomeCatalog,
        config: &WorldGenConfig,
        cells: Vec<BiomeId>,
    ) -> Result<Self, LifeError> {
        config.validate(&catalog)?;
        let expected = config.width as usize * config.height as usize;
        if cells.len() != expected {
            return Err(LifeError::GridSize {
                expected,
                actual: cells.len(),
            });
        }
        if let Some(bad) = cells.iter().find(|b| b.index() >= catalog.len()) {
            return Err(LifeError::UnknownBiome(format!("#{}", bad.0)));
        }

        let graphs = Layer::ALL
            .map(|layer| LayerGraph::build(layer, &catalog, config.width, config.height, &cells));

        Ok(Self {
            catalog,
            width: config.width,
            height: config.height,
            cell_size: config.cell_size,
            path_noise: config.path_noise,
            cells,
            graphs,
        })
    }

    pub fn catalog(&self) -> &BiomeCatalog {
        &self.catalog
    }

    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World extent in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    pub fn cells(&self) -> &[BiomeId] {
        &self.cells
    }

    pub fn graph(&self, layer: Layer) -> &LayerGraph {
        &self.graphs[layer.index()]
    }

    pub fn outside(&self, position: Vec2) -> bool {
        let size = self.size();
        !(position.x >= 0.0 && position.y >= 0.0 && position.x < size.x && position.y < size.y)
    }

    /// Clamp a position into the world
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        let max = (self.size() - Vec2::ONE).max(Vec2::ZERO);
        position.clamp(Vec2::ZERO, max)
    }

    pub fn cell_of(&self, position: Vec2) -> Option<Cell> {
        if self.outside(position) {
            return None;
        }
        let c = (position / self.cell_size).floor();
        Some(Cell::new(c.x as i32, c.y as i32))
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        (Vec2::new(cell.x as f32, cell.y as f32) + 0.5) * self.cell_size
    }

    pub fn biome(&self, cell: Cell) -> Option<&Biome> {
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height {
            return None;
        }
        let id = self.cells[cell.y as usize * self.width as usize + cell.x as usize];
        Some(self.catalog.get(id))
    }

    /// Biome under a pixel position, `None` outside the world
    pub fn at(&self, position: Vec2) -> Option<&Biome> {
        self.cell_of(position).and_then(|cell| self.biome(cell))
    }

    /// Whether two positions share a component of the layer graph
    pub fn connected(&self, from: Vec2, to: Vec2, layer: Layer) -> bool {
        match (self.cell_of(from), self.cell_of(to)) {
            (Some(a), Some(b)) => self.graph(layer).connected(a, b),
            _ => false,
        }
    }

    /// Cells walked between two positions, empty when unreachable
    pub fn cell_path(&self, from: Vec2, to: Vec2, layer: Layer) -> Vec<Cell> {
        match (self.cell_of(from), self.cell_of(to)) {
            (Some(a), Some(b)) => self.graph(layer).search(a, b),
            _ => Vec::new(),
        }
    }

    /// Jittered subtargets towards `to`, ending exactly on it
    pub fn path(&self, from: Vec2, to: Vec2, layer: Layer, rng: &mut LifeRng) -> Vec<Vec2> {
        let cells = self.cell_path(from, to, layer);
        let Some((_, intermediate)) = cells.split_last() else {
            return Vec::new();
        };

        let spread = self.path_noise * self.cell_size / 2.0;
        let mut points: Vec<Vec2> = intermediate
            .iter()
            .map(|cell| {
                let lo = Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size;
                let hi = lo + Vec2::splat(self.cell_size - 1e-3);
                let jitter = Vec2::new(rng.random(-spread, spread), rng.random(-spread, spread));
                (self.cell_center(*cell) + jitter).clamp(lo, hi)
            })
            .collect();
        points.push(to);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> World {
        // sea | beach | sea, 3 cells per stripe
        let catalog = BiomeCatalog::new();
        let sea = catalog.by_name("TEMPERED_SEA").unwrap().id;
        let beach = catalog.by_name("TEMPERED_BEACH").unwrap().id;
        let config = WorldGenConfig {
            width: 9,
            height: 4,
            ..Default::default()
        };
        let cells = (0..36)
            .map(|i| if (3..6).contains(&(i % 9)) { beach } else { sea })
            .collect();
        World::from_grid(catalog, &config, cells).unwrap()
    }

    #[test]
    fn test_bounds_and_lookup() {
        let world = striped();
        assert_eq!(world.size(), Vec2::new(144.0, 64.0));
        assert!(world.outside(Vec2::new(-0.1, 3.0)));
        assert!(world.outside(Vec2::new(144.0, 3.0)));
        assert!(!world.outside(Vec2::new(143.9, 63.9)));
        assert_eq!(world.at(Vec2::new(56.0, 8.0)).map(|b| b.name), Some("TEMPERED_BEACH"));
        assert_eq!(world.at(Vec2::new(8.0, 8.0)).map(|b| b.name), Some("TEMPERED_SEA"));
        assert!(world.at(Vec2::new(500.0, 8.0)).is_none());
        assert_eq!(world.clamp(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 63.0));
    }

    #[test]
    fn test_sea_is_split_by_land() {
        let world = striped();
        let mut rng = LifeRng::new(1);
        let (a, b) = (Vec2::new(8.0, 8.0), Vec2::new(136.0, 8.0));
        assert!(!world.connected(a, b, Layer::Sea));
        assert!(world.path(a, b, Layer::Sea, &mut rng).is_empty());
        assert!(world.connected(a, b, Layer::All));
        assert!(!world.connected(a, Vec2::new(-1.0, 0.0), Layer::All));
    }

    #[test]
    fn test_path_jitter_stays_in_cells() {
        let world = striped();
        let mut rng = LifeRng::new(7);
        let (from, to) = (Vec2::new(8.0, 8.0), Vec2::new(130.0, 60.0));
        let cells = world.cell_path(from, to, Layer::All);
        let path = world.path(from, to, Layer::All, &mut rng);
        assert_eq!(path.len(), cells.len());
        assert_eq!(path.last(), Some(&to), "Last subtarget is the exact destination");
        for (point, cell) in path.iter().zip(&cells).take(cells.len() - 1) {
            assert_eq!(world.cell_of(*point), Some(*cell), "{point} left {cell:?}");
        }
    }

    #[test]
    fn test_from_grid_rejects_bad_input() {
        let config = WorldGenConfig {
            width: 2,
            height: 2,
            ..Default::default()
        };
        let result = World::from_grid(BiomeCatalog::new(), &config, vec![BiomeId(0); 3]);
        assert!(matches!(result, Err(LifeError::GridSize { expected: 4, actual: 3 })));
        let result = World::from_grid(BiomeCatalog::new(), &config, vec![BiomeId(99); 4]);
        assert!(matches!(result, Err(LifeError::UnknownBiome(_))));
    }
}
