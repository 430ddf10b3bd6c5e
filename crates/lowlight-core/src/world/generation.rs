//! Level-by-level biome generation with isolation repair
//!
//! Each elevation level samples a climate field, raises every eligible cell
//! to the biome of that level, then repairs isolated cells. A candidate biome
//! is only written when it keeps every assigned neighbor within one level.

use fastnoise_lite::FastNoiseLite;
use lowlight_biome::{BiomeCatalog, BiomeId};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::error::LifeError;
use crate::world::grid::{Cell, Grid};
use crate::world::isolation::{Neighborhood, isolated_cells};
use crate::world::worldgen_config::WorldGenConfig;

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Repair passes used by each level
    pub repair_passes: Vec<u32>,
    /// Cells changed by repair, per level
    pub repaired: Vec<usize>,
    /// Cells above the abyss still isolated once every level is done
    pub residual_isolated: usize,
}

pub struct WorldGenerator<'a> {
    catalog: &'a BiomeCatalog,
    config: &'a WorldGenConfig,
    noise: FastNoiseLite,
    grid: Grid,
    snapshot: Grid,
}

impl<'a> WorldGenerator<'a> {
    pub fn new(catalog: &'a BiomeCatalog, config: &'a WorldGenConfig, seed: u64) -> Self {
        let grid = Grid::new(config.width, config.height);
        Self {
            catalog,
            config,
            noise: config.climate_noise.to_fastnoise(seed),
            snapshot: grid.clone(),
            grid,
        }
    }

    /// Run every level and return the fully assigned grid
    pub fn generate(mut self) -> Result<(Vec<BiomeId>, GenerationReport), LifeError> {
        self.config.validate(self.catalog)?;

        let mut report = GenerationReport::default();
        for lv in 0..=self.config.max_elevation.max(0) {
            let (passes, repaired) = self.level(lv);
            report.repair_passes.push(passes);
            report.repaired.push(repaired);
        }

        let catalog = self.catalog;
        report.residual_isolated =
            isolated_cells(&self.grid, |b| catalog.get(b).elevation, 0).len();

        let expected = self.grid.len();
        let cells = self.grid.assigned().ok_or(LifeError::GridSize {
            expected,
            actual: 0,
        })?;
        Ok((cells, report))
    }

    /// Climate fraction in `[0, 1]` for a level at a cell
    pub fn climate(&self, lv: i32, cell: Cell) -> f64 {
        let x = f64::from(cell.x) / f64::from(self.config.width);
        let y = f64::from(cell.y) / f64::from(self.config.height);
        let lv = f64::from(lv);

        let mut total = 0.0;
        let mut weights = 0.0;
        for &v in &self.config.octave_weights {
            let v = f64::from(v);
            let sample = self
                .noise
                .get_noise_2d((v * (x + lv)) as f32, (v * (y + lv)) as f32);
            total += 0.5 * (1.0 + f64::from(sample)) / v;
            weights += 1.0 / v;
        }
        (total / weights).clamp(0.0, 1.0)
    }

    fn climate_field(&self, lv: i32) -> Vec<f64> {
        (0..self.grid.len())
            .into_par_iter()
            .map(|i| self.climate(lv, self.grid.cell_at(i)))
            .collect()
    }

    fn classify(&self, lv: i32, climate: f64) -> Option<BiomeId> {
        self.catalog.classify(lv, climate).map(|b| b.id)
    }

    /// Returns the repair passes used and the number of cells repaired
    fn level(&mut self, lv: i32) -> (u32, usize) {
        self.snapshot = self.grid.clone();

        let field = self.climate_field(lv);
        let mut raised = 0usize;
        for cell in self.grid.cells() {
            let Some(index) = self.grid.index(cell) else {
                continue;
            };
            let candidate = self.classify(lv, field[index]);
            if self.eligible(cell, candidate) {
                if let Some(biome) = candidate {
                    raised += usize::from(self.grid.get(cell) != Some(biome));
                    self.grid.set(cell, biome);
                }
            }
        }

        let mut passes = 0;
        let mut repaired = 0;
        while passes < self.config.repair_passes {
            passes += 1;
            let changed = self.repair_pass();
            repaired += changed;
            if changed == 0 {
                break;
            }
        }

        log::debug!(
            "Level {}: {} cells assigned, {} repaired in {} passes",
            lv,
            raised,
            repaired,
            passes
        );
        (passes, repaired)
    }

    /// Accept a candidate if the cell is unassigned, or if every assigned
    /// neighbor stays within one level of it and none sits below the cell's
    /// current value
    pub fn eligible(&self, cell: Cell, candidate: Option<BiomeId>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        let Some(current) = self.grid.get(cell) else {
            return true;
        };
        let b = self.catalog.get(candidate);
        let c0 = self.catalog.get(current);
        self.grid.ring(cell).into_iter().flatten().all(|n| {
            let n = self.catalog.get(n);
            (b.elevation - n.elevation).abs() <= 1 && !n.lower(c0)
        })
    }

    /// Elevation continuity alone
    fn continuous(&self, cell: Cell, candidate: BiomeId) -> bool {
        let e = self.catalog.get(candidate).elevation;
        self.grid
            .ring(cell)
            .into_iter()
            .flatten()
            .all(|n| (e - self.catalog.get(n).elevation).abs() <= 1)
    }

    fn elevation(&self, biome: BiomeId) -> i32 {
        self.catalog.get(biome).elevation
    }

    fn repair_pass(&mut self) -> usize {
        let mut changed = 0;
        for cell in self.grid.cells() {
            let Some(c0) = self.grid.get(cell) else {
                continue;
            };
            if self.elevation(c0) <= 0 || !Neighborhood::of(&self.grid, cell).isolated() {
                continue;
            }
            self.repair(cell);
            if self.grid.get(cell) != Some(c0) {
                changed += 1;
            }
        }
        changed
    }

    fn write(&mut self, cell: Cell, biome: BiomeId) -> bool {
        self.grid.set(cell, biome);
        Neighborhood::of(&self.grid, cell).isolated()
    }

    /// Try each replacement strategy in order until the cell is supported
    fn repair(&mut self, cell: Cell) {
        // Fuse with a diagonal whose corner run already agrees
        let n = Neighborhood::of(&self.grid, cell);
        for (run, corner) in n.fusions() {
            let n = Neighborhood::of(&self.grid, cell);
            let candidate = n.c[corner];
            if run && n.isolated() && self.eligible(cell, candidate) {
                if let Some(b) = candidate {
                    if !self.write(cell, b) {
                        return;
                    }
                }
            }
        }

        // Lower along an axis that dangles outside any run
        for i in 0..4 {
            let n = Neighborhood::of(&self.grid, cell);
            let (axis_ok, flank) = n.axes()[i];
            if axis_ok {
                continue;
            }
            if let Some(b) = self.replacement(cell, &n, &flank) {
                if !self.write(cell, b) {
                    return;
                }
            }
        }

        // Lower towards any neighbor
        let n = Neighborhood::of(&self.grid, cell);
        if let Some(b) = self.replacement(cell, &n, &[1, 2, 3, 4, 5, 6, 7, 8]) {
            if !self.write(cell, b) {
                return;
            }
        }

        // Give up on this level's change
        if let Some(previous) = self.snapshot.get(cell) {
            if self.grid.get(cell) != Some(previous) && self.continuous(cell, previous) {
                self.grid.set(cell, previous);
            }
        }
    }

    /// First eligible biome among the lower neighbors, then the biome one
    /// level down at this cell's climate
    fn replacement(&self, cell: Cell, n: &Neighborhood, slots: &[usize]) -> Option<BiomeId> {
        let c0 = n.c[0].map(|b| self.catalog.get(b))?;
        let mut candidates: SmallVec<[BiomeId; 9]> = slots
            .iter()
            .filter_map(|&slot| n.c[slot])
            .filter(|b| self.catalog.get(*b).lower(c0))
            .collect();
        let below = c0.elevation - 1;
        if let Some(fallback) = self.classify(below, self.climate(below, cell)) {
            candidates.push(fallback);
        }
        candidates
            .into_iter()
            .find(|b| self.eligible(cell, Some(*b)))
    }
}

/// Count cells per biome, in catalog order
pub fn histogram(catalog: &BiomeCatalog, cells: &[BiomeId]) -> Vec<(&'static str, usize)> {
    let mut counts = vec![0usize; catalog.len()];
    for b in cells {
        counts[b.index()] += 1;
    }
    catalog
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(b, n)| (b.name, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> WorldGenConfig {
        WorldGenConfig {
            width: 24,
            height: 24,
            ..Default::default()
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = BiomeCatalog::new();
        let config = small_config();
        let (a, _) = WorldGenerator::new(&catalog, &config, 11).generate().unwrap();
        let (b, _) = WorldGenerator::new(&catalog, &config, 11).generate().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 24 * 24);
    }

    #[test]
    fn test_elevation_is_continuous() {
        let catalog = BiomeCatalog::new();
        let config = small_config();
        for seed in [0, 1, 2, 3] {
            let (cells, _) = WorldGenerator::new(&catalog, &config, seed)
                .generate()
                .unwrap();
            let grid = Grid::from_cells(24, 24, cells);
            assert!(
                grid.continuity_violations(&catalog).is_empty(),
                "seed {seed} produced a cliff"
            );
        }
    }

    #[test]
    fn test_climate_is_normalized() {
        let catalog = BiomeCatalog::new();
        let config = small_config();
        let generator = WorldGenerator::new(&catalog, &config, 5);
        for lv in 0..3 {
            for x in 0..24 {
                let c = generator.climate(lv, Cell::new(x, x / 2));
                assert!((0.0..=1.0).contains(&c), "climate {c} out of range");
            }
        }
    }

    #[test]
    fn test_level_zero_only_is_abyssal() {
        let catalog = BiomeCatalog::new();
        let config = WorldGenConfig {
            max_elevation: 0,
            ..small_config()
        };
        let (cells, report) = WorldGenerator::new(&catalog, &config, 3).generate().unwrap();
        let abyssal = catalog.by_name("ABYSSAL_SEA").unwrap().id;
        assert!(cells.iter().all(|b| *b == abyssal));
        assert_eq!(report.residual_isolated, 0);
        assert_eq!(report.repair_passes, vec![1]);
    }

    #[test]
    fn test_eligibility_rules() {
        let catalog = BiomeCatalog::new();
        let config = WorldGenConfig {
            width: 3,
            height: 3,
            ..Default::default()
        };
        let id = |name: &str| catalog.by_name(name).unwrap().id;
        let mut generator = WorldGenerator::new(&catalog, &config, 0);

        assert!(!generator.eligible(Cell::new(1, 1), None));
        assert!(generator.eligible(Cell::new(1, 1), Some(id("JUNGLE"))), "Unassigned cells accept anything");

        generator.grid = Grid::from_cells(3, 3, vec![id("TEMPERED_SEA"); 9]);
        assert!(generator.eligible(Cell::new(1, 1), Some(id("POLAR_BEACH"))));
        assert!(!generator.eligible(Cell::new(1, 1), Some(id("PLAINS"))), "Two levels above the ring");

        generator.grid.set(Cell::new(0, 0), id("ABYSSAL_SEA"));
        assert!(
            !generator.eligible(Cell::new(1, 1), Some(id("POLAR_BEACH"))),
            "A neighbor below the current cell blocks any change"
        );
    }

    #[test]
    fn test_histogram() {
        let catalog = BiomeCatalog::new();
        let cells = [BiomeId(0), BiomeId(0), BiomeId(4)];
        assert_eq!(
            histogram(&catalog, &cells),
            vec![("ABYSSAL_SEA", 2), ("TEMPERED_BEACH", 1)]
        );
    }
}
