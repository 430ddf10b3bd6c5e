//! Cell coordinates and the biome grid

use lowlight_biome::{BiomeCatalog, BiomeId};
use serde::{Deserialize, Serialize};

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Offsets of the ring around a cell, clockwise from the top-left corner
///
/// ```text
/// c1 c2 c3
/// c8 c0 c4
/// c7 c6 c5
/// ```
pub const RING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Biome assignment per cell; `None` until a level assigns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<BiomeId>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn from_cells(width: u32, height: u32, cells: Vec<BiomeId>) -> Self {
        Self {
            width,
            height,
            cells: cells.into_iter().map(Some).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Row-major index of an in-grid cell
    pub fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as i32, (index / w) as i32)
    }

    pub fn get(&self, cell: Cell) -> Option<BiomeId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    pub fn set(&mut self, cell: Cell, biome: BiomeId) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = Some(biome);
        }
    }

    /// The eight neighbors `c1..c8`, absent outside the grid or when unassigned
    pub fn ring(&self, cell: Cell) -> [Option<BiomeId>; 8] {
        RING.map(|(dx, dy)| self.get(cell.offset(dx, dy)))
    }

    /// Cells in the order generation visits them (column by column)
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| Cell::new(x, y)))
    }

    /// Every cell assigned, in row-major order
    pub fn assigned(&self) -> Option<Vec<BiomeId>> {
        self.cells.iter().copied().collect()
    }

    /// Pairs of 8-adjacent assigned cells whose elevations differ by more than one
    pub fn continuity_violations(&self, catalog: &BiomeCatalog) -> Vec<(Cell, Cell)> {
        let mut violations = Vec::new();
        for cell in self.cells() {
            let Some(a) = self.get(cell) else { continue };
            // Half the ring is enough to see each pair once
            for (dx, dy) in &RING[2..6] {
                let other = cell.offset(*dx, *dy);
                if let Some(b) = self.get(other) {
                    let delta = catalog.get(a).elevation - catalog.get(b).elevation;
                    if delta.abs() > 1 {
                        violations.push((cell, other));
                    }
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_handles_borders() {
        let mut grid = Grid::new(3, 3);
        grid.set(Cell::new(1, 0), BiomeId(4));
        grid.set(Cell::new(0, 1), BiomeId(7));

        let ring = grid.ring(Cell::new(0, 0));
        assert_eq!(ring[0], None, "c1 is outside");
        assert_eq!(ring[3], Some(BiomeId(4)), "c4 is to the right");
        assert_eq!(ring[5], Some(BiomeId(7)), "c6 is below");
        assert_eq!(ring[4], None, "c5 is unassigned");
    }

    #[test]
    fn test_indexing() {
        let grid = Grid::new(4, 2);
        assert_eq!(grid.index(Cell::new(3, 1)), Some(7));
        assert_eq!(grid.index(Cell::new(4, 0)), None);
        assert_eq!(grid.index(Cell::new(-1, 0)), None);
        assert_eq!(grid.cell_at(5), Cell::new(1, 1));
        assert_eq!(grid.cells().count(), 8);
        assert_eq!(grid.cells().nth(1), Some(Cell::new(0, 1)), "Column-major visit");
        assert!(grid.assigned().is_none());
    }

    #[test]
    fn test_continuity_violations() {
        let catalog = BiomeCatalog::new();
        let abyssal = catalog.by_name("ABYSSAL_SEA").unwrap().id;
        let beach = catalog.by_name("TEMPERED_BEACH").unwrap().id;
        let sea = catalog.by_name("TEMPERED_SEA").unwrap().id;

        let grid = Grid::from_cells(3, 1, vec![abyssal, sea, beach]);
        assert!(grid.continuity_violations(&catalog).is_empty());

        let grid = Grid::from_cells(2, 2, vec![abyssal, sea, sea, beach]);
        let violations = grid.continuity_violations(&catalog);
        assert_eq!(violations, vec![(Cell::new(0, 0), Cell::new(1, 1))]);
    }
}
