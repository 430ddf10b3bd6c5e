//! Detection of isolated cells
//!
//! A cell is supported when it belongs to a run of three consecutive
//! same-biome cells along the ring (a corner plus both of its sides) and none
//! of its same-biome axis neighbors dangles outside such a run.
//!
//! ```text
//! X O O    d234 holds whatever c0 is
//! X c0 O   d456 is missing c5
//! X O X
//! ```

use lowlight_biome::BiomeId;

use crate::world::grid::{Cell, Grid};

/// A cell and its ring, `c[0]` being the cell itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    pub c: [Option<BiomeId>; 9],
}

impl Neighborhood {
    pub fn of(grid: &Grid, cell: Cell) -> Self {
        let ring = grid.ring(cell);
        let mut c = [None; 9];
        c[0] = grid.get(cell);
        c[1..].copy_from_slice(&ring);
        Self { c }
    }

    fn same(&self, a: usize, b: usize) -> bool {
        matches!((self.c[a], self.c[b]), (Some(x), Some(y)) if x == y)
    }

    /// Corner run `c1 c2` matching `c8`
    pub fn d812(&self) -> bool {
        self.same(1, 8) && self.same(2, 8)
    }

    pub fn d234(&self) -> bool {
        self.same(3, 2) && self.same(4, 2)
    }

    pub fn d456(&self) -> bool {
        self.same(5, 4) && self.same(6, 4)
    }

    pub fn d678(&self) -> bool {
        self.same(7, 6) && self.same(8, 6)
    }

    fn c812(&self) -> bool {
        self.same(8, 0) && self.d812()
    }

    fn c234(&self) -> bool {
        self.same(2, 0) && self.d234()
    }

    fn c456(&self) -> bool {
        self.same(4, 0) && self.d456()
    }

    fn c678(&self) -> bool {
        self.same(6, 0) && self.d678()
    }

    /// Left axis neighbor is either foreign or part of a run with `c0`
    pub fn c8x(&self) -> bool {
        !self.same(8, 0) || self.c678() || self.c812()
    }

    pub fn c2x(&self) -> bool {
        !self.same(2, 0) || self.c812() || self.c234()
    }

    pub fn c4x(&self) -> bool {
        !self.same(4, 0) || self.c234() || self.c456()
    }

    pub fn c6x(&self) -> bool {
        !self.same(6, 0) || self.c456() || self.c678()
    }

    pub fn isolated(&self) -> bool {
        let in_run = self.c812() || self.c234() || self.c456() || self.c678();
        let axes = self.c8x() && self.c2x() && self.c4x() && self.c6x();
        !(in_run && axes)
    }

    /// Axis checks paired with the four cells flanking that axis
    pub fn axes(&self) -> [(bool, [usize; 4]); 4] {
        [
            (self.c8x(), [6, 7, 1, 2]),
            (self.c2x(), [8, 1, 3, 4]),
            (self.c4x(), [2, 3, 5, 6]),
            (self.c6x(), [4, 5, 7, 8]),
        ]
    }

    /// Diagonal fusions: corner runs paired with the corner to copy
    pub fn fusions(&self) -> [(bool, usize); 4] {
        [
            (self.d812(), 1),
            (self.d234(), 3),
            (self.d456(), 5),
            (self.d678(), 7),
        ]
    }
}

/// Cells above `min_elevation` still isolated in `grid`
pub fn isolated_cells(
    grid: &Grid,
    elevation: impl Fn(BiomeId) -> i32,
    min_elevation: i32,
) -> Vec<Cell> {
    grid.cells()
        .filter(|cell| {
            grid.get(*cell)
                .is_some_and(|b| elevation(b) > min_elevation)
                && Neighborhood::of(grid, *cell).isolated()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: BiomeId = BiomeId(4);
    const B: BiomeId = BiomeId(5);

    fn grid(rows: &[&str]) -> Grid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| if ch == 'A' { A } else { B })
            .collect();
        Grid::from_cells(width, height, cells)
    }

    #[test]
    fn test_uniform_cell_is_supported() {
        let g = grid(&["AAA", "AAA", "AAA"]);
        assert!(!Neighborhood::of(&g, Cell::new(1, 1)).isolated());
    }

    #[test]
    fn test_single_cell_island_is_isolated() {
        let g = grid(&["AAA", "ABA", "AAA"]);
        let n = Neighborhood::of(&g, Cell::new(1, 1));
        assert!(n.isolated());
        assert!(n.d812() && n.d234() && n.d456() && n.d678());
    }

    #[test]
    fn test_straight_border_is_supported() {
        let g = grid(&["AAA", "AAA", "BBB"]);
        assert!(!Neighborhood::of(&g, Cell::new(1, 1)).isolated());
    }

    #[test]
    fn test_thin_line_is_isolated() {
        let g = grid(&["AAA", "BBB", "AAA"]);
        let n = Neighborhood::of(&g, Cell::new(1, 1));
        assert!(n.isolated(), "A one cell thick strip has no corner run");
        assert!(n.c2x() && n.c6x(), "Foreign axes pass");
        assert!(!n.c4x() && !n.c8x());
    }

    #[test]
    fn test_dangling_axis_neighbor() {
        // c0 sits in the c234 run but c6 below is a lone spur
        let g = grid(&["BAA", "BAA", "BAB"]);
        let n = Neighborhood::of(&g, Cell::new(1, 1));
        assert!(!n.c6x());
        assert!(n.isolated());
    }

    #[test]
    fn test_border_cells_have_absent_neighbors() {
        let g = grid(&["AAA", "AAA", "AAA"]);
        let corner = Neighborhood::of(&g, Cell::new(0, 0));
        assert!(corner.c[1].is_none());
        assert!(!corner.isolated(), "c456 run still supports the corner");

        let cells = isolated_cells(&g, |_| 1, 0);
        assert!(cells.is_empty());
    }
}
