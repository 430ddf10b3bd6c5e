//! Per-layer path graphs and jump point search
//!
//! Every layer keeps a petgraph over its passable cells. Components are
//! labelled once with a union-find, so reachability is two lookups. Searches
//! run jump point search over the same passability and expand the jump points
//! back into consecutive cells.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use ahash::{HashMap, HashSet};
use bresenham::Bresenham;
use lowlight_biome::{BiomeCatalog, BiomeId, Layer};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;

use crate::world::grid::Cell;

/// Octile distance between two cells
pub fn octile(a: Cell, b: Cell) -> f32 {
    let dx = (a.x - b.x).unsigned_abs() as f32;
    let dy = (a.y - b.y).unsigned_abs() as f32;
    dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)
}

#[derive(Debug, Clone)]
pub struct LayerGraph {
    layer: Layer,
    width: i32,
    height: i32,
    passable: Vec<bool>,
    graph: UnGraph<Cell, f32>,
    component: Vec<Option<usize>>,
    components: usize,
}

impl LayerGraph {
    pub fn build(layer: Layer, catalog: &BiomeCatalog, width: u32, height: u32, cells: &[BiomeId]) -> Self {
        let (w, h) = (width as i32, height as i32);
        let passable: Vec<bool> = cells
            .iter()
            .map(|b| layer.admits(catalog.get(*b)))
            .collect();

        let mut graph = UnGraph::<Cell, f32>::default();
        let mut nodes: Vec<Option<NodeIndex>> = vec![None; passable.len()];
        for (i, open) in passable.iter().enumerate() {
            if *open {
                nodes[i] = Some(graph.add_node(Cell::new(i as i32 % w, i as i32 / w)));
            }
        }

        let node_at = |x: i32, y: i32| {
            (x >= 0 && y >= 0 && x < w && y < h)
                .then(|| nodes[(y * w + x) as usize])
                .flatten()
        };
        for y in 0..h {
            for x in 0..w {
                let Some(a) = node_at(x, y) else { continue };
                // Right, down and both lower diagonals cover every pair once
                for (dx, dy) in [(1, 0), (0, 1), (1, 1), (-1, 1)] {
                    let Some(b) = node_at(x + dx, y + dy) else {
                        continue;
                    };
                    let diagonal = dx != 0 && dy != 0;
                    if diagonal && (node_at(x + dx, y).is_none() || node_at(x, y + dy).is_none()) {
                        continue;
                    }
                    graph.add_edge(a, b, if diagonal { SQRT_2 } else { 1.0 });
                }
            }
        }

        let mut sets = UnionFind::<usize>::new(graph.node_count());
        for edge in graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let labels = sets.into_labeling();
        let component = nodes
            .iter()
            .map(|node| node.map(|n| labels[n.index()]))
            .collect();
        let components = petgraph::algo::connected_components(&graph);

        log::debug!(
            "Path graph {}: {} nodes, {} edges, {} components",
            layer.name(),
            graph.node_count(),
            graph.edge_count(),
            components
        );

        Self {
            layer,
            width: w,
            height: h,
            passable,
            graph,
            component,
            components,
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn components(&self) -> usize {
        self.components
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn walkable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.passable[i])
    }

    pub fn component(&self, cell: Cell) -> Option<usize> {
        self.index(cell.x, cell.y).and_then(|i| self.component[i])
    }

    pub fn connected(&self, a: Cell, b: Cell) -> bool {
        match (self.component(a), self.component(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Cells from `from` to `to` inclusive, empty when unreachable
    pub fn search(&self, from: Cell, to: Cell) -> Vec<Cell> {
        if !self.connected(from, to) {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<Cell, Cell> = HashMap::default();
        let mut g_score: HashMap<Cell, f32> = HashMap::default();
        let mut closed: HashSet<Cell> = HashSet::default();

        open.push(Open {
            f: octile(from, to),
            g: 0.0,
            cell: from,
        });
        g_score.insert(from, 0.0);

        while let Some(current) = open.pop() {
            if !closed.insert(current.cell) {
                continue;
            }
            if current.cell == to {
                return self.expand(&came_from, to);
            }

            let parent = came_from.get(&current.cell).copied();
            for next in self.neighbors(current.cell, parent) {
                let dx = next.x - current.cell.x;
                let dy = next.y - current.cell.y;
                let Some(jump) = self.jump(next, dx, dy, to) else {
                    continue;
                };
                if closed.contains(&jump) {
                    continue;
                }
                let g = current.g + octile(current.cell, jump);
                if g < g_score.get(&jump).copied().unwrap_or(f32::INFINITY) {
                    g_score.insert(jump, g);
                    came_from.insert(jump, current.cell);
                    open.push(Open {
                        f: g + octile(jump, to),
                        g,
                        cell: jump,
                    });
                }
            }
        }

        // Components said reachable, so this only happens on a broken graph
        log::warn!(
            "Jump point search failed on layer {} from {:?} to {:?}",
            self.layer.name(),
            from,
            to
        );
        Vec::new()
    }

    /// Pruned neighbors; diagonals only when both sides are open
    fn neighbors(&self, cell: Cell, parent: Option<Cell>) -> SmallVec<[Cell; 8]> {
        let (x, y) = (cell.x, cell.y);
        let mut out = SmallVec::new();

        let Some(parent) = parent else {
            for (dx, dy) in crate::world::grid::RING {
                let diagonal = dx != 0 && dy != 0;
                if self.walkable(x + dx, y + dy)
                    && (!diagonal || (self.walkable(x + dx, y) && self.walkable(x, y + dy)))
                {
                    out.push(cell.offset(dx, dy));
                }
            }
            return out;
        };

        let dx = (x - parent.x).signum();
        let dy = (y - parent.y).signum();
        if dx != 0 && dy != 0 {
            let vertical = self.walkable(x, y + dy);
            let horizontal = self.walkable(x + dx, y);
            if vertical {
                out.push(Cell::new(x, y + dy));
            }
            if horizontal {
                out.push(Cell::new(x + dx, y));
            }
            if vertical && horizontal {
                out.push(Cell::new(x + dx, y + dy));
            }
        } else if dx != 0 {
            let next = self.walkable(x + dx, y);
            let top = self.walkable(x, y + 1);
            let bottom = self.walkable(x, y - 1);
            if next {
                out.push(Cell::new(x + dx, y));
                if top {
                    out.push(Cell::new(x + dx, y + 1));
                }
                if bottom {
                    out.push(Cell::new(x + dx, y - 1));
                }
            }
            if top {
                out.push(Cell::new(x, y + 1));
            }
            if bottom {
                out.push(Cell::new(x, y - 1));
            }
        } else if dy != 0 {
            let next = self.walkable(x, y + dy);
            let right = self.walkable(x + 1, y);
            let left = self.walkable(x - 1, y);
            if next {
                out.push(Cell::new(x, y + dy));
                if right {
                    out.push(Cell::new(x + 1, y + dy));
                }
                if left {
                    out.push(Cell::new(x - 1, y + dy));
                }
            }
            if right {
                out.push(Cell::new(x + 1, y));
            }
            if left {
                out.push(Cell::new(x - 1, y));
            }
        }
        out
    }

    /// Walk from `cell` in direction `(dx, dy)` until a jump point or a wall
    fn jump(&self, cell: Cell, dx: i32, dy: i32, goal: Cell) -> Option<Cell> {
        let (mut x, mut y) = (cell.x, cell.y);
        loop {
            if !self.walkable(x, y) {
                return None;
            }
            if Cell::new(x, y) == goal {
                return Some(goal);
            }

            if dx != 0 && dy != 0 {
                if self.jump(Cell::new(x + dx, y), dx, 0, goal).is_some()
                    || self.jump(Cell::new(x, y + dy), 0, dy, goal).is_some()
                {
                    return Some(Cell::new(x, y));
                }
            } else if dx != 0 {
                if (self.walkable(x, y - 1) && !self.walkable(x - dx, y - 1))
                    || (self.walkable(x, y + 1) && !self.walkable(x - dx, y + 1))
                {
                    return Some(Cell::new(x, y));
                }
            } else if dy != 0 {
                if (self.walkable(x - 1, y) && !self.walkable(x - 1, y - dy))
                    || (self.walkable(x + 1, y) && !self.walkable(x + 1, y - dy))
                {
                    return Some(Cell::new(x, y));
                }
            } else {
                return None;
            }

            if self.walkable(x + dx, y) && self.walkable(x, y + dy) {
                x += dx;
                y += dy;
            } else {
                return None;
            }
        }
    }

    /// Turn the jump point chain ending at `to` into consecutive cells
    fn expand(&self, came_from: &HashMap<Cell, Cell>, to: Cell) -> Vec<Cell> {
        let mut points = vec![to];
        let mut current = to;
        while let Some(&previous) = came_from.get(&current) {
            points.push(previous);
            current = previous;
        }
        points.reverse();

        let mut cells = Vec::with_capacity(points.len() * 4);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            for (x, y) in Bresenham::new((a.x as isize, a.y as isize), (b.x as isize, b.y as isize)) {
                cells.push(Cell::new(x as i32, y as i32));
            }
        }
        cells.push(to);
        cells
    }
}

#[derive(Debug, PartialEq)]
struct Open {
    f: f32,
    g: f32,
    cell: Cell,
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `#` is ground, `~` is sea
    fn layer(rows: &[&str], layer: Layer) -> LayerGraph {
        let catalog = BiomeCatalog::new();
        let sea = catalog.by_name("TEMPERED_SEA").unwrap().id;
        let ground = catalog.by_name("TEMPERED_BEACH").unwrap().id;
        let cells: Vec<BiomeId> = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|c| if c == '#' { ground } else { sea })
            .collect();
        LayerGraph::build(layer, &catalog, rows[0].len() as u32, rows.len() as u32, &cells)
    }

    fn assert_contiguous(path: &[Cell], graph: &LayerGraph) {
        for pair in path.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            assert!(dx <= 1 && dy <= 1 && dx + dy > 0, "gap between {:?}", pair);
            if dx == 1 && dy == 1 {
                assert!(
                    graph.walkable(pair[1].x, pair[0].y) && graph.walkable(pair[0].x, pair[1].y),
                    "corner cut at {:?}",
                    pair
                );
            }
        }
        for cell in path {
            assert!(graph.walkable(cell.x, cell.y), "{:?} is blocked", cell);
        }
    }

    #[test]
    fn test_open_field_is_straight() {
        let g = layer(&["#####", "#####", "#####", "#####", "#####"], Layer::Ground);
        let path = g.search(Cell::new(0, 0), Cell::new(4, 4));
        assert_eq!(path.len(), 5, "Pure diagonal: {:?}", path);
        assert_contiguous(&path, &g);
        assert_eq!(path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(path.last(), Some(&Cell::new(4, 4)));
    }

    #[test]
    fn test_detour_around_wall() {
        let rows = ["#####", "###~#", "###~#", "###~#", "###~#"];
        let g = layer(&rows, Layer::Ground);
        let path = g.search(Cell::new(2, 4), Cell::new(4, 4));
        assert_contiguous(&path, &g);
        assert_eq!(path.last(), Some(&Cell::new(4, 4)));
        assert!(path.iter().any(|c| c.y == 0), "Must climb over the wall");
    }

    #[test]
    fn test_no_corner_cutting() {
        let rows = ["#~", "~#"];
        let g = layer(&rows, Layer::Ground);
        assert!(!g.connected(Cell::new(0, 0), Cell::new(1, 1)));
        assert!(g.search(Cell::new(0, 0), Cell::new(1, 1)).is_empty());
        assert_eq!(g.components(), 2);
    }

    #[test]
    fn test_layers_split_terrain() {
        let rows = ["~~#~~", "~~#~~", "~~#~~"];
        let sea = layer(&rows, Layer::Sea);
        let all = layer(&rows, Layer::All);
        assert!(!sea.connected(Cell::new(0, 0), Cell::new(4, 2)));
        assert!(sea.search(Cell::new(0, 0), Cell::new(4, 2)).is_empty());
        assert!(all.connected(Cell::new(0, 0), Cell::new(4, 2)));
        assert_eq!(all.components(), 1);
        assert_eq!(sea.node_count(), 12);

        let path = all.search(Cell::new(0, 0), Cell::new(4, 2));
        assert_contiguous(&path, &all);
        assert_eq!(path.len(), 5, "{:?}", path);
    }

    #[test]
    fn test_same_cell_and_blocked_endpoints() {
        let g = layer(&["#~#"], Layer::Ground);
        assert_eq!(g.search(Cell::new(0, 0), Cell::new(0, 0)), vec![Cell::new(0, 0)]);
        assert!(g.search(Cell::new(1, 0), Cell::new(1, 0)).is_empty());
        assert!(!g.connected(Cell::new(0, 0), Cell::new(9, 9)));
    }

    #[test]
    fn test_maze_path_is_optimal_length() {
        let rows = [
            "#######",
            "#~~~~~#",
            "#~###~#",
            "#~#~#~#",
            "###~###",
        ];
        let g = layer(&rows, Layer::Ground);
        let from = Cell::new(3, 2);
        let to = Cell::new(0, 4);
        let path = g.search(from, to);
        assert_contiguous(&path, &g);
        // (3,2) -> (2,2) -> (2,3) -> (2,4) -> (1,4) -> (0,4)
        assert_eq!(path.len(), 6, "{:?}", path);
    }
}
