//! Text output: an ASCII map renderer and the census line

use std::collections::BTreeMap;

use lowlight_core::biome::Biome;
use lowlight_core::{EntityType, EntityView, Renderer, World};

/// Draws the world as one character per cell, entities on top of terrain
pub struct AsciiMap {
    width: usize,
    height: usize,
    cell_size: f32,
    glyphs: Vec<char>,
    frame: Option<(u64, String)>,
}

impl AsciiMap {
    pub fn new(world: &World) -> Self {
        let (width, height) = (world.width() as usize, world.height() as usize);
        Self {
            width,
            height,
            cell_size: world.cell_size(),
            glyphs: vec![' '; width * height],
            frame: None,
        }
    }

    /// The last completed frame and its tick
    pub fn take_frame(&mut self) -> Option<(u64, String)> {
        self.frame.take()
    }

    fn put(&mut self, cx: i32, cy: i32, glyph: char) {
        if cx < 0 || cy < 0 {
            return;
        }
        let (x, y) = (cx as usize, cy as usize);
        if x < self.width && y < self.height {
            self.glyphs[y * self.width + x] = glyph;
        }
    }
}

impl Renderer for AsciiMap {
    fn tile(&mut self, cx: i32, cy: i32, biome: &Biome) {
        self.put(cx, cy, tile_glyph(biome));
    }

    fn entity(&mut self, view: &EntityView) {
        let cell = view.position / self.cell_size;
        self.put(cell.x.floor() as i32, cell.y.floor() as i32, entity_glyph(view));
    }

    fn frame(&mut self, tick: u64) {
        let text = self
            .glyphs
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        self.frame = Some((tick, text));
    }
}

/// Terrain glyph by elevation
pub fn tile_glyph(biome: &Biome) -> char {
    match biome.elevation {
        e if e <= 0 => '~',
        1 => '-',
        2 => '.',
        3 => '"',
        4 => '^',
        _ => 'A',
    }
}

pub fn entity_glyph(view: &EntityView) -> char {
    match view.entity_type {
        EntityType::Creature => match view.render_key {
            "133" => 'E',
            "129" => 'M',
            _ => 'C',
        },
        EntityType::CreatureEgg => 'o',
        // Seeds and sprouts are drawn small
        EntityType::BerryTree if matches!(view.render_key, "T00" | "T01") => 't',
        EntityType::BerryTree => 'T',
        EntityType::Berry => '*',
        EntityType::Pokeblock => '+',
    }
}

/// `tag=count` pairs in type order
pub fn census_line(census: &BTreeMap<EntityType, usize>) -> String {
    census
        .iter()
        .map(|(t, n)| format!("{}={}", t.tag(), n))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lowlight_core::biome::BiomeCatalog;
    use lowlight_core::creatures::Species;
    use lowlight_core::{Life, LifeConfig, Spawn, WorldGenConfig};

    fn strip() -> Life {
        let catalog = BiomeCatalog::new();
        let sea = catalog.by_name("TEMPERED_SEA").unwrap().id;
        let beach = catalog.by_name("TEMPERED_BEACH").unwrap().id;
        let config = WorldGenConfig {
            width: 4,
            height: 2,
            ..Default::default()
        };
        let cells = vec![sea, sea, beach, beach, sea, sea, beach, beach];
        let world = World::from_grid(catalog, &config, cells).unwrap();
        Life::with_world(LifeConfig::default(), world).unwrap()
    }

    #[test]
    fn test_map_draws_terrain_and_entities() {
        let mut life = strip();
        let evoli = Spawn::creature(life.genes(), Species::Evoli);
        life.spawn(Vec2::new(40.0, 8.0), evoli).unwrap();
        life.spawn(Vec2::new(8.0, 24.0), Spawn::Pokeblock).unwrap();

        let mut map = AsciiMap::new(life.world());
        life.render(&mut map);
        let (tick, text) = map.take_frame().unwrap();
        assert_eq!(tick, 0);
        assert_eq!(text, "--E.\n+-..");
        assert!(map.take_frame().is_none());
    }

    #[test]
    fn test_census_line() {
        let mut life = strip();
        life.spawn(Vec2::new(8.0, 8.0), Spawn::Pokeblock).unwrap();
        assert_eq!(
            census_line(&life.census()),
            "creature=0 creature_egg=0 berry_tree=0 berry=0 pokeblock=1"
        );
    }
}
