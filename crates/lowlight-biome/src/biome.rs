//! Biome records and the catalog used by world generation

use ahash::HashMap;
use serde::{Deserialize, Serialize};

/// Elevation at or below which a biome is aquatic
pub const SEA_LEVEL: i32 = 1;

/// Highest elevation tier present in the default catalog
pub const MAX_ELEVATION: i32 = 5;

/// Index of a biome inside its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BiomeId(pub u8);

impl BiomeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named terrain category
///
/// Records are built once by the catalog and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Biome {
    pub id: BiomeId,
    pub name: &'static str,
    pub elevation: i32,
    pub climate: i32,
    /// Texture key handed to the renderer
    pub render_key: &'static str,
}

impl Biome {
    /// Same biome type
    pub fn same(&self, other: &Biome) -> bool {
        self.name == other.name
    }

    /// This biome sits strictly below `than`
    pub fn lower(&self, than: &Biome) -> bool {
        self.elevation < than.elevation
    }

    /// This biome is strictly colder than `than`
    pub fn colder(&self, than: &Biome) -> bool {
        self.climate < than.climate
    }

    /// At or below sea level
    pub fn is_aquatic(&self) -> bool {
        self.elevation <= SEA_LEVEL
    }
}

impl PartialEq for Biome {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.elevation == other.elevation
            && self.climate == other.climate
    }
}

impl Eq for Biome {}

/// Immutable set of biomes, built once and passed by reference
#[derive(Debug, Clone)]
pub struct BiomeCatalog {
    biomes: Vec<Biome>,
    by_name: HashMap<&'static str, BiomeId>,
    max_elevation: i32,
}

impl Default for BiomeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BiomeCatalog {
    /// Build the standard fifteen-biome catalog
    pub fn new() -> Self {
        const ENTRIES: [(&str, &str, i32, i32); 15] = [
            ("ABYSSAL_SEA", "B00", 0, 1),
            ("TEMPERED_SEA", "B01", 1, 2),
            ("TROPICAL_SEA", "B02", 1, 3),
            ("POLAR_BEACH", "B03", 2, 1),
            ("TEMPERED_BEACH", "B04", 2, 2),
            ("TROPICAL_BEACH", "B05", 2, 3),
            ("PLAINS", "B06", 3, 1),
            ("FOREST", "B07", 3, 2),
            ("JUNGLE", "B08", 3, 3),
            ("CAVES", "B09", 4, 1),
            ("MOUNTAINS", "B10", 4, 2),
            ("ARID_MOUNTAINS", "B11", 4, 3),
            ("GLACIAL_PEAK", "B12", 5, 1),
            ("ROCKY_PEAK", "B13", 5, 2),
            ("VOLCANIC_PEAK", "B14", 5, 3),
        ];

        let mut biomes = Vec::with_capacity(ENTRIES.len());
        let mut by_name = HashMap::default();
        let mut max_elevation = 0;
        for (i, (name, render_key, elevation, climate)) in ENTRIES.into_iter().enumerate() {
            let id = BiomeId(i as u8);
            biomes.push(Biome {
                id,
                name,
                elevation,
                climate,
                render_key,
            });
            by_name.insert(name, id);
            max_elevation = max_elevation.max(elevation);
        }

        log::debug!(
            "Biome catalog ready: {} biomes, max elevation {}",
            biomes.len(),
            max_elevation
        );

        Self {
            biomes,
            by_name,
            max_elevation,
        }
    }

    pub fn get(&self, id: BiomeId) -> &Biome {
        &self.biomes[id.index()]
    }

    pub fn by_name(&self, name: &str) -> Option<&Biome> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Biome> {
        self.biomes.iter()
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn max_elevation(&self) -> i32 {
        self.max_elevation
    }

    /// Biome matching an elevation tier and a climate fraction in `[0, 1]`
    ///
    /// Returns `None` when the climate is too low for the tier to exist there.
    pub fn classify(&self, elevation: i32, climate: f64) -> Option<&Biome> {
        let name = match elevation {
            e if e <= 0 => "ABYSSAL_SEA",
            1 if climate > 0.70 => "TROPICAL_SEA",
            1 if climate > 0.40 => "TEMPERED_SEA",
            2 if climate > 0.80 => "TROPICAL_BEACH",
            2 if climate > 0.60 => "TEMPERED_BEACH",
            2 if climate > 0.40 => "POLAR_BEACH",
            3 if climate > 0.80 => "JUNGLE",
            3 if climate > 0.60 => "PLAINS",
            3 if climate > 0.40 => "FOREST",
            4 if climate > 0.80 => "ARID_MOUNTAINS",
            4 if climate > 0.60 => "MOUNTAINS",
            4 if climate > 0.40 => "CAVES",
            5 if climate > 0.80 => "VOLCANIC_PEAK",
            5 if climate > 0.60 => "ROCKY_PEAK",
            5 if climate > 0.40 => "GLACIAL_PEAK",
            _ => return None,
        };
        self.by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let catalog = BiomeCatalog::new();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.max_elevation(), MAX_ELEVATION);

        let abyssal = catalog.by_name("ABYSSAL_SEA").unwrap();
        assert_eq!(abyssal.elevation, 0);
        assert_eq!(catalog.get(abyssal.id), abyssal);
        assert!(catalog.by_name("LAVA_LAKE").is_none());
    }

    #[test]
    fn test_classify_tiers() {
        let catalog = BiomeCatalog::new();
        let name = |e, c| catalog.classify(e, c).map(|b| b.name);

        // Elevation zero is always abyssal, whatever the climate
        assert_eq!(name(0, 0.0), Some("ABYSSAL_SEA"));
        assert_eq!(name(-3, 0.9), Some("ABYSSAL_SEA"));

        assert_eq!(name(1, 0.75), Some("TROPICAL_SEA"));
        assert_eq!(name(1, 0.5), Some("TEMPERED_SEA"));
        assert_eq!(name(1, 0.3), None);

        assert_eq!(name(2, 0.85), Some("TROPICAL_BEACH"));
        assert_eq!(name(2, 0.65), Some("TEMPERED_BEACH"));
        assert_eq!(name(2, 0.45), Some("POLAR_BEACH"));

        assert_eq!(name(3, 0.9), Some("JUNGLE"));
        assert_eq!(name(4, 0.7), Some("MOUNTAINS"));
        assert_eq!(name(5, 0.41), Some("GLACIAL_PEAK"));
        assert_eq!(name(6, 0.9), None);
    }

    #[test]
    fn test_classify_thresholds_are_strict() {
        let catalog = BiomeCatalog::new();
        assert_eq!(catalog.classify(1, 0.70).unwrap().name, "TEMPERED_SEA");
        assert!(catalog.classify(2, 0.40).is_none());
    }

    #[test]
    fn test_comparisons() {
        let catalog = BiomeCatalog::new();
        let sea = catalog.by_name("TEMPERED_SEA").unwrap();
        let beach = catalog.by_name("POLAR_BEACH").unwrap();
        let tropical = catalog.by_name("TROPICAL_SEA").unwrap();

        assert!(sea.lower(beach));
        assert!(!beach.lower(sea));
        assert!(!sea.lower(tropical), "Same tier is not lower");
        assert!(sea.colder(tropical));
        assert!(!sea.same(tropical));
        assert!(sea.same(sea));
        assert!(sea.is_aquatic());
        assert!(!beach.is_aquatic());
    }
}
