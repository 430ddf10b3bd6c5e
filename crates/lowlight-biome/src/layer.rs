//! Locomotion layers used to split the path graphs

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, SEA_LEVEL};

/// Which kind of terrain a walker may cross
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Every cell
    All,
    /// Cells at or below sea level
    Sea,
    /// Cells strictly above sea level
    Ground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::All, Layer::Sea, Layer::Ground];

    pub fn admits(self, biome: &Biome) -> bool {
        match self {
            Layer::All => true,
            Layer::Sea => biome.elevation <= SEA_LEVEL,
            Layer::Ground => biome.elevation > SEA_LEVEL,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Layer::All => 0,
            Layer::Sea => 1,
            Layer::Ground => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::All => "all",
            Layer::Sea => "sea",
            Layer::Ground => "ground",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BiomeCatalog;

    #[test]
    fn test_layer_admission() {
        let catalog = BiomeCatalog::new();
        for biome in catalog.iter() {
            assert!(Layer::All.admits(biome));
            assert_ne!(
                Layer::Sea.admits(biome),
                Layer::Ground.admits(biome),
                "{} must belong to exactly one of sea/ground",
                biome.name
            );
        }

        let abyssal = catalog.by_name("ABYSSAL_SEA").unwrap();
        let tempered = catalog.by_name("TEMPERED_SEA").unwrap();
        let beach = catalog.by_name("TEMPERED_BEACH").unwrap();
        assert!(Layer::Sea.admits(abyssal));
        assert!(Layer::Sea.admits(tempered));
        assert!(Layer::Ground.admits(beach));
    }

    #[test]
    fn test_layer_serialization() {
        let ron_str = ron::to_string(&Layer::Ground).unwrap();
        let parsed: Layer = ron::from_str(&ron_str).unwrap();
        assert_eq!(parsed, Layer::Ground);
        assert_eq!(Layer::ALL.map(Layer::index), [0, 1, 2]);
    }
}
