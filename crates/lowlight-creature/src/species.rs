//! Species catalogs for creatures and berry trees

use std::f32::consts::TAU;

use lowlight_biome::Layer;
use serde::{Deserialize, Serialize};

use crate::genes::{GeneRecord, SightGenes, StatGenes, TreeGenes, adaptability_table};

/// What a species accepts as food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    Berries,
    Pokeblocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Evoli,
    Magicarpe,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Evoli, Species::Magicarpe];

    pub fn name(self) -> &'static str {
        match self {
            Species::Evoli => "evoli",
            Species::Magicarpe => "magicarpe",
        }
    }

    pub fn layer(self) -> Layer {
        match self {
            Species::Evoli => Layer::Ground,
            Species::Magicarpe => Layer::Sea,
        }
    }

    pub fn diet(self) -> Diet {
        match self {
            Species::Evoli => Diet::Berries,
            Species::Magicarpe => Diet::Pokeblocks,
        }
    }

    pub fn render_key(self) -> &'static str {
        match self {
            Species::Evoli => "133",
            Species::Magicarpe => "129",
        }
    }

    pub fn genes(self) -> GeneRecord {
        match self {
            Species::Evoli => GeneRecord {
                growth_rate: 0.04,
                egg_growth_rate: 0.07,
                hunger_rate: 0.02,
                hunger_hp_loss: -0.06,
                fertility_rate: 0.1,
                longevity: f32::INFINITY,
                max_size: 1.8,
                adaptability: adaptability_table(&[
                    ("TEMPERED_BEACH", 1.0),
                    ("POLAR_BEACH", 0.6),
                    ("TROPICAL_BEACH", 0.8),
                ]),
                sight: SightGenes {
                    radius: 120.0,
                    angle: 0.7 * TAU,
                },
                stats: StatGenes {
                    speed: 0.2,
                    hp_max: 100.0,
                    hp_regen: 0.4,
                },
            },
            Species::Magicarpe => GeneRecord {
                growth_rate: 0.05,
                egg_growth_rate: 0.07,
                hunger_rate: 0.03,
                hunger_hp_loss: -0.08,
                fertility_rate: 0.08,
                longevity: f32::INFINITY,
                max_size: 1.4,
                adaptability: adaptability_table(&[
                    ("ABYSSAL_SEA", 0.6),
                    ("TEMPERED_SEA", 1.0),
                    ("TROPICAL_SEA", 0.8),
                ]),
                sight: SightGenes {
                    radius: 100.0,
                    angle: 0.5 * TAU,
                },
                stats: StatGenes {
                    speed: 0.3,
                    hp_max: 80.0,
                    hp_regen: 0.3,
                },
            },
        }
    }
}

/// What eating a food item does to the eater
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodEffect {
    /// Fraction of the eater's current max health restored
    pub hp_fraction: f32,
    pub hunger: f32,
}

pub const POKEBLOCK_EFFECT: FoodEffect = FoodEffect {
    hp_fraction: 0.0,
    hunger: 15.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSpecies {
    Oran,
    Sitrus,
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 2] = [TreeSpecies::Oran, TreeSpecies::Sitrus];

    pub fn name(self) -> &'static str {
        match self {
            TreeSpecies::Oran => "oran",
            TreeSpecies::Sitrus => "sitrus",
        }
    }

    pub fn genes(self) -> TreeGenes {
        match self {
            TreeSpecies::Oran => TreeGenes {
                longevity: 7000.0,
                fertility: 0.2,
                harvest_min: 3,
                harvest_max: 6,
                adaptability: adaptability_table(&[
                    ("POLAR_BEACH", 0.1),
                    ("TEMPERED_BEACH", 1.0),
                    ("TROPICAL_BEACH", 0.8),
                    ("PLAINS", 0.4),
                    ("FOREST", 0.7),
                    ("JUNGLE", 0.4),
                ]),
            },
            TreeSpecies::Sitrus => TreeGenes {
                longevity: 17000.0,
                fertility: 0.1,
                harvest_min: 2,
                harvest_max: 3,
                adaptability: adaptability_table(&[
                    ("TEMPERED_BEACH", 1.0),
                    ("TROPICAL_BEACH", 0.6),
                    ("PLAINS", 0.2),
                    ("FOREST", 0.8),
                    ("JUNGLE", 0.3),
                ]),
            },
        }
    }

    pub fn berry_effect(self) -> FoodEffect {
        match self {
            TreeSpecies::Oran => FoodEffect {
                hp_fraction: 0.2,
                hunger: 25.0,
            },
            TreeSpecies::Sitrus => FoodEffect {
                hp_fraction: 0.3,
                hunger: 25.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowlight_biome::BiomeCatalog;

    #[test]
    fn test_species_live_on_their_layer() {
        let catalog = BiomeCatalog::new();
        for species in Species::ALL {
            let genes = species.genes();
            for (name, &value) in &genes.adaptability {
                let biome = catalog
                    .by_name(name)
                    .unwrap_or_else(|| panic!("unknown biome {name}"));
                assert!(value > 0.0);
                assert!(
                    species.layer().admits(biome),
                    "{} is adapted to {} but cannot walk there",
                    species.name(),
                    name
                );
            }
        }
    }

    #[test]
    fn test_tree_biomes_exist() {
        let catalog = BiomeCatalog::new();
        for tree in TreeSpecies::ALL {
            let genes = tree.genes();
            assert!(genes.validate().is_ok());
            for name in genes.adaptability.keys() {
                assert!(catalog.by_name(name).is_some(), "unknown biome {name}");
            }
        }
    }

    #[test]
    fn test_diets() {
        assert_eq!(Species::Evoli.diet(), Diet::Berries);
        assert_eq!(Species::Magicarpe.diet(), Diet::Pokeblocks);
        assert_eq!(TreeSpecies::Sitrus.berry_effect().hp_fraction, 0.3);
        assert_eq!(POKEBLOCK_EFFECT.hunger, 15.0);
    }
}
