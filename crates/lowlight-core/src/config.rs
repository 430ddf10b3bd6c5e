//! Simulation configuration
//!
//! Everything here is plain serde data with defaults, so a partial RON file
//! only needs to name the values it changes.

use std::sync::Arc;

use lowlight_creature::{GeneRecord, Species, TreeGenes, TreeSpecies};
use serde::{Deserialize, Serialize};

use crate::error::LifeError;
use crate::world::WorldGenConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub seed: u64,
    pub world: WorldGenConfig,
    pub population: PopulationConfig,
    pub species: SpeciesOverrides,
}

/// How many entities are placed when a world is populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub oran_trees: u32,
    pub sitrus_trees: u32,
    pub evoli: u32,
    pub magicarpe: u32,
    pub pokeblocks: u32,
    /// Random cells tried per entity before giving up
    pub placement_attempts: u32,
    /// Seed trees at their first fruiting stage instead of as seeds
    pub grown_trees: bool,
}

/// Replacement gene records, one optional entry per species
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesOverrides {
    pub evoli: Option<GeneRecord>,
    pub magicarpe: Option<GeneRecord>,
    pub oran: Option<TreeGenes>,
    pub sitrus: Option<TreeGenes>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldGenConfig::default(),
            population: PopulationConfig::default(),
            species: SpeciesOverrides::default(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            oran_trees: 6,
            sitrus_trees: 4,
            evoli: 8,
            magicarpe: 6,
            pokeblocks: 10,
            placement_attempts: 200,
            grown_trees: true,
        }
    }
}

impl LifeConfig {
    pub fn from_ron(source: &str) -> Result<Self, LifeError> {
        Ok(ron::from_str(source)?)
    }

    pub fn to_ron(&self) -> Result<String, LifeError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

/// Validated genes for every species, shared by reference
#[derive(Debug, Clone)]
pub struct GenePool {
    evoli: Arc<GeneRecord>,
    magicarpe: Arc<GeneRecord>,
    oran: Arc<TreeGenes>,
    sitrus: Arc<TreeGenes>,
}

impl GenePool {
    pub fn new(overrides: &SpeciesOverrides) -> Result<Self, LifeError> {
        let creature = |species: Species, custom: &Option<GeneRecord>| {
            let genes = custom.clone().unwrap_or_else(|| species.genes());
            genes.validate().map_err(|source| LifeError::Genes {
                species: species.name(),
                source,
            })?;
            Ok::<_, LifeError>(Arc::new(genes))
        };
        let tree = |species: TreeSpecies, custom: &Option<TreeGenes>| {
            let genes = custom.clone().unwrap_or_else(|| species.genes());
            genes.validate().map_err(|source| LifeError::Genes {
                species: species.name(),
                source,
            })?;
            Ok::<_, LifeError>(Arc::new(genes))
        };

        Ok(Self {
            evoli: creature(Species::Evoli, &overrides.evoli)?,
            magicarpe: creature(Species::Magicarpe, &overrides.magicarpe)?,
            oran: tree(TreeSpecies::Oran, &overrides.oran)?,
            sitrus: tree(TreeSpecies::Sitrus, &overrides.sitrus)?,
        })
    }

    pub fn creature(&self, species: Species) -> &Arc<GeneRecord> {
        match species {
            Species::Evoli => &self.evoli,
            Species::Magicarpe => &self.magicarpe,
        }
    }

    pub fn tree(&self, species: TreeSpecies) -> &Arc<TreeGenes> {
        match species {
            TreeSpecies::Oran => &self.oran,
            TreeSpecies::Sitrus => &self.sitrus,
        }
    }
}

impl Default for GenePool {
    fn default() -> Self {
        Self {
            evoli: Arc::new(Species::Evoli.genes()),
            magicarpe: Arc::new(Species::Magicarpe.genes()),
            oran: Arc::new(TreeSpecies::Oran.genes()),
            sitrus: Arc::new(TreeSpecies::Sitrus.genes()),
        }
    }
}
