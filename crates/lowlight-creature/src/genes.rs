//! Gene records for creatures and trees
//!
//! Genes are plain data: they are copied into every creature at creation and
//! into eggs when laid. Nothing mutates them afterwards.

use ahash::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed gene record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneError {
    #[error("gene `{0}` is not a number")]
    NotANumber(&'static str),
    #[error("gene `{name}` must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("gene `{name}` must be strictly positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("hunger_hp_loss must not be positive (got {0})")]
    PositiveHpLoss(f32),
    #[error("sight angle must lie in (0, 2π] (got {0})")]
    SightAngle(f32),
    #[error("adaptability for `{biome}` must not be negative (got {value})")]
    Adaptability { biome: String, value: f32 },
    #[error("harvest range {min}..={max} is empty")]
    HarvestRange { min: u32, max: u32 },
}

fn finite_or_inf(name: &'static str, value: f32) -> Result<f32, GeneError> {
    if value.is_nan() {
        Err(GeneError::NotANumber(name))
    } else {
        Ok(value)
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), GeneError> {
    if finite_or_inf(name, value)? < 0.0 {
        return Err(GeneError::Negative { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f32) -> Result<(), GeneError> {
    if finite_or_inf(name, value)? <= 0.0 {
        return Err(GeneError::NotPositive { name, value });
    }
    Ok(())
}

fn check_adaptability(adaptability: &HashMap<String, f32>) -> Result<(), GeneError> {
    for (biome, &value) in adaptability {
        if value.is_nan() || value < 0.0 {
            return Err(GeneError::Adaptability {
                biome: biome.clone(),
                value,
            });
        }
    }
    Ok(())
}

/// Sight cone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightGenes {
    /// Radius in pixels
    pub radius: f32,
    /// Full opening angle in radians
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGenes {
    /// Pixels per tick in a perfectly adapted biome
    pub speed: f32,
    pub hp_max: f32,
    pub hp_regen: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub growth_rate: f32,
    pub egg_growth_rate: f32,
    pub hunger_rate: f32,
    /// Health change per tick while starving, never positive
    pub hunger_hp_loss: f32,
    pub fertility_rate: f32,
    /// Expected lifetime in ticks; infinite means immortal
    pub longevity: f32,
    pub max_size: f32,
    /// Coefficient per biome name; missing biomes count as zero
    pub adaptability: HashMap<String, f32>,
    pub sight: SightGenes,
    pub stats: StatGenes,
}

impl GeneRecord {
    pub fn adaptability(&self, biome: &str) -> f32 {
        self.adaptability.get(biome).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), GeneError> {
        self.check()
            .inspect_err(|e| log::warn!("Rejected gene record: {}", e))
    }

    fn check(&self) -> Result<(), GeneError> {
        non_negative("growth_rate", self.growth_rate)?;
        non_negative("egg_growth_rate", self.egg_growth_rate)?;
        non_negative("hunger_rate", self.hunger_rate)?;
        non_negative("fertility_rate", self.fertility_rate)?;
        positive("longevity", self.longevity)?;
        positive("max_size", self.max_size)?;
        positive("sight.radius", self.sight.radius)?;
        non_negative("stats.speed", self.stats.speed)?;
        positive("stats.hp_max", self.stats.hp_max)?;
        non_negative("stats.hp_regen", self.stats.hp_regen)?;

        if finite_or_inf("hunger_hp_loss", self.hunger_hp_loss)? > 0.0 {
            return Err(GeneError::PositiveHpLoss(self.hunger_hp_loss));
        }
        let angle = self.sight.angle;
        if angle.is_nan() || angle <= 0.0 || angle > std::f32::consts::TAU {
            return Err(GeneError::SightAngle(angle));
        }
        check_adaptability(&self.adaptability)
    }
}

/// Berry-producing tree genes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeGenes {
    pub longevity: f32,
    /// Chance that an expiring berry plants a new tree
    pub fertility: f32,
    pub harvest_min: u32,
    pub harvest_max: u32,
    pub adaptability: HashMap<String, f32>,
}

impl TreeGenes {
    pub fn adaptability(&self, biome: &str) -> f32 {
        self.adaptability.get(biome).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), GeneError> {
        self.check()
            .inspect_err(|e| log::warn!("Rejected tree genes: {}", e))
    }

    fn check(&self) -> Result<(), GeneError> {
        positive("longevity", self.longevity)?;
        non_negative("fertility", self.fertility)?;
        if self.harvest_min > self.harvest_max {
            return Err(GeneError::HarvestRange {
                min: self.harvest_min,
                max: self.harvest_max,
            });
        }
        check_adaptability(&self.adaptability)
    }
}

/// Build an adaptability table from `(biome, coefficient)` pairs
pub fn adaptability_table(entries: &[(&str, f32)]) -> HashMap<String, f32> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Species;

    #[test]
    fn test_default_genes_are_valid() {
        for species in Species::ALL {
            assert_eq!(species.genes().validate(), Ok(()), "{:?}", species);
        }
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut genes = Species::Evoli.genes();
        genes.hunger_hp_loss = 0.5;
        assert_eq!(genes.validate(), Err(GeneError::PositiveHpLoss(0.5)));

        let mut genes = Species::Evoli.genes();
        genes.growth_rate = f32::NAN;
        assert_eq!(genes.validate(), Err(GeneError::NotANumber("growth_rate")));

        let mut genes = Species::Evoli.genes();
        genes.sight.angle = 7.0;
        assert!(matches!(genes.validate(), Err(GeneError::SightAngle(_))));

        let mut genes = Species::Evoli.genes();
        genes.stats.hp_max = 0.0;
        assert!(matches!(
            genes.validate(),
            Err(GeneError::NotPositive {
                name: "stats.hp_max",
                ..
            })
        ));

        let mut genes = Species::Evoli.genes();
        genes.adaptability.insert("PLAINS".into(), -1.0);
        assert!(matches!(
            genes.validate(),
            Err(GeneError::Adaptability { .. })
        ));
    }

    #[test]
    fn test_infinite_longevity_is_valid() {
        let genes = Species::Evoli.genes();
        assert!(genes.longevity.is_infinite());
        assert!(genes.validate().is_ok());
    }

    #[test]
    fn test_missing_adaptability_is_zero() {
        let genes = Species::Evoli.genes();
        assert_eq!(genes.adaptability("TEMPERED_BEACH"), 1.0);
        assert_eq!(genes.adaptability("VOLCANIC_PEAK"), 0.0);
    }

    #[test]
    fn test_tree_genes_serialization() {
        let genes = crate::TreeSpecies::Sitrus.genes();
        let ron_str = ron::to_string(&genes).unwrap();
        let parsed: TreeGenes = ron::from_str(&ron_str).unwrap();
        assert_eq!(parsed, genes);

        let mut broken = genes;
        broken.harvest_min = 9;
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_tree_validation_rejects_bad_values() {
        let mut genes = crate::TreeSpecies::Oran.genes();
        genes.harvest_min = 9;
        assert_eq!(
            genes.validate(),
            Err(GeneError::HarvestRange { min: 9, max: 6 })
        );

        let mut genes = crate::TreeSpecies::Oran.genes();
        genes.longevity = 0.0;
        assert!(matches!(
            genes.validate(),
            Err(GeneError::NotPositive {
                name: "longevity",
                ..
            })
        ));
    }
}
