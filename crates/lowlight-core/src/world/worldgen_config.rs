//! World generation configuration - serializable parameters for world generation
//!
//! The seed is NOT part of the config: same config + different seed = different world.

use lowlight_biome::BiomeCatalog;
use serde::{Deserialize, Serialize};

use crate::error::LifeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Cell edge in pixels
    pub cell_size: f32,
    /// Highest elevation level generated (inclusive)
    pub max_elevation: i32,
    /// Cap on isolation repair passes per level
    pub repair_passes: u32,
    /// Noise layer sampled for the climate fraction
    pub climate_noise: NoiseLayerConfig,
    /// Octave multipliers; each octave is weighted by its inverse
    pub octave_weights: Vec<f32>,
    /// Jitter applied to path subtargets, as a fraction of half a cell
    pub path_noise: f32,
}

/// Reusable noise layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Offset added to world seed for this layer
    pub seed_offset: i32,
    /// Noise algorithm type
    pub noise_type: NoiseTypeConfig,
    /// Base frequency; climate coordinates are already normalized so 1.0 is neutral
    pub frequency: f32,
}

/// Noise algorithm types (maps to FastNoiseLite::NoiseType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseTypeConfig {
    OpenSimplex2,
    OpenSimplex2S,
    Perlin,
    ValueCubic,
    Value,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            cell_size: 16.0,
            max_elevation: lowlight_biome::MAX_ELEVATION,
            repair_passes: 10,
            climate_noise: NoiseLayerConfig::default(),
            octave_weights: vec![1.0, 2.0, 4.0, 8.0],
            path_noise: 1.0,
        }
    }
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            seed_offset: 0,
            noise_type: NoiseTypeConfig::OpenSimplex2,
            frequency: 1.0,
        }
    }
}

impl WorldGenConfig {
    /// World extent in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }

    pub fn validate(&self, catalog: &BiomeCatalog) -> Result<(), LifeError> {
        if self.width == 0 || self.height == 0 {
            return Err(LifeError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(LifeError::CellSize(self.cell_size));
        }
        if self.octave_weights.is_empty() || self.octave_weights.iter().any(|w| !(*w > 0.0)) {
            return Err(LifeError::OctaveWeights);
        }
        if self.max_elevation > catalog.max_elevation() {
            return Err(LifeError::Elevation {
                requested: self.max_elevation,
                available: catalog.max_elevation(),
            });
        }
        Ok(())
    }
}

impl NoiseTypeConfig {
    /// Convert to fastnoise_lite::NoiseType
    pub fn to_fastnoise(&self) -> fastnoise_lite::NoiseType {
        match self {
            NoiseTypeConfig::OpenSimplex2 => fastnoise_lite::NoiseType::OpenSimplex2,
            NoiseTypeConfig::OpenSimplex2S => fastnoise_lite::NoiseType::OpenSimplex2S,
            NoiseTypeConfig::Perlin => fastnoise_lite::NoiseType::Perlin,
            NoiseTypeConfig::ValueCubic => fastnoise_lite::NoiseType::ValueCubic,
            NoiseTypeConfig::Value => fastnoise_lite::NoiseType::Value,
        }
    }
}

impl NoiseLayerConfig {
    /// Create a FastNoiseLite instance from this config
    ///
    /// Both halves of the 64-bit seed are folded into the 32-bit noise seed.
    pub fn to_fastnoise(&self, base_seed: u64) -> fastnoise_lite::FastNoiseLite {
        let mut noise = fastnoise_lite::FastNoiseLite::with_seed(
            Self::fold_seed(base_seed).wrapping_add(self.seed_offset),
        );
        noise.set_noise_type(Some(self.noise_type.to_fastnoise()));
        noise.set_frequency(Some(self.frequency));
        noise
    }

    fn fold_seed(seed: u64) -> i32 {
        (seed ^ (seed >> 32)) as i32
    }
}
