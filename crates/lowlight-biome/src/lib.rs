//! Terrain data for the Lowlight automaton
//!
//! This crate provides the foundational terrain types shared by the world
//! generator, the path graphs and the creatures:
//! - Biome records and the immutable catalog (Biome, BiomeId, BiomeCatalog)
//! - Elevation constants (SEA_LEVEL, MAX_ELEVATION)
//! - Locomotion layers (Layer)

mod biome;
mod layer;

pub use biome::{Biome, BiomeCatalog, BiomeId, MAX_ELEVATION, SEA_LEVEL};
pub use layer::Layer;
