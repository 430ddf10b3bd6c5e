//! World management - biome grid, generation, path graphs

pub mod generation;
pub mod grid;
pub mod isolation;
pub mod path;
#[allow(clippy::module_inception)]
mod world;
pub mod worldgen_config;

pub use generation::{GenerationReport, WorldGenerator, histogram};
pub use grid::{Cell, Grid, RING};
pub use isolation::{Neighborhood, isolated_cells};
pub use path::{LayerGraph, octile};
pub use world::World;
pub use worldgen_config::{NoiseLayerConfig, NoiseTypeConfig, WorldGenConfig};
