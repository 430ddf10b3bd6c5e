//! Lowlight engine
//!
//! A seeded tile world populated by creatures, eggs, berry trees and food:
//! - World generation with elevation continuity and isolation repair
//! - One path graph per locomotion layer, with jump point search
//! - An entity registry backed by an R-tree
//! - A two-phase tick where every entity prepares against the same snapshot

pub mod config;
pub mod creature;
pub mod entity;
pub mod error;
pub mod life;
pub mod render;
pub mod rng;
pub mod world;

pub use config::{GenePool, LifeConfig, PopulationConfig, SpeciesOverrides};
pub use entity::{
    Capabilities, Consequence, Context, CreatureState, Entity, EntityKind, EntityType, Manager,
    Spawn, Staged, Target, TreeStage,
};
pub use error::LifeError;
pub use life::Life;
pub use render::{EntityView, Renderer, SightView};
pub use rng::LifeRng;
pub use world::{Cell, GenerationReport, World, WorldGenConfig};

// Re-export the data crates so users only need this one
pub use lowlight_biome as biome;
pub use lowlight_creature as creatures;
