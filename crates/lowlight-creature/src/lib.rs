//! Creature data for the Lowlight automaton
//!
//! This crate implements the parts of creatures that do not need a world:
//! - Entity handles and clamped meters (EntityId, Health, Hunger)
//! - Gene records and their validation
//! - Species and tree species catalogs
//! - The busy timer driving multi-tick actions
//! - Sight geometry (sector and hitbox)

pub mod action;
pub mod genes;
pub mod sight;
pub mod species;
pub mod types;

pub use action::{ActionKind, ActionTimer, MAX_ACTION};
pub use genes::{GeneError, GeneRecord, SightGenes, StatGenes, TreeGenes};
pub use sight::{HITBOX_RADIUS, Sight};
pub use species::{Diet, FoodEffect, POKEBLOCK_EFFECT, Species, TreeSpecies};
pub use types::{EntityId, Gender, Health, Hunger};
