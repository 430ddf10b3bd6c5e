//! Entities - a flat record with a kind, and the registry that owns them
//!
//! Every entity advances in two phases. `prepare` reads the current state of
//! the world and returns a [`Staged`] record without touching anything;
//! `commit` copies the record onto the entity and then resolves consequences
//! that may create or destroy other entities.

pub mod creature;
pub mod egg;
pub mod flora;
pub mod food;
mod lifecycle;
pub mod manager;
pub mod spatial;

use std::sync::Arc;

use bitflags::bitflags;
use glam::Vec2;
use lowlight_creature::{EntityId, GeneRecord, Gender, Species, TreeGenes, TreeSpecies};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GenePool;
use crate::rng::LifeRng;
use crate::world::World;

pub use creature::{CreatureState, Target};
pub use egg::EggState;
pub use flora::{TreeStage, TreeState};
pub use food::{BerryState, FoodState};
pub use manager::Manager;
pub use spatial::SpatialIndex;

/// Type tag of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Creature,
    CreatureEgg,
    BerryTree,
    Berry,
    Pokeblock,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Creature,
        EntityType::CreatureEgg,
        EntityType::BerryTree,
        EntityType::Berry,
        EntityType::Pokeblock,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EntityType::Creature => "creature",
            EntityType::CreatureEgg => "creature_egg",
            EntityType::BerryTree => "berry_tree",
            EntityType::Berry => "berry",
            EntityType::Pokeblock => "pokeblock",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            EntityType::Creature => {
                Capabilities::PERCEIVING | Capabilities::REPRODUCING | Capabilities::GROWING
            }
            EntityType::CreatureEgg => Capabilities::GROWING,
            EntityType::BerryTree => Capabilities::GROWING | Capabilities::REPRODUCING,
            EntityType::Berry => {
                Capabilities::EDIBLE | Capabilities::EXPIRING | Capabilities::REPRODUCING
            }
            EntityType::Pokeblock => Capabilities::EDIBLE | Capabilities::EXPIRING,
        }
    }
}

bitflags! {
    /// Behaviors an entity kind takes part in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const EDIBLE = 1 << 0;
        const PERCEIVING = 1 << 1;
        const REPRODUCING = 1 << 2;
        const GROWING = 1 << 3;
        const EXPIRING = 1 << 4;
    }
}

/// Kind-specific state
#[derive(Debug, Clone)]
pub enum EntityKind {
    Creature(CreatureState),
    Egg(EggState),
    BerryTree(TreeState),
    Berry(BerryState),
    Pokeblock(FoodState),
}

impl EntityKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Creature(_) => EntityType::Creature,
            EntityKind::Egg(_) => EntityType::CreatureEgg,
            EntityKind::BerryTree(_) => EntityType::BerryTree,
            EntityKind::Berry(_) => EntityType::Berry,
            EntityKind::Pokeblock(_) => EntityType::Pokeblock,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    alive: bool,
    position: Vec2,
    created: u64,
    kind: EntityKind,
}

impl Entity {
    pub(crate) fn new(id: EntityId, position: Vec2, created: u64, kind: EntityKind) -> Self {
        Self {
            id,
            alive: true,
            position,
            created,
            kind,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Tick the entity was created on
    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn age(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.created)
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.entity_type().capabilities()
    }

    pub fn creature(&self) -> Option<&CreatureState> {
        match &self.kind {
            EntityKind::Creature(state) => Some(state),
            _ => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut CreatureState> {
        match &mut self.kind {
            EntityKind::Creature(state) => Some(state),
            _ => None,
        }
    }

    pub fn egg(&self) -> Option<&EggState> {
        match &self.kind {
            EntityKind::Egg(state) => Some(state),
            _ => None,
        }
    }

    pub fn tree(&self) -> Option<&TreeState> {
        match &self.kind {
            EntityKind::BerryTree(state) => Some(state),
            _ => None,
        }
    }

    pub fn tree_mut(&mut self) -> Option<&mut TreeState> {
        match &mut self.kind {
            EntityKind::BerryTree(state) => Some(state),
            _ => None,
        }
    }

    /// Countdown state of food items
    pub fn food(&self) -> Option<&FoodState> {
        match &self.kind {
            EntityKind::Berry(berry) => Some(&berry.food),
            EntityKind::Pokeblock(food) => Some(food),
            _ => None,
        }
    }

    /// Compute the next state without mutating anything
    pub fn prepare(&self, ctx: &Context, rng: &mut LifeRng) -> Staged {
        match &self.kind {
            EntityKind::Creature(state) => crate::creature::prepare(self, state, ctx, rng),
            EntityKind::Egg(state) => egg::prepare(self, state),
            EntityKind::BerryTree(state) => flora::prepare(self, state, ctx, rng),
            EntityKind::Berry(state) => food::prepare_berry(self, state, ctx, rng),
            EntityKind::Pokeblock(state) => food::prepare_pokeblock(self, state),
        }
    }
}

/// Read-only view of the simulation handed to `prepare`
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub world: &'a World,
    pub manager: &'a Manager,
    pub tick: u64,
}

/// Side effects resolved during commit, after the staged state is applied
#[derive(Debug, Clone, PartialEq)]
pub enum Consequence {
    LayEgg {
        species: Species,
        genes: Arc<GeneRecord>,
    },
    Eat {
        food: EntityId,
    },
    PlantTree {
        species: TreeSpecies,
        genes: Arc<TreeGenes>,
    },
}

/// Proposed next state of one entity
#[derive(Debug, Clone)]
pub struct Staged {
    pub position: Vec2,
    pub kind: EntityKind,
    pub consequences: SmallVec<[Consequence; 2]>,
}

impl Staged {
    pub fn new(position: Vec2, kind: EntityKind) -> Self {
        Self {
            position,
            kind,
            consequences: SmallVec::new(),
        }
    }
}

/// Creation options for [`Manager::create`]
#[derive(Debug, Clone)]
pub enum Spawn {
    Creature {
        species: Species,
        genes: Arc<GeneRecord>,
        gender: Option<Gender>,
        cycle: f32,
        fertility: f32,
    },
    Egg {
        species: Species,
        genes: Arc<GeneRecord>,
    },
    BerryTree {
        species: TreeSpecies,
        genes: Arc<TreeGenes>,
        stage: TreeStage,
    },
    Berry {
        species: TreeSpecies,
        genes: Arc<TreeGenes>,
    },
    Pokeblock,
}

impl Spawn {
    pub fn creature(pool: &GenePool, species: Species) -> Self {
        Spawn::Creature {
            species,
            genes: pool.creature(species).clone(),
            gender: None,
            cycle: 0.0,
            fertility: 0.0,
        }
    }

    pub fn egg(species: Species, genes: Arc<GeneRecord>) -> Self {
        Spawn::Egg { species, genes }
    }

    pub fn tree(pool: &GenePool, species: TreeSpecies) -> Self {
        Spawn::BerryTree {
            species,
            genes: pool.tree(species).clone(),
            stage: TreeStage::Seed,
        }
    }

    pub fn berry(pool: &GenePool, species: TreeSpecies) -> Self {
        Spawn::Berry {
            species,
            genes: pool.tree(species).clone(),
        }
    }

    pub fn with_gender(mut self, value: Gender) -> Self {
        if let Spawn::Creature { gender, .. } = &mut self {
            *gender = Some(value);
        }
        self
    }

    pub fn with_cycle(mut self, value: f32) -> Self {
        if let Spawn::Creature { cycle, .. } = &mut self {
            *cycle = value.max(0.0);
        }
        self
    }

    pub fn with_fertility(mut self, value: f32) -> Self {
        if let Spawn::Creature { fertility, .. } = &mut self {
            *fertility = value.max(0.0);
        }
        self
    }

    /// Start a tree at a later stage
    pub fn grown(mut self, value: TreeStage) -> Self {
        if let Spawn::BerryTree { stage, .. } = &mut self {
            *stage = value;
        }
        self
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Spawn::Creature { .. } => EntityType::Creature,
            Spawn::Egg { .. } => EntityType::CreatureEgg,
            Spawn::BerryTree { .. } => EntityType::BerryTree,
            Spawn::Berry { .. } => EntityType::Berry,
            Spawn::Pokeblock => EntityType::Pokeblock,
        }
    }
}
