//! Berry trees

use std::sync::Arc;

use glam::Vec2;
use lowlight_creature::{EntityId, TreeGenes, TreeSpecies};
use serde::{Deserialize, Serialize};

use crate::entity::{Context, Entity, EntityKind, Manager, Spawn, Staged};
use crate::rng::LifeRng;
use crate::world::World;

/// Radius checked for crowding before a berry plants a tree
pub const AREA_RADIUS: f32 = 32.0;
/// Trees allowed within [`AREA_RADIUS`] before planting stops
pub const MAX_POPULATION: usize = 3;
pub const BERRIES_FALL_MIN_RADIUS: f32 = 16.0;
pub const BERRIES_FALL_MAX_RADIUS: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreeStage {
    Seed,
    Sprout,
    Taller,
    Bloom,
    Berry,
}

impl TreeStage {
    pub const ALL: [TreeStage; 5] = [
        TreeStage::Seed,
        TreeStage::Sprout,
        TreeStage::Taller,
        TreeStage::Bloom,
        TreeStage::Berry,
    ];

    /// First stage of the fruiting loop
    pub const ADULT: TreeStage = TreeStage::Taller;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TreeStage::Seed => "SEED",
            TreeStage::Sprout => "SPROUT",
            TreeStage::Taller => "TALLER",
            TreeStage::Bloom => "BLOOM",
            TreeStage::Berry => "BERRY",
        }
    }

    /// Adapted cycles needed to leave this stage
    pub fn cycles(self) -> u32 {
        match self {
            TreeStage::Seed => 100,
            TreeStage::Sprout => 200,
            TreeStage::Taller => 200,
            TreeStage::Bloom => 200,
            TreeStage::Berry => 300,
        }
    }

    /// Following stage, `None` past the last one
    pub fn next(self) -> Option<TreeStage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Stage a tree returns to after a harvest
    pub fn after_harvest() -> TreeStage {
        let adult = Self::ADULT.index();
        let loop_len = Self::ALL.len() - adult;
        Self::ALL[(Self::ALL.len() - adult) % loop_len + adult]
    }
}

#[derive(Debug, Clone)]
pub struct TreeState {
    pub species: TreeSpecies,
    pub genes: Arc<TreeGenes>,
    pub stage: TreeStage,
    pub cycle: u32,
    pub sudden_death: bool,
}

impl TreeState {
    pub fn new(species: TreeSpecies, genes: Arc<TreeGenes>, stage: TreeStage) -> Self {
        Self {
            species,
            genes,
            stage,
            cycle: 0,
            sudden_death: false,
        }
    }

    pub fn grow_to(&mut self, stage: TreeStage) {
        self.stage = stage;
        self.cycle = 0;
    }

    pub fn render_key(&self) -> &'static str {
        const ORAN: [&str; 3] = ["T02", "T03", "T04"];
        const SITRUS: [&str; 3] = ["T05", "T06", "T07"];
        match self.stage {
            TreeStage::Seed => "T00",
            TreeStage::Sprout => "T01",
            stage => {
                let i = stage.index() - TreeStage::ADULT.index();
                match self.species {
                    TreeSpecies::Oran => ORAN[i],
                    TreeSpecies::Sitrus => SITRUS[i],
                }
            }
        }
    }
}

pub(crate) fn prepare(entity: &Entity, state: &TreeState, ctx: &Context, rng: &mut LifeRng) -> Staged {
    let mut next = state.clone();
    next.cycle = state.cycle + 1;
    next.sudden_death = rng.reaper(entity.age(ctx.tick), state.genes.longevity);
    Staged::new(entity.position(), EntityKind::BerryTree(next))
}

/// Grow, harvest and die
pub(crate) fn settle(manager: &mut Manager, world: &World, id: EntityId, rng: &mut LifeRng, tick: u64) {
    let Some(entity) = manager.get(id) else {
        return;
    };
    let Some(state) = entity.tree() else {
        return;
    };
    let position = entity.position();
    let adaptability = world
        .at(position)
        .map_or(0.0, |b| state.genes.adaptability(b.name));

    let mut harvest = None;
    if state.cycle as f32 * adaptability > state.stage.cycles() as f32 {
        let (species, genes) = (state.species, state.genes.clone());
        let stage = match state.stage.next() {
            Some(stage) => stage,
            None => {
                harvest = Some((species, genes));
                TreeStage::after_harvest()
            }
        };
        if let Some(tree) = manager.get_mut(id).and_then(Entity::tree_mut) {
            tree.grow_to(stage);
        }
    }

    if let Some((species, genes)) = harvest {
        let count = rng.random_int(i64::from(genes.harvest_min), i64::from(genes.harvest_max) + 1);
        let mut dropped = 0;
        for _ in 0..count {
            let radius = rng.random(BERRIES_FALL_MIN_RADIUS, BERRIES_FALL_MAX_RADIUS);
            let angle = rng.angle();
            let spot = position + Vec2::from_angle(angle) * radius;
            let berry = Spawn::Berry {
                species,
                genes: genes.clone(),
            };
            if manager.create(spot, berry, rng, tick).is_some() {
                dropped += 1;
            }
        }
        log::debug!("{} ({}) harvested {}/{} berries", id, species.name(), dropped, count);
    }

    if manager.get(id).and_then(Entity::tree).is_some_and(|t| t.sudden_death) {
        log::debug!("{} withered at tick {}", id, tick);
        manager.destroy(id);
    }
}
