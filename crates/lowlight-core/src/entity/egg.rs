//! Creature eggs

use std::sync::Arc;

use lowlight_creature::{EntityId, GeneRecord, Species};

use crate::entity::{Entity, EntityKind, Manager, Spawn, Staged};
use crate::rng::LifeRng;

/// Incubation cycles before hatching
pub const EGG_CYCLES: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct EggState {
    pub species: Species,
    /// Passed unchanged to the hatchling
    pub genes: Arc<GeneRecord>,
    pub cycle: f32,
}

impl EggState {
    pub fn ready(&self) -> bool {
        self.cycle >= EGG_CYCLES
    }
}

pub(crate) fn prepare(entity: &Entity, state: &EggState) -> Staged {
    let mut next = state.clone();
    next.cycle = state.cycle + state.genes.egg_growth_rate;
    Staged::new(entity.position(), EntityKind::Egg(next))
}

pub(crate) fn settle(manager: &mut Manager, id: EntityId, rng: &mut LifeRng, tick: u64) {
    let Some(entity) = manager.get(id) else {
        return;
    };
    let Some(state) = entity.egg() else {
        return;
    };
    if !state.ready() {
        return;
    }

    let position = entity.position();
    let spawn = Spawn::Creature {
        species: state.species,
        genes: state.genes.clone(),
        gender: None,
        cycle: 0.0,
        fertility: 0.0,
    };
    let hatchling = manager.create(position, spawn, rng, tick);
    log::debug!("{} hatched into {:?} at tick {}", id, hatchling, tick);
    manager.destroy(id);
}
