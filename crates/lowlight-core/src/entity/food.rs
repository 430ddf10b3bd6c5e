//! Food items - berries and pokeblocks

use std::sync::Arc;

use lowlight_creature::{EntityId, FoodEffect, POKEBLOCK_EFFECT, TreeGenes, TreeSpecies};

use crate::entity::flora::{AREA_RADIUS, MAX_POPULATION};
use crate::entity::{Consequence, Context, Entity, EntityKind, EntityType, Manager, Staged};
use crate::rng::LifeRng;

/// Base shelf life of a food item in ticks
pub const MAX_CYCLES: f32 = 1000.0;

/// Expiry countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodState {
    pub cycle: f32,
    pub max_cycle: f32,
}

impl FoodState {
    /// Fresh item with a shelf life of `0.75..1.25` times [`MAX_CYCLES`]
    pub fn fresh(rng: &mut LifeRng) -> Self {
        let max_cycle = rng.random(0.75, 1.25) * MAX_CYCLES;
        Self {
            cycle: max_cycle,
            max_cycle,
        }
    }

    pub fn expired(&self) -> bool {
        self.cycle <= 0.0
    }

    pub fn freshness(&self) -> f32 {
        if self.max_cycle <= 0.0 {
            0.0
        } else {
            (self.cycle / self.max_cycle).clamp(0.0, 1.0)
        }
    }

    fn tick(&self) -> Self {
        Self {
            cycle: self.cycle - 1.0,
            ..*self
        }
    }
}

#[derive(Debug, Clone)]
pub struct BerryState {
    pub species: TreeSpecies,
    /// Genes of the tree this berry may grow into
    pub genes: Arc<TreeGenes>,
    pub food: FoodState,
}

impl BerryState {
    pub fn render_key(&self) -> &'static str {
        match self.species {
            TreeSpecies::Oran => "F01",
            TreeSpecies::Sitrus => "F02",
        }
    }
}

/// What eating this entity does, `None` if it is not food
pub fn effect(entity: &Entity) -> Option<FoodEffect> {
    match entity.kind() {
        EntityKind::Berry(berry) => Some(berry.species.berry_effect()),
        EntityKind::Pokeblock(_) => Some(POKEBLOCK_EFFECT),
        _ => None,
    }
}

pub(crate) fn prepare_berry(entity: &Entity, state: &BerryState, ctx: &Context, rng: &mut LifeRng) -> Staged {
    let mut next = state.clone();
    next.food = state.food.tick();

    let mut staged = Staged::new(entity.position(), EntityKind::Berry(next));
    if staged_expired(&staged) {
        let crowd = ctx
            .manager
            .nearby(entity.id(), Some(AREA_RADIUS), Some(&[EntityType::BerryTree]))
            .len();
        if crowd < MAX_POPULATION && rng.chance(state.genes.fertility) {
            staged.consequences.push(Consequence::PlantTree {
                species: state.species,
                genes: state.genes.clone(),
            });
        }
    }
    staged
}

fn staged_expired(staged: &Staged) -> bool {
    match &staged.kind {
        EntityKind::Berry(berry) => berry.food.expired(),
        EntityKind::Pokeblock(food) => food.expired(),
        _ => false,
    }
}

pub(crate) fn prepare_pokeblock(entity: &Entity, state: &FoodState) -> Staged {
    Staged::new(entity.position(), EntityKind::Pokeblock(state.tick()))
}

/// Remove the item once its countdown ran out
pub(crate) fn settle(manager: &mut Manager, id: EntityId) {
    if manager.get(id).and_then(Entity::food).is_some_and(FoodState::expired) {
        log::debug!("{} expired", id);
        manager.destroy(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_shelf_life() {
        let mut rng = LifeRng::new(3);
        for _ in 0..100 {
            let food = FoodState::fresh(&mut rng);
            assert!((750.0..1250.0).contains(&food.max_cycle));
            assert_eq!(food.cycle, food.max_cycle);
            assert_eq!(food.freshness(), 1.0);
        }
    }

    #[test]
    fn test_countdown() {
        let food = FoodState {
            cycle: 1.0,
            max_cycle: 4.0,
        };
        assert!(!food.expired());
        let next = food.tick();
        assert!(next.expired());
        assert_eq!(next.freshness(), 0.0);
        assert_eq!(next.max_cycle, 4.0);
    }
}
