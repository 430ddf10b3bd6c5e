//! Commit phase: apply staged state, then resolve consequences

use lowlight_creature::EntityId;

use crate::entity::{Consequence, EntityKind, EntityType, Manager, Spawn, Staged, creature, egg, flora, food};
use crate::rng::LifeRng;
use crate::world::World;

impl Manager {
    /// Copy a staged record onto its entity and run same-tick consequences
    ///
    /// Does nothing if the entity was destroyed earlier in the tick.
    pub fn commit(&mut self, id: EntityId, staged: Staged, world: &World, rng: &mut LifeRng, tick: u64) {
        let Staged {
            position,
            kind,
            consequences,
        } = staged;
        let Some(entity) = self.get_mut(id) else {
            return;
        };
        entity.kind = kind;
        self.place(id, position);

        for consequence in consequences {
            self.resolve(id, consequence, rng, tick);
        }

        let Some(entity_type) = self.get(id).map(|e| e.entity_type()) else {
            return;
        };
        match entity_type {
            EntityType::Creature => creature::settle(self, id, rng, tick),
            EntityType::CreatureEgg => egg::settle(self, id, rng, tick),
            EntityType::BerryTree => flora::settle(self, world, id, rng, tick),
            EntityType::Berry | EntityType::Pokeblock => food::settle(self, id),
        }
    }

    fn resolve(&mut self, id: EntityId, consequence: Consequence, rng: &mut LifeRng, tick: u64) {
        let Some(position) = self.get(id).map(|e| e.position()) else {
            return;
        };
        match consequence {
            Consequence::LayEgg { species, genes } => {
                let egg = self.create(position, Spawn::egg(species, genes), rng, tick);
                log::debug!("{} laid {:?} at tick {}", id, egg, tick);
            }
            Consequence::Eat { food: food_id } => {
                let Some(effect) = self.get(food_id).and_then(food::effect) else {
                    return;
                };
                if let Some(EntityKind::Creature(eater)) = self.get_mut(id).map(|e| &mut e.kind) {
                    eater.feed(effect);
                    log::debug!("{} ate {}", id, food_id);
                }
                self.destroy(food_id);
            }
            Consequence::PlantTree { species, genes } => {
                let spawn = Spawn::BerryTree {
                    species,
                    genes,
                    stage: flora::TreeStage::Seed,
                };
                let tree = self.create(position, spawn, rng, tick);
                log::debug!("{} planted {:?} ({})", id, tree, species.name());
            }
        }
    }
}
