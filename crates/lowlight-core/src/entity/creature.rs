//! Creature state, metabolism and death

use std::sync::Arc;

use glam::Vec2;
use lowlight_biome::{Biome, Layer};
use lowlight_creature::{
    ActionKind, ActionTimer, Diet, EntityId, FoodEffect, GeneRecord, Gender, Health, Hunger,
    Sight, Species,
};

use crate::entity::{Entity, EntityKind, Manager, Spawn};
use crate::rng::LifeRng;

pub const MAX_HUNGER: f32 = 100.0;
pub const FERTILITY_CYCLES: f32 = 100.0;
/// Growth cycle at which a creature reaches full size and becomes adult
pub const MATURITY_CYCLES: f32 = 100.0;
/// Size of a freshly hatched creature
pub const BIRTH_SIZE: f32 = 0.5;
/// Busy ticks spent mating or eating
pub const ACTION_TICKS: u32 = 100;
/// Idle ticks before a creature starts wandering
pub const WANDER_AFTER: u32 = 50;
/// Movement never drops below this share of the base speed
pub const MIN_SPEED_FACTOR: f32 = 0.25;

/// Something a creature walks towards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Jittered waypoint along a path
    Marker(Vec2),
    Entity(EntityId),
}

#[derive(Debug, Clone)]
pub struct CreatureState {
    pub species: Species,
    pub genes: Arc<GeneRecord>,
    pub gender: Gender,
    pub hp: Health,
    pub hunger: Hunger,
    /// Growth clock
    pub cycle: f32,
    pub fertility: f32,
    /// Heading in radians
    pub facing: f32,
    pub action: ActionKind,
    pub timer: ActionTimer,
    /// Consecutive ticks without any action
    pub idle: u32,
    pub targets: Vec<Target>,
    pub sudden_death: bool,
}

impl CreatureState {
    pub fn new(species: Species, genes: Arc<GeneRecord>, gender: Gender, cycle: f32, facing: f32) -> Self {
        let mut state = Self {
            species,
            gender,
            hp: Health::new(0.0),
            hunger: Hunger::new(MAX_HUNGER),
            cycle,
            fertility: 0.0,
            facing,
            action: ActionKind::Idle,
            timer: ActionTimer::default(),
            idle: 0,
            targets: Vec::new(),
            sudden_death: false,
            genes,
        };
        let max = state.hp_max();
        state.hp = Health::new(max);
        state
    }

    pub fn layer(&self) -> Layer {
        self.species.layer()
    }

    pub fn size(&self) -> f32 {
        size_at(&self.genes, self.cycle)
    }

    pub fn hp_max(&self) -> f32 {
        self.genes.stats.hp_max * self.size() / self.genes.max_size
    }

    pub fn adult(&self) -> bool {
        self.cycle >= MATURITY_CYCLES
    }

    pub fn fertile(&self) -> bool {
        self.fertility >= FERTILITY_CYCLES
    }

    pub fn adaptability(&self, biome: Option<&Biome>) -> f32 {
        biome.map_or(0.0, |b| self.genes.adaptability(b.name))
    }

    /// Pixels per tick in a biome
    pub fn speed(&self, biome: Option<&Biome>) -> f32 {
        self.genes.stats.speed * self.adaptability(biome).max(MIN_SPEED_FACTOR)
    }

    pub fn sight(&self, origin: Vec2) -> Sight {
        Sight::new(
            origin,
            self.facing,
            self.genes.sight.radius,
            self.genes.sight.angle,
            self.size(),
        )
    }

    /// Same species, opposite gender, and ready to mate
    pub fn compatible(&self, other: &Entity) -> bool {
        other.is_alive()
            && other.creature().is_some_and(|o| {
                o.species == self.species && o.gender == self.gender.opposite() && o.fertile()
            })
    }

    pub fn edible(&self, other: &Entity) -> bool {
        other.is_alive()
            && match (self.species.diet(), other.kind()) {
                (Diet::Berries, EntityKind::Berry(_)) => true,
                (Diet::Pokeblocks, EntityKind::Pokeblock(_)) => true,
                _ => false,
            }
    }

    /// Final entity target, if the target list ends on one
    pub fn target_entity(&self) -> Option<EntityId> {
        match self.targets.last() {
            Some(Target::Entity(id)) => Some(*id),
            _ => None,
        }
    }

    /// Apply this tick's hunger, health, growth, fertility and reaper draw
    ///
    /// Reads only `self` and writes only `next`, so every rate applies to
    /// the values the rest of the world currently sees.
    pub fn metabolism(&self, next: &mut CreatureState, age: u64, rng: &mut LifeRng) {
        let fed = self.hunger.current > 0.0;
        next.hunger.set(self.hunger.current - self.genes.hunger_rate);
        if fed {
            next.cycle = self.cycle + self.genes.growth_rate;
        }
        next.hp.set_max(next.hp_max());
        let delta = if fed {
            self.genes.stats.hp_regen
        } else {
            self.genes.hunger_hp_loss
        };
        next.hp.set(self.hp.current + delta);
        if self.adult() {
            next.fertility = self.fertility + self.genes.fertility_rate;
        }
        next.sudden_death = rng.reaper(age, self.genes.longevity);
    }

    pub fn feed(&mut self, effect: FoodEffect) {
        let heal = effect.hp_fraction * self.hp.max;
        self.hp.heal(heal);
        self.hunger.eat(effect.hunger);
    }

    pub fn is_dying(&self) -> bool {
        self.cause_of_death().is_some()
    }

    /// Why the creature dies this tick, if it does
    pub fn cause_of_death(&self) -> Option<&'static str> {
        if self.sudden_death {
            Some("old age")
        } else if self.hp.is_dead() {
            Some("exhaustion")
        } else {
            None
        }
    }

    /// Pokeblocks left behind on death
    pub fn drops(&self) -> u32 {
        (2.0 * self.size()).round().max(1.0) as u32
    }
}

pub fn size_at(genes: &GeneRecord, cycle: f32) -> f32 {
    let growth = (cycle / MATURITY_CYCLES).clamp(0.0, 1.0);
    BIRTH_SIZE + (genes.max_size - BIRTH_SIZE) * growth
}

/// Kill the creature if its health ran out or the reaper came
pub(crate) fn settle(manager: &mut Manager, id: EntityId, rng: &mut LifeRng, tick: u64) {
    let Some(entity) = manager.get(id) else {
        return;
    };
    let Some(state) = entity.creature() else {
        return;
    };
    let Some(cause) = state.cause_of_death() else {
        return;
    };

    let position = entity.position();
    let drops = state.drops();
    log::debug!(
        "{} ({}) died of {} at tick {}, dropping {} pokeblocks",
        id,
        state.species.name(),
        cause,
        tick,
        drops
    );

    for _ in 0..drops {
        let angle = rng.angle();
        let radius = rng.random(4.0, 16.0);
        let spot = manager.clamp(position + Vec2::from_angle(angle) * radius);
        manager.create(spot, Spawn::Pokeblock, rng, tick);
    }
    manager.destroy(id);
}
