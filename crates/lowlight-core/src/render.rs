//! Read-only views for renderers
//!
//! The simulation never calls a renderer on its own. A driver may call
//! [`crate::Life::render`] after any step to push the current state out.

use glam::Vec2;
use lowlight_biome::Biome;
use lowlight_creature::{EntityId, Sight};

use crate::entity::{Entity, EntityKind, EntityType};

/// Snapshot of one entity for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub render_key: &'static str,
    pub position: Vec2,
    pub facing: f32,
    pub size: f32,
    pub action: &'static str,
    pub hp: f32,
    pub hunger: f32,
    pub fertility: f32,
    /// Growth, incubation or freshness, depending on the kind
    pub cycle: f32,
}

/// Sight shape of a creature
pub type SightView = Sight;

pub trait Renderer {
    fn tile(&mut self, cx: i32, cy: i32, biome: &Biome);

    fn entity(&mut self, view: &EntityView);

    fn sight(&mut self, _id: EntityId, _view: &SightView) {}

    /// Called last, once everything of a tick was pushed
    fn frame(&mut self, _tick: u64) {}
}

impl EntityView {
    pub fn of(entity: &Entity) -> Self {
        let mut view = Self {
            id: entity.id(),
            entity_type: entity.entity_type(),
            render_key: "",
            position: entity.position(),
            facing: 0.0,
            size: 1.0,
            action: "idle",
            hp: 1.0,
            hunger: 1.0,
            fertility: 0.0,
            cycle: 0.0,
        };
        match entity.kind() {
            EntityKind::Creature(c) => {
                view.render_key = c.species.render_key();
                view.facing = c.facing;
                view.size = c.size();
                view.action = c.action.name();
                view.hp = c.hp.percentage();
                view.hunger = c.hunger.percentage();
                view.fertility = (c.fertility / crate::entity::creature::FERTILITY_CYCLES).min(1.0);
                view.cycle = (c.cycle / crate::entity::creature::MATURITY_CYCLES).min(1.0);
            }
            EntityKind::Egg(egg) => {
                view.render_key = "P00";
                view.cycle = (egg.cycle / crate::entity::egg::EGG_CYCLES).min(1.0);
            }
            EntityKind::BerryTree(tree) => {
                view.render_key = tree.render_key();
                view.cycle = tree.cycle as f32 / tree.stage.cycles() as f32;
            }
            EntityKind::Berry(berry) => {
                view.render_key = berry.render_key();
                view.cycle = berry.food.freshness();
            }
            EntityKind::Pokeblock(food) => {
                view.render_key = "FX0";
                view.cycle = food.freshness();
            }
        }
        view
    }
}
