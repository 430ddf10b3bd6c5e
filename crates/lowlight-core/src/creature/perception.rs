//! What a creature sees and what it can reach

use glam::Vec2;
use lowlight_biome::Layer;
use lowlight_creature::{EntityId, Sight};

use crate::entity::{Context, CreatureState, Entity, EntityType};

/// An entity in view and its distance
#[derive(Debug, Clone, Copy)]
pub struct Seen<'a> {
    pub entity: &'a Entity,
    pub distance: f32,
}

/// Sight of one creature against the current tick's snapshot
pub struct Perception<'a> {
    ctx: Context<'a>,
    id: EntityId,
    layer: Layer,
    sight: Sight,
}

impl<'a> Perception<'a> {
    pub fn new(entity: &Entity, state: &CreatureState, ctx: Context<'a>) -> Self {
        Self {
            ctx,
            id: entity.id(),
            layer: state.layer(),
            sight: state.sight(entity.position()),
        }
    }

    pub fn sight(&self) -> &Sight {
        &self.sight
    }

    /// Inside the hitbox, or reachable on our layer and inside the sector
    pub fn contains(&self, point: Vec2, hitbox_only: bool) -> bool {
        if self.sight.in_hitbox(point) {
            return true;
        }
        if hitbox_only {
            return false;
        }
        self.ctx.world.connected(self.sight.origin, point, self.layer) && self.sight.in_sector(point)
    }

    /// Entities in sight, nearest first (ties broken by id)
    pub fn visible(&self, filter: Option<&[EntityType]>) -> Vec<Seen<'a>> {
        let reach = self.sight.radius.max(self.sight.hitbox.max_element());
        let mut seen: Vec<Seen<'a>> = self
            .ctx
            .manager
            .nearby(self.id, Some(reach), filter)
            .into_iter()
            .filter(|e| self.contains(e.position(), false))
            .map(|entity| Seen {
                entity,
                distance: entity.position().distance(self.sight.origin),
            })
            .collect();
        seen.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.entity.id().cmp(&b.entity.id()))
        });
        seen
    }

    /// Visible entities close enough to interact with
    pub fn interactible(&self, filter: Option<&[EntityType]>) -> Vec<Seen<'a>> {
        self.visible(filter)
            .into_iter()
            .filter(|s| self.contains(s.entity.position(), true))
            .collect()
    }
}
