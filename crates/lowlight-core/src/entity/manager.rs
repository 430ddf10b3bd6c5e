//! Entity registry - the only place entities are created and destroyed

use std::collections::BTreeMap;

use glam::Vec2;
use lowlight_creature::{EntityId, Gender};

use crate::entity::creature::CreatureState;
use crate::entity::egg::EggState;
use crate::entity::flora::TreeState;
use crate::entity::food::{BerryState, FoodState};
use crate::entity::spatial::SpatialIndex;
use crate::entity::{Entity, EntityKind, EntityType, Spawn};
use crate::rng::LifeRng;

/// Owns every live entity plus the spatial index over them
///
/// Ids grow monotonically, so iterating the registry visits entities in
/// creation order.
#[derive(Debug, Clone)]
pub struct Manager {
    entities: BTreeMap<EntityId, Entity>,
    next_id: EntityId,
    index: SpatialIndex,
    size: Vec2,
}

impl Manager {
    /// Empty registry for a world of `size` pixels
    pub fn new(size: Vec2) -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: EntityId::from_raw(1),
            index: SpatialIndex::default(),
            size,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn outside(&self, position: Vec2) -> bool {
        !(position.x >= 0.0
            && position.y >= 0.0
            && position.x < self.size.x
            && position.y < self.size.y)
    }

    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, (self.size - Vec2::ONE).max(Vec2::ZERO))
    }

    /// Build and register an entity; `None` if `position` is outside the world
    pub fn create(
        &mut self,
        position: Vec2,
        spawn: Spawn,
        rng: &mut LifeRng,
        tick: u64,
    ) -> Option<EntityId> {
        if self.outside(position) {
            log::debug!(
                "Refused to create {} outside the world at {}",
                spawn.entity_type().tag(),
                position
            );
            return None;
        }

        let kind = match spawn {
            Spawn::Creature {
                species,
                genes,
                gender,
                cycle,
                fertility,
            } => {
                let gender = gender.unwrap_or_else(|| {
                    if rng.chance(0.5) {
                        Gender::Female
                    } else {
                        Gender::Male
                    }
                });
                let facing = rng.angle();
                let mut state = CreatureState::new(species, genes, gender, cycle, facing);
                state.fertility = fertility;
                EntityKind::Creature(state)
            }
            Spawn::Egg { species, genes } => EntityKind::Egg(EggState {
                species,
                genes,
                cycle: 0.0,
            }),
            Spawn::BerryTree {
                species,
                genes,
                stage,
            } => EntityKind::BerryTree(TreeState::new(species, genes, stage)),
            Spawn::Berry { species, genes } => EntityKind::Berry(BerryState {
                species,
                genes,
                food: FoodState::fresh(rng),
            }),
            Spawn::Pokeblock => EntityKind::Pokeblock(FoodState::fresh(rng)),
        };

        let id = self.next_id;
        self.next_id = id.next();
        let entity = Entity::new(id, position, tick, kind);
        log::debug!("Created {} {} at {}", entity.entity_type().tag(), id, position);
        self.index.insert(id, position);
        self.entities.insert(id, entity);
        Some(id)
    }

    /// Deregister an entity; destroying twice is a no-op
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.entities.remove(&id) {
            Some(mut entity) => {
                entity.alive = false;
                self.index.remove(id);
                log::debug!("Destroyed {} {}", entity.entity_type().tag(), id);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).filter(|e| e.alive)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).filter(|e| e.alive)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live ids in creation order
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.alive)
    }

    pub fn count(&self, entity_type: EntityType) -> usize {
        self.iter().filter(|e| e.entity_type() == entity_type).count()
    }

    /// Live entities within `radius` of `origin`, the origin excluded
    ///
    /// Positions are those of the last index rebuild. Results are sorted by id.
    pub fn nearby(
        &self,
        origin: EntityId,
        radius: Option<f32>,
        filter: Option<&[EntityType]>,
    ) -> Vec<&Entity> {
        let Some(center) = self.index.position(origin) else {
            return Vec::new();
        };
        self.nearby_point(center, radius, filter)
            .into_iter()
            .filter(|e| e.id != origin)
            .collect()
    }

    pub fn nearby_point(
        &self,
        center: Vec2,
        radius: Option<f32>,
        filter: Option<&[EntityType]>,
    ) -> Vec<&Entity> {
        self.index
            .query(center, radius)
            .into_iter()
            .filter_map(|id| self.get(id))
            .filter(|e| filter.is_none_or(|types| types.contains(&e.entity_type())))
            .collect()
    }

    /// Indexed position, which lags live positions until the next rebuild
    pub fn indexed_position(&self, id: EntityId) -> Option<Vec2> {
        self.index.position(id)
    }

    /// Re-index every live entity at its current position
    pub fn rebuild_index(&mut self) {
        self.index
            .rebuild(self.entities.values().filter(|e| e.alive).map(|e| (e.id, e.position)));
    }

    /// Move an entity, clamped into the world
    pub(crate) fn place(&mut self, id: EntityId, position: Vec2) {
        let position = self.clamp(position);
        if let Some(entity) = self.get_mut(id) {
            entity.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenePool;
    use lowlight_creature::Species;

    fn manager() -> (Manager, LifeRng) {
        (Manager::new(Vec2::new(160.0, 160.0)), LifeRng::new(9))
    }

    #[test]
    fn test_create_refuses_outside() {
        let (mut manager, mut rng) = manager();
        assert!(manager.create(Vec2::new(-1.0, 5.0), Spawn::Pokeblock, &mut rng, 0).is_none());
        assert!(manager.create(Vec2::new(160.0, 5.0), Spawn::Pokeblock, &mut rng, 0).is_none());
        assert!(manager.is_empty());

        let id = manager.create(Vec2::new(159.5, 0.0), Spawn::Pokeblock, &mut rng, 3);
        let entity = id.and_then(|id| manager.get(id)).unwrap();
        assert_eq!(entity.created(), 3);
        assert_eq!(entity.entity_type(), EntityType::Pokeblock);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let (mut manager, mut rng) = manager();
        let a = manager.create(Vec2::ONE, Spawn::Pokeblock, &mut rng, 0).unwrap();
        manager.destroy(a);
        let b = manager.create(Vec2::ONE, Spawn::Pokeblock, &mut rng, 0).unwrap();
        assert!(b > a, "Ids are never reused");
        assert_eq!(manager.ids(), vec![b]);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut manager, mut rng) = manager();
        let id = manager.create(Vec2::ONE, Spawn::Pokeblock, &mut rng, 0).unwrap();
        assert!(manager.destroy(id));
        assert!(!manager.destroy(id));
        assert!(manager.get(id).is_none());
        assert!(manager.nearby_point(Vec2::ONE, None, None).is_empty());
    }

    #[test]
    fn test_nearby_excludes_origin_and_filters() {
        let (mut manager, mut rng) = manager();
        let pool = GenePool::default();
        let me = manager
            .create(Vec2::new(50.0, 50.0), Spawn::creature(&pool, Species::Evoli), &mut rng, 0)
            .unwrap();
        let close = manager.create(Vec2::new(55.0, 50.0), Spawn::Pokeblock, &mut rng, 0).unwrap();
        let far = manager.create(Vec2::new(90.0, 50.0), Spawn::Pokeblock, &mut rng, 0).unwrap();
        let other = manager
            .create(Vec2::new(52.0, 52.0), Spawn::creature(&pool, Species::Evoli), &mut rng, 0)
            .unwrap();

        let ids = |list: Vec<&Entity>| list.iter().map(|e| e.id()).collect::<Vec<_>>();
        assert_eq!(ids(manager.nearby(me, Some(10.0), None)), vec![close, other]);
        assert_eq!(ids(manager.nearby(me, None, None)), vec![close, far, other]);
        assert_eq!(
            ids(manager.nearby(me, Some(10.0), Some(&[EntityType::Creature]))),
            vec![other]
        );

        manager.destroy(close);
        assert_eq!(ids(manager.nearby(me, Some(10.0), None)), vec![other]);
        assert_eq!(manager.count(EntityType::Pokeblock), 1);
    }

    #[test]
    fn test_index_lags_until_rebuild() {
        let (mut manager, mut rng) = manager();
        let id = manager.create(Vec2::new(10.0, 10.0), Spawn::Pokeblock, &mut rng, 0).unwrap();
        manager.place(id, Vec2::new(500.0, -3.0));
        assert_eq!(manager.get(id).unwrap().position(), Vec2::new(159.0, 0.0), "Placement is clamped");
        assert_eq!(manager.indexed_position(id), Some(Vec2::new(10.0, 10.0)));
        manager.rebuild_index();
        assert_eq!(manager.indexed_position(id), Some(Vec2::new(159.0, 0.0)));
    }
}
