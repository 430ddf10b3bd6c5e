//! R-tree over entity positions

use ahash::HashMap;
use glam::Vec2;
use lowlight_creature::EntityId;
use rstar::{AABB, RTree, RTreeObject};

/// Position-only record so the tree never holds whole entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityLocation {
    pub id: EntityId,
    pub position: [f32; 2],
}

impl RTreeObject for EntityLocation {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<EntityLocation>,
    positions: HashMap<EntityId, [f32; 2]>,
}

impl SpatialIndex {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn insert(&mut self, id: EntityId, position: Vec2) {
        self.remove(id);
        let position = position.to_array();
        self.positions.insert(id, position);
        self.tree.insert(EntityLocation { id, position });
    }

    /// Returns false if the id was not indexed
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.positions.remove(&id) {
            Some(position) => self.tree.remove(&EntityLocation { id, position }).is_some(),
            None => false,
        }
    }

    /// Replace the whole index in one bulk load
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = (EntityId, Vec2)>) {
        let locations: Vec<EntityLocation> = entries
            .into_iter()
            .map(|(id, position)| EntityLocation {
                id,
                position: position.to_array(),
            })
            .collect();
        self.positions = locations.iter().map(|l| (l.id, l.position)).collect();
        self.tree = RTree::bulk_load(locations);
    }

    /// Indexed position, as of the last insert or rebuild
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.positions.get(&id).map(|p| Vec2::from_array(*p))
    }

    /// Ids strictly closer than `radius` to `center`, sorted by id
    ///
    /// Without a radius every indexed id is returned.
    pub fn query(&self, center: Vec2, radius: Option<f32>) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = match radius {
            None => self.positions.keys().copied().collect(),
            Some(radius) => {
                let envelope = AABB::from_corners(
                    (center - radius).to_array(),
                    (center + radius).to_array(),
                );
                let r_sq = radius * radius;
                self.tree
                    .locate_in_envelope_intersecting(&envelope)
                    .filter(|l| Vec2::from_array(l.position).distance_squared(center) < r_sq)
                    .map(|l| l.id)
                    .collect()
            }
        };
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> EntityId {
        EntityId::from_raw(n)
    }

    #[test]
    fn test_query_radius_is_strict() {
        let mut index = SpatialIndex::default();
        index.insert(id(1), Vec2::new(0.0, 0.0));
        index.insert(id(2), Vec2::new(10.0, 0.0));
        index.insert(id(3), Vec2::new(3.0, 4.0));

        assert_eq!(index.query(Vec2::ZERO, Some(5.0)), vec![id(1)], "Distance 5 is excluded");
        assert_eq!(index.query(Vec2::ZERO, Some(5.01)), vec![id(1), id(3)]);
        assert_eq!(index.query(Vec2::ZERO, None), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_insert_moves_and_remove() {
        let mut index = SpatialIndex::default();
        index.insert(id(1), Vec2::new(0.0, 0.0));
        index.insert(id(1), Vec2::new(50.0, 50.0));
        assert_eq!(index.len(), 1);
        assert!(index.query(Vec2::ZERO, Some(1.0)).is_empty());
        assert_eq!(index.position(id(1)), Some(Vec2::new(50.0, 50.0)));

        assert!(index.remove(id(1)));
        assert!(!index.remove(id(1)), "Second removal is a no-op");
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = SpatialIndex::default();
        index.insert(id(9), Vec2::ZERO);
        index.rebuild([(id(1), Vec2::new(1.0, 1.0)), (id(2), Vec2::new(2.0, 2.0))]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.query(Vec2::ZERO, Some(2.0)), vec![id(1)]);
        assert!(index.position(id(9)).is_none());
    }
}
