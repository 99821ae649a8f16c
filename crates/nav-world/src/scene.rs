//! Scene lookups: where entities are, and what blocks sight lines.

use std::collections::HashMap;

use nav_core::{Aabb, EntityId, Point3};

use crate::{WorldError, WorldResult};

/// Read-only view of the scene used by the controller each tick.
pub trait SceneQuery {
    /// Position of a live entity; `None` once it has been removed.
    fn position(&self, entity: EntityId) -> Option<Point3>;

    /// `true` if nothing blocks the segment `from → to`.
    fn line_of_sight(&self, _from: &Point3, _to: &Point3) -> bool {
        true
    }
}

/// Entity positions plus box occluders.
#[derive(Clone, Debug, Default)]
pub struct SceneMap {
    entities:  HashMap<EntityId, Point3>,
    occluders: Vec<Aabb>,
}

impl SceneMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: EntityId, position: Point3) -> WorldResult<()> {
        if self.entities.contains_key(&entity) {
            return Err(WorldError::DuplicateEntity(entity));
        }
        self.entities.insert(entity, position);
        Ok(())
    }

    pub fn set_position(&mut self, entity: EntityId, position: Point3) -> WorldResult<()> {
        let slot = self.entities.get_mut(&entity).ok_or(WorldError::UnknownEntity(entity))?;
        *slot = position;
        Ok(())
    }

    pub fn remove(&mut self, entity: EntityId) -> WorldResult<Point3> {
        self.entities.remove(&entity).ok_or(WorldError::UnknownEntity(entity))
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn add_occluder(&mut self, occluder: Aabb) {
        self.occluders.push(occluder);
    }

    pub fn occluders(&self) -> &[Aabb] {
        &self.occluders
    }

    /// `true` if `point` lies inside any occluder.
    pub fn is_blocked(&self, point: &Point3) -> bool {
        self.occluders.iter().any(|o| o.contains(point))
    }
}

impl SceneQuery for SceneMap {
    fn position(&self, entity: EntityId) -> Option<Point3> {
        self.entities.get(&entity).copied()
    }

    fn line_of_sight(&self, from: &Point3, to: &Point3) -> bool {
        !self.occluders.iter().any(|o| o.intersects_segment(from, to))
    }
}
