//! Entity domain model.
//!
//! # Responsibility
//! - Hold the mutable display name observed by UI callbacks.
//! - Register every live instance with the leak detector.
//!
//! # Invariants
//! - `id` is stable and never reused for another entity.
//! - An `Entity` is not `Clone`; dropping it is the one and only destruction.

use crate::leak::LeakGuard;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every entity.
pub type EntityId = Uuid;

/// Leak detector label for [`Entity`].
pub const ENTITY_LEAK_LABEL: &str = "Entity";

/// Named object with a lifetime owned outside of any observer.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    _leak: LeakGuard,
}

/// Read-only view of a live entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
}

impl Entity {
    /// Creates a new entity with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a new entity with a caller-provided stable ID.
    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            _leak: LeakGuard::new(ENTITY_LEAK_LABEL),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        debug!(
            "event=entity_destroyed module=model status=ok entity_id={}",
            self.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, ENTITY_LEAK_LABEL};
    use crate::leak::live_count;

    #[test]
    fn rename_replaces_display_name() {
        let mut entity = Entity::new("first");
        entity.set_name("second");
        assert_eq!(entity.name(), "second");
        assert_eq!(entity.snapshot().name, "second");
    }

    #[test]
    fn live_count_follows_entity_lifetime() {
        let before = live_count(ENTITY_LEAK_LABEL);
        let entity = Entity::new("counted");
        assert_eq!(live_count(ENTITY_LEAK_LABEL), before + 1);
        drop(entity);
        assert_eq!(live_count(ENTITY_LEAK_LABEL), before);
    }
}
