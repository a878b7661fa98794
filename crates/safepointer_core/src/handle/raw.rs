//! Unguarded raw handle.
//!
//! Captures the entity's address and nothing else. Reading through it after
//! the entity is destroyed is undefined behavior: it may crash, read freed
//! memory, or appear to work. Only compiled with the `hazard-demo` feature.

use crate::model::entity::{Entity, EntityId};
use crate::store::entity_store::EntityStore;
use std::cell::RefCell;

/// Plain captured pointer with no liveness tracking.
#[derive(Debug, Clone, Copy)]
pub struct RawHandle {
    id: EntityId,
    ptr: *const RefCell<Entity>,
}

impl RawHandle {
    /// Captures the address of the entity `id` currently owned by `store`.
    pub fn capture(store: &EntityStore, id: EntityId) -> Option<Self> {
        store.cell_ptr(id).map(|ptr| Self { id, ptr })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Mirrors the `if (ptr)` check such code usually relies on. It only
    /// catches null, never a freed target.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Reads the entity name through the captured address.
    ///
    /// # Safety
    /// The entity must still be alive. Nothing here checks that.
    pub unsafe fn name(&self) -> String {
        // SAFETY: upheld by the caller.
        unsafe { (*self.ptr).borrow().name().to_string() }
    }
}
