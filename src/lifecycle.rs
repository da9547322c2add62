//! # Entity Lifecycle Adapter
//!
//! The boundary between the factory and whatever persists entities.
//!
//! ## Architecture
//!
//! ```text
//! EntityStore (typed, owned by the application)
//!     │
//!     ▼
//! StoreAdapter<S> ──► LifecycleAdapter (object-safe, EntityRef in/out)
//!                          │
//!                          ▼
//!                     KindRegistry ──► ObjectMother
//! ```
//!
//! Applications implement [`EntityStore`] for each entity type they want to
//! build fixtures for. The factory only ever talks to the object-safe
//! [`LifecycleAdapter`], so stores with different entity types can live in the
//! same [`KindRegistry`](crate::kinds::KindRegistry).

use crate::entity::{Attributes, Entity, EntityId, EntityRef};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by an entity store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    #[error("Validation failed: {0}")]
    RecordInvalid(String),

    #[error("Record not found: {0}")]
    RecordNotFound(EntityId),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Typed persistence operations for one entity type.
///
/// `create` is the quiet variant: backend rejection yields `None`.
/// `create_or_raise` reports the rejection instead.
pub trait EntityStore: Send + Sync + 'static {
    type Entity: Entity;

    fn create(&self, attributes: &Attributes) -> Option<Self::Entity>;

    fn create_or_raise(&self, attributes: &Attributes) -> Result<Self::Entity, LifecycleError>;

    fn find_by_id(&self, id: &EntityId) -> Option<Self::Entity>;

    fn destroy(&self, id: &EntityId) -> Result<(), LifecycleError>;
}

impl<S: EntityStore> EntityStore for Arc<S> {
    type Entity = S::Entity;

    fn create(&self, attributes: &Attributes) -> Option<Self::Entity> {
        (**self).create(attributes)
    }

    fn create_or_raise(&self, attributes: &Attributes) -> Result<Self::Entity, LifecycleError> {
        (**self).create_or_raise(attributes)
    }

    fn find_by_id(&self, id: &EntityId) -> Option<Self::Entity> {
        (**self).find_by_id(id)
    }

    fn destroy(&self, id: &EntityId) -> Result<(), LifecycleError> {
        (**self).destroy(id)
    }
}

/// Object-safe lifecycle operations over type-erased entities.
pub trait LifecycleAdapter: Send + Sync {
    fn create(&self, attributes: &Attributes) -> Option<EntityRef>;

    fn create_or_raise(&self, attributes: &Attributes) -> Result<EntityRef, LifecycleError>;

    fn find_by_id(&self, id: &EntityId) -> Option<EntityRef>;

    fn destroy(&self, id: &EntityId) -> Result<(), LifecycleError>;
}

/// Pass-through from a typed [`EntityStore`] to [`LifecycleAdapter`].
pub struct StoreAdapter<S> {
    store: S,
}

impl<S: EntityStore> StoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> fmt::Debug for StoreAdapter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreAdapter")
            .field("store", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S: EntityStore> LifecycleAdapter for StoreAdapter<S> {
    fn create(&self, attributes: &Attributes) -> Option<EntityRef> {
        self.store
            .create(attributes)
            .map(|entity| Arc::new(entity) as EntityRef)
    }

    fn create_or_raise(&self, attributes: &Attributes) -> Result<EntityRef, LifecycleError> {
        self.store
            .create_or_raise(attributes)
            .map(|entity| Arc::new(entity) as EntityRef)
    }

    fn find_by_id(&self, id: &EntityId) -> Option<EntityRef> {
        self.store
            .find_by_id(id)
            .map(|entity| Arc::new(entity) as EntityRef)
    }

    fn destroy(&self, id: &EntityId) -> Result<(), LifecycleError> {
        self.store.destroy(id)
    }
}
