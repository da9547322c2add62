//! Shared fixtures for integration tests.

use object_mother::test_helpers::{Record, RecordingStore};
use object_mother::{Attributes, EntityRef, KindRegistry, ObjectMother};
use serde_json::Value;
use std::sync::Arc;

/// A mother with `user` and `rock` kinds backed by recording stores.
pub struct TestWorld {
    pub mother: ObjectMother,
    pub users: Arc<RecordingStore>,
    pub rocks: Arc<RecordingStore>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_stores(RecordingStore::new("User"), RecordingStore::new("Rock"))
    }

    pub fn with_stores(users: RecordingStore, rocks: RecordingStore) -> Self {
        let users = Arc::new(users);
        let rocks = Arc::new(rocks);
        let mother = ObjectMother::new(kind_registry(&users, &rocks));

        Self {
            mother,
            users,
            rocks,
        }
    }
}

pub fn kind_registry(users: &Arc<RecordingStore>, rocks: &Arc<RecordingStore>) -> Arc<KindRegistry> {
    Arc::new(
        KindRegistry::new()
            .with_kind("user", Arc::clone(users))
            .with_kind("rock", Arc::clone(rocks)),
    )
}

/// Attributes from a JSON object literal.
pub fn attrs(value: Value) -> Attributes {
    value
        .as_object()
        .cloned()
        .expect("attribute literal must be a JSON object")
}

pub fn record(entity: &EntityRef) -> &Record {
    entity
        .downcast_ref::<Record>()
        .expect("entity should be a recording store record")
}
