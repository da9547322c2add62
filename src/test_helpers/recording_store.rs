//! Recording entity store
//!
//! An [`EntityStore`] that keeps records in memory and records every
//! lifecycle call made against it, with switches for simulating backend
//! rejection, identity-less entities and failing destroys.

use crate::entity::{Attributes, Entity, EntityId};
use crate::lifecycle::{EntityStore, LifecycleError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;

/// A lifecycle call observed by a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleCall {
    Create(Attributes),
    CreateOrRaise(Attributes),
    FindById(EntityId),
    Destroy(EntityId),
}

/// Entity produced by a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Option<EntityId>,
    pub kind: String,
    pub attributes: Attributes,
}

impl Record {
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }
}

impl Entity for Record {
    fn id(&self) -> Option<EntityId> {
        self.id.clone()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// Track every lifecycle call in order
    calls: Vec<LifecycleCall>,
    /// Persisted records keyed by numeric id
    records: BTreeMap<i64, Record>,
    next_id: i64,
    reject_creates: bool,
}

/// In-memory store for one entity kind
#[derive(Debug)]
pub struct RecordingStore {
    kind: String,
    assign_ids: bool,
    fail_destroy: bool,
    unique_field: Option<String>,
    state: Mutex<StoreState>,
}

impl RecordingStore {
    /// Create an empty store whose records report `kind`. Ids start at 1.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            assign_ids: true,
            fail_destroy: false,
            unique_field: None,
            state: Mutex::new(StoreState {
                next_id: 1,
                ..StoreState::default()
            }),
        }
    }

    /// Reject every create, as a backend with failing validations would
    pub fn rejecting(self) -> Self {
        self.state.lock().reject_creates = true;
        self
    }

    /// Produce entities without identity; nothing is persisted
    pub fn without_ids(mut self) -> Self {
        self.assign_ids = false;
        self
    }

    /// Fail every destroy with a backend error
    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    /// Reject creates that repeat an existing record's value for `field`
    pub fn unique_on(mut self, field: impl Into<String>) -> Self {
        self.unique_field = Some(field.into());
        self
    }

    pub fn set_reject_creates(&self, reject: bool) {
        self.state.lock().reject_creates = reject;
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Every call observed so far, in order
    pub fn calls(&self) -> Vec<LifecycleCall> {
        self.state.lock().calls.clone()
    }

    /// Attributes passed to either create variant, in order
    pub fn create_calls(&self) -> Vec<Attributes> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                LifecycleCall::Create(attributes) | LifecycleCall::CreateOrRaise(attributes) => {
                    Some(attributes.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn find_calls(&self) -> Vec<EntityId> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                LifecycleCall::FindById(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn destroy_calls(&self) -> Vec<EntityId> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                LifecycleCall::Destroy(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Delete a record behind the factory's back, leaving any cached
    /// identity for it stale.
    pub fn remove_record(&self, id: &EntityId) -> bool {
        let Some(key) = id.as_i64() else {
            return false;
        };
        self.state.lock().records.remove(&key).is_some()
    }

    /// Persisted records ordered by id
    pub fn records(&self) -> Vec<Record> {
        self.state.lock().records.values().cloned().collect()
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().records.len()
    }

    fn insert(&self, attributes: &Attributes) -> Result<Record, LifecycleError> {
        let mut state = self.state.lock();

        if state.reject_creates {
            return Err(LifecycleError::RecordInvalid(format!(
                "{} rejected by backend",
                self.kind
            )));
        }

        if let Some(field) = &self.unique_field {
            if let Some(value) = attributes.get(field) {
                let taken = state
                    .records
                    .values()
                    .any(|record| record.attributes.get(field) == Some(value));
                if taken {
                    return Err(LifecycleError::RecordInvalid(format!(
                        "{field} has already been taken"
                    )));
                }
            }
        }

        if !self.assign_ids {
            return Ok(Record {
                id: None,
                kind: self.kind.clone(),
                attributes: attributes.clone(),
            });
        }

        let key = state.next_id;
        state.next_id += 1;

        let record = Record {
            id: Some(EntityId::from(key)),
            kind: self.kind.clone(),
            attributes: attributes.clone(),
        };
        state.records.insert(key, record.clone());
        Ok(record)
    }
}

impl EntityStore for RecordingStore {
    type Entity = Record;

    fn create(&self, attributes: &Attributes) -> Option<Record> {
        self.state
            .lock()
            .calls
            .push(LifecycleCall::Create(attributes.clone()));
        self.insert(attributes).ok()
    }

    fn create_or_raise(&self, attributes: &Attributes) -> Result<Record, LifecycleError> {
        self.state
            .lock()
            .calls
            .push(LifecycleCall::CreateOrRaise(attributes.clone()));
        self.insert(attributes)
    }

    fn find_by_id(&self, id: &EntityId) -> Option<Record> {
        let mut state = self.state.lock();
        state.calls.push(LifecycleCall::FindById(id.clone()));
        id.as_i64().and_then(|key| state.records.get(&key).cloned())
    }

    fn destroy(&self, id: &EntityId) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        state.calls.push(LifecycleCall::Destroy(id.clone()));

        if self.fail_destroy {
            return Err(LifecycleError::Backend(format!(
                "{} refused to destroy {id}",
                self.kind
            )));
        }

        id.as_i64()
            .and_then(|key| state.records.remove(&key))
            .map(|_| ())
            .ok_or_else(|| LifecycleError::RecordNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = RecordingStore::new("User");

        let first = store.create(&attrs(json!({"name": "wilma"}))).unwrap();
        let second = store.create(&attrs(json!({"name": "fred"}))).unwrap();

        assert_eq!(first.id, Some(EntityId::from(1_i64)));
        assert_eq!(second.id, Some(EntityId::from(2_i64)));
        assert_eq!(first.kind, "User");
        assert_eq!(first.get("name"), Some(&json!("wilma")));
        assert_eq!(store.record_count(), 2);
    }

    #[test]
    fn test_rejecting_store() {
        let store = RecordingStore::new("User").rejecting();

        assert!(store.create(&Attributes::new()).is_none());
        assert!(store.create_or_raise(&Attributes::new()).is_err());
        assert_eq!(store.create_calls().len(), 2);
        assert_eq!(store.record_count(), 0);

        store.set_reject_creates(false);
        assert!(store.create(&Attributes::new()).is_some());
    }

    #[test]
    fn test_unique_constraint() {
        let store = RecordingStore::new("User").unique_on("name");
        store.create(&attrs(json!({"name": "wilma"}))).unwrap();

        let err = store
            .create_or_raise(&attrs(json!({"name": "wilma"})))
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::RecordInvalid("name has already been taken".to_string())
        );
    }

    #[test]
    fn test_without_ids_persists_nothing() {
        let store = RecordingStore::new("Rock").without_ids();

        let record = store.create(&Attributes::new()).unwrap();
        assert!(record.id.is_none());
        assert_eq!(store.record_count(), 0);
    }

    #[test]
    fn test_find_and_destroy_are_recorded() {
        let store = RecordingStore::new("User");
        let id = store.create(&Attributes::new()).unwrap().id.unwrap();

        assert!(store.find_by_id(&id).is_some());
        store.destroy(&id).unwrap();
        assert!(store.find_by_id(&id).is_none());
        assert_eq!(
            store.destroy(&id),
            Err(LifecycleError::RecordNotFound(id.clone()))
        );

        assert_eq!(store.find_calls(), vec![id.clone(), id.clone()]);
        assert_eq!(store.destroy_calls(), vec![id.clone(), id]);
    }

    #[test]
    fn test_failing_destroy_keeps_record() {
        let store = RecordingStore::new("User").failing_destroy();
        let id = store.create(&Attributes::new()).unwrap().id.unwrap();

        assert!(matches!(store.destroy(&id), Err(LifecycleError::Backend(_))));
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn test_remove_record_and_clear_calls() {
        let store = RecordingStore::new("User");
        let id = store.create(&Attributes::new()).unwrap().id.unwrap();

        assert!(store.remove_record(&id));
        assert!(!store.remove_record(&id));
        assert!(!store.remove_record(&EntityId::from("not-numeric")));

        store.clear_calls();
        assert!(store.calls().is_empty());
    }
}
