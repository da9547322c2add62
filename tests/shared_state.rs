//! Mothers sharing a registry and cache, including the process-wide state.
//!
//! Everything touching `SharedState::global()` lives in one test so parallel
//! test threads never observe each other's resets.

mod common;

use common::*;
use object_mother::test_helpers::RecordingStore;
use object_mother::{KindRegistry, ObjectMother, SharedState};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_global_state_round_trip() {
    let kinds = Arc::new(KindRegistry::new().with_kind("user", RecordingStore::new("User")));
    let global = SharedState::global();
    global.reset();

    let declaring = ObjectMother::global(Arc::clone(&kinds));
    declaring
        .declare("wilma", "user", attrs(json!({"name": "wilma"})))
        .unwrap();

    let using = ObjectMother::global(kinds);
    let wilma = using.produce("wilma", None).unwrap().unwrap();

    assert!(declaring.state().same_as(&SharedState::global()));
    assert_eq!(declaring.cached_id("wilma"), wilma.id());

    global.reset();
    assert!(using.prototype_names().is_empty());
    assert!(using.cached_ids().is_empty());

    // A directory loaded into the global state is loaded again after reset
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("users.yaml"),
        "prototypes:\n  - {name: wilma, kind: user}\ndefaults:\n  user: {species: human}\n",
    )
    .unwrap();
    declaring.set_prototype_dir(Some(temp_dir.path())).unwrap();
    assert!(using.responds_to("wilma"));
    assert!(using.responds_to("user_prototype"));

    global.reset();
    assert!(!using.responds_to("wilma"));
    assert!(!using.responds_to("user_prototype"));

    using.set_prototype_dir(Some(temp_dir.path())).unwrap();
    assert!(declaring.responds_to("wilma"));
    assert!(declaring.responds_to("user_prototype"));

    global.reset();
}

#[test]
fn test_instance_state_is_isolated() {
    let world = TestWorld::new();
    let other = TestWorld::new();

    world
        .mother
        .declare("wilma", "user", attrs(json!({"name": "wilma"})))
        .unwrap();

    assert!(other.mother.prototype_names().is_empty());
    assert!(!other.mother.responds_to("wilma"));
    assert!(!world.mother.state().same_as(other.mother.state()));
}

#[test]
fn test_mother_is_usable_across_threads() {
    let users = Arc::new(RecordingStore::new("User"));
    let kinds = Arc::new(KindRegistry::new().with_kind("user", Arc::clone(&users)));
    let mother = Arc::new(ObjectMother::new(kinds));
    mother
        .declare("wilma", "user", attrs(json!({"name": "wilma"})))
        .unwrap();
    mother.produce("wilma", None).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mother = Arc::clone(&mother);
            thread::spawn(move || {
                mother
                    .produce("wilma", None)
                    .unwrap()
                    .and_then(|entity| entity.id())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), mother.cached_id("wilma"));
    }
    assert_eq!(users.create_calls().len(), 1);
}
