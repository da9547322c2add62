#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Object Mother
//!
//! Test-data factory built around named prototypes.
//!
//! ## Overview
//!
//! A prototype is a reusable recipe for a fixture ("the user named wilma").
//! Declaring one generates a small family of factory methods:
//!
//! - `wilma` creates the entity, or reloads it by its cached identity
//! - `wilma!` does the same with a raising create
//! - `recreate_wilma` destroys the cached entity and creates a fresh one
//!
//! plus the generic `create_<kind>` / `create_<kind>!` family, which merges the
//! kind's `<kind>_prototype` defaults with call-site attributes and never
//! caches.
//!
//! Persistence is not part of this crate. Applications implement
//! [`EntityStore`] for their entity types and register them in a
//! [`KindRegistry`].
//!
//! ## Module Organization
//!
//! - [`mother`] - The factory dispatcher and shared state
//! - [`registry`] - Prototype definitions and generated-method dispatch table
//! - [`cache`] - Prototype name to entity identity cache
//! - [`kinds`] - Entity kind resolution
//! - [`lifecycle`] - Entity store boundary
//! - [`entity`] - Entities, identities and attribute merging
//! - [`loader`] - YAML prototype files and prototype directory resolution
//! - [`config`] - Configuration loading
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging setup
//! - [`test_helpers`] - In-memory recording store
//!
//! ## Quick Start
//!
//! ```rust
//! use object_mother::{KindRegistry, ObjectMother};
//! use object_mother::test_helpers::RecordingStore;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rocks = Arc::new(RecordingStore::new("Rock"));
//! let kinds = Arc::new(KindRegistry::new().with_kind("rock", Arc::clone(&rocks)));
//! let mother = ObjectMother::new(kinds);
//!
//! mother.dispatch("define_rock", &[json!("boulder"), json!({"size": "huge"})], None)?;
//! mother.dispatch("boulder", &[], None)?;
//! mother.dispatch("create_rock", &[], None)?;
//!
//! assert_eq!(rocks.create_calls().len(), 2);
//! assert_eq!(rocks.create_calls()[0]["size"], Value::from("huge"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod entity;
pub mod error;
pub mod kinds;
pub mod lifecycle;
pub mod loader;
pub mod logging;
pub mod mother;
pub mod registry;
pub mod test_helpers;

pub use cache::IdentityCache;
pub use config::{ConfigLoader, ConfigurationError, ObjectMotherConfig};
pub use entity::{Attributes, Entity, EntityId, EntityRef};
pub use error::{FactoryResult, ObjectMotherError};
pub use kinds::{classify, KindRegistry};
pub use lifecycle::{EntityStore, LifecycleAdapter, LifecycleError, StoreAdapter};
pub use mother::{ObjectMother, SharedState};
pub use registry::{creation_fn, CreationFn, Dispatched, MethodVariant, PrototypeDefinition};
