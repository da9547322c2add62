//! # Entity Kind Registry
//!
//! Explicit mapping from entity kind identifiers to lifecycle adapters.
//!
//! Prototypes name their target type with a lowercase, underscored identifier
//! (`"user"`, `"blog_post"`). The identifier is canonicalised with
//! [`classify`] and looked up in the registry the embedding application
//! populated up front. Unknown kinds are a typed error rather than a runtime
//! lookup failure.
//!
//! ## Usage
//!
//! ```rust
//! use object_mother::kinds::{classify, KindRegistry};
//! use object_mother::test_helpers::RecordingStore;
//!
//! let kinds = KindRegistry::new();
//! kinds.register("blog_post", RecordingStore::new("BlogPost"));
//!
//! assert_eq!(classify("blog_post"), "BlogPost");
//! assert!(kinds.resolve("blog_post").is_ok());
//! assert!(kinds.resolve("BlogPost").is_ok());
//! assert!(kinds.resolve("comment").is_err());
//! ```

use crate::error::{FactoryResult, ObjectMotherError};
use crate::lifecycle::{EntityStore, LifecycleAdapter, StoreAdapter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Canonical type name for an entity kind identifier.
///
/// Splits on `_`, upper-cases the first character of each segment and
/// concatenates. Empty segments are dropped.
pub fn classify(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Registry of creatable entity kinds keyed by canonical type name.
pub struct KindRegistry {
    kinds: RwLock<HashMap<String, Arc<dyn LifecycleAdapter>>>,
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kind_names())
            .finish()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KindRegistry {
    pub fn new() -> Self {
        Self {
            kinds: RwLock::new(HashMap::new()),
        }
    }

    /// Register a typed store under `identifier` (any casing that classifies
    /// to the intended type name). Replaces an existing registration.
    pub fn register<S: EntityStore>(&self, identifier: &str, store: S) {
        self.register_adapter(identifier, Arc::new(StoreAdapter::new(store)));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_kind<S: EntityStore>(self, identifier: &str, store: S) -> Self {
        self.register(identifier, store);
        self
    }

    pub fn register_adapter(&self, identifier: &str, adapter: Arc<dyn LifecycleAdapter>) {
        let canonical = classify(identifier);
        debug!(kind = %identifier, canonical = %canonical, "Registered entity kind");
        self.kinds.write().insert(canonical, adapter);
    }

    /// Resolve a kind identifier to its lifecycle adapter.
    pub fn resolve(&self, identifier: &str) -> FactoryResult<Arc<dyn LifecycleAdapter>> {
        let canonical = classify(identifier);
        let adapter = self.kinds.read().get(&canonical).cloned();
        adapter.ok_or(ObjectMotherError::UnknownEntityKind {
            kind: identifier.to_string(),
            canonical,
        })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.kinds.read().contains_key(&classify(identifier))
    }

    pub fn unregister(&self, identifier: &str) -> bool {
        self.kinds.write().remove(&classify(identifier)).is_some()
    }

    /// Registered canonical type names, sorted.
    pub fn kind_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.kinds.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.read().is_empty()
    }
}
