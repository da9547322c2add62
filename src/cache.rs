//! # Identity Cache
//!
//! Maps prototype names to the identity of the last entity produced for them.
//!
//! This is a correctness mechanism rather than a performance cache: named
//! fixtures are reloaded from the store by identity instead of being inserted
//! again, which keeps uniqueness constraints happy when the same fixture is
//! used across many tests. Entries are never evicted automatically.

use crate::entity::{Entity, EntityId};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    entries: HashMap<String, EntityId>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.entries.get(name).cloned()
    }

    /// Record the identity of `entity` under `name`.
    ///
    /// Entities without an identity are not cached; returns whether an entry
    /// was written.
    pub fn put(&mut self, name: &str, entity: &dyn Entity) -> bool {
        match entity.id() {
            Some(id) => {
                debug!(prototype = %name, id = %id, "Cached prototype identity");
                self.entries.insert(name.to_string(), id);
                true
            }
            None => false,
        }
    }

    /// Seed an identity directly, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, id: EntityId) -> Option<EntityId> {
        self.entries.insert(name.into(), id)
    }

    /// Remove and return the cached identity for `name`.
    pub fn invalidate(&mut self, name: &str) -> Option<EntityId> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every cached entry.
    pub fn snapshot(&self) -> HashMap<String, EntityId> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Identified(i64);

    impl Entity for Identified {
        fn id(&self) -> Option<EntityId> {
            Some(EntityId::from(self.0))
        }
    }

    #[derive(Debug)]
    struct Anonymous;

    impl Entity for Anonymous {
        fn id(&self) -> Option<EntityId> {
            None
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = IdentityCache::new();

        assert!(cache.put("wilma", &Identified(123)));
        assert_eq!(cache.get("wilma"), Some(EntityId::from(123_i64)));
        assert!(cache.contains("wilma"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_without_identity_is_noop() {
        let mut cache = IdentityCache::new();

        assert!(!cache.put("anon", &Anonymous));
        assert!(cache.get("anon").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_overwrites_previous_identity() {
        let mut cache = IdentityCache::new();
        cache.put("wilma", &Identified(1));
        cache.put("wilma", &Identified(2));

        assert_eq!(cache.get("wilma"), Some(EntityId::from(2_i64)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_returns_prior_identity() {
        let mut cache = IdentityCache::new();
        cache.insert("yogi", EntityId::from(123_i64));

        assert_eq!(cache.invalidate("yogi"), Some(EntityId::from(123_i64)));
        assert_eq!(cache.invalidate("yogi"), None);
        assert!(!cache.contains("yogi"));
    }

    #[test]
    fn test_clear_and_snapshot() {
        let mut cache = IdentityCache::new();
        cache.insert("a", EntityId::from(1_i64));
        cache.insert("b", EntityId::from("b-1"));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["b"], EntityId::from("b-1"));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(snapshot.len(), 2);
    }
}
