//! # Prototype Registry
//!
//! Name → prototype definitions, plus the dispatch table of generated method
//! names.
//!
//! ## Architecture
//!
//! ```text
//! PrototypeRegistry
//! ├── definitions   name → Arc<PrototypeDefinition>
//! └── methods       "wilma" / "wilma!" / "recreate_wilma" → GeneratedMethod
//! ```
//!
//! Registering an existing name replaces the definition and its generated
//! methods (last writer wins). Definitions are handed out as `Arc`s so
//! callers never hold the registry lock while a prototype runs.

pub mod method_dispatch;
pub mod prototype;

pub use method_dispatch::{defaults_kind, CallPattern, Dispatched, GeneratedMethod, MethodVariant};
pub use prototype::{creation_fn, CreationFn, PrototypeDefinition, Recipe};

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_prototypes: usize,
    pub custom_prototypes: usize,
    pub generated_methods: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PrototypeRegistry {
    definitions: HashMap<String, Arc<PrototypeDefinition>>,
    methods: HashMap<String, GeneratedMethod>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition and generate its methods, returning the
    /// definition it replaced.
    pub fn register(
        &mut self,
        definition: PrototypeDefinition,
    ) -> Option<Arc<PrototypeDefinition>> {
        let name = definition.name().to_string();
        let previous = self.remove(&name);

        for variant in definition.variants() {
            self.methods.insert(
                variant.method_name(&name),
                GeneratedMethod::new(name.clone(), *variant),
            );
        }

        debug!(
            prototype = %name,
            kind = definition.entity_kind().unwrap_or("<custom>"),
            custom = definition.is_custom(),
            replaced = previous.is_some(),
            "Registered prototype"
        );

        self.definitions.insert(name, Arc::new(definition));
        previous
    }

    pub fn definition(&self, name: &str) -> Option<Arc<PrototypeDefinition>> {
        self.definitions.get(name).cloned()
    }

    pub fn method(&self, call_name: &str) -> Option<&GeneratedMethod> {
        self.methods.get(call_name)
    }

    /// Resolve a generated method name to its prototype and variant.
    pub fn resolve_method(
        &self,
        call_name: &str,
    ) -> Option<(Arc<PrototypeDefinition>, MethodVariant)> {
        let method = self.methods.get(call_name)?;
        let definition = self.definitions.get(&method.prototype)?;
        Some((Arc::clone(definition), method.variant))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Remove a prototype and every generated method still pointing at it.
    pub fn remove(&mut self, name: &str) -> Option<Arc<PrototypeDefinition>> {
        let removed = self.definitions.remove(name)?;
        self.methods.retain(|_, method| method.prototype != name);
        Some(removed)
    }

    /// Declared prototype names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Generated method names, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn reset(&mut self) {
        self.definitions.clear();
        self.methods.clear();
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_prototypes: self.definitions.len(),
            custom_prototypes: self.definitions.values().filter(|d| d.is_custom()).count(),
            generated_methods: self.methods.len(),
        }
    }
}
