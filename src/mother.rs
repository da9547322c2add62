//! # Object Mother
//!
//! The factory dispatcher. Owns (or shares) the prototype registry and the
//! identity cache, resolves entity kinds through a [`KindRegistry`], and
//! executes generated factory methods.
//!
//! ## Call flow
//!
//! ```text
//! mother.produce("wilma", overrides)
//!     │
//!     ├─ identity cache hit ──► store.find_by_id(id) ──► live? return it
//!     │                                               └► stale: drop entry
//!     ├─ merge  <kind>_prototype ⊕ base attributes ⊕ overrides
//!     ├─ store.create(merged)
//!     └─ cache the new identity
//! ```
//!
//! ## Scope
//!
//! Each `ObjectMother::new` gets a private registry and cache. Mothers built
//! with the same [`SharedState`] see each other's declarations and cached
//! identities; [`SharedState::global`] is the process-wide instance.
//!
//! ## Example
//!
//! ```rust
//! use object_mother::{KindRegistry, ObjectMother};
//! use object_mother::test_helpers::{Record, RecordingStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kinds = Arc::new(KindRegistry::new().with_kind("user", RecordingStore::new("User")));
//! let mother = ObjectMother::new(kinds);
//!
//! mother.declare("wilma", "user", json!({"name": "wilma"}).as_object().cloned().unwrap_or_default())?;
//!
//! let wilma = mother.produce("wilma", None)?.expect("store accepted wilma");
//! let record = wilma.downcast_ref::<Record>().expect("recording store record");
//! assert_eq!(record.attributes["name"], json!("wilma"));
//!
//! // Second call reloads by identity instead of creating again
//! let again = mother.produce("wilma", None)?.expect("cached wilma");
//! assert_eq!(again.id(), wilma.id());
//! # Ok(())
//! # }
//! ```

use crate::cache::IdentityCache;
use crate::config::ObjectMotherConfig;
use crate::entity::{merge_into, overrides_from_args, Attributes, EntityId, EntityRef};
use crate::error::{FactoryResult, ObjectMotherError};
use crate::kinds::{classify, KindRegistry};
use crate::lifecycle::LifecycleAdapter;
use crate::loader::{load_directory, resolve_prototype_dir};
use crate::logging::log_factory_operation;
use crate::registry::{
    defaults_kind, CallPattern, CreationFn, Dispatched, GeneratedMethod, MethodVariant,
    PrototypeDefinition, PrototypeRegistry, Recipe, RegistryStats,
};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Source of `<kind>_prototype` default attributes.
pub type DefaultsProvider = Arc<dyn Fn() -> Attributes + Send + Sync>;

static GLOBAL_STATE: OnceLock<SharedState> = OnceLock::new();

/// Prototype registry, identity cache, defaults providers and the loaded
/// prototype directory, shareable between mothers.
#[derive(Clone, Default)]
pub struct SharedState {
    registry: Arc<RwLock<PrototypeRegistry>>,
    cache: Arc<Mutex<IdentityCache>>,
    defaults: Arc<RwLock<HashMap<String, DefaultsProvider>>>,
    prototype_dir: Arc<Mutex<PrototypeDirState>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide state. Call [`reset`](Self::reset) between tests that
    /// rely on a clean slate.
    pub fn global() -> Self {
        GLOBAL_STATE.get_or_init(SharedState::new).clone()
    }

    /// Forget every prototype, cached identity and defaults provider. The
    /// prototype directory is resolved and loaded again on next access.
    pub fn reset(&self) {
        self.registry.write().reset();
        self.cache.lock().clear();
        self.defaults.write().clear();
        *self.prototype_dir.lock() = PrototypeDirState::Unresolved;
        debug!("Reset prototype registry, identity cache and defaults providers");
    }

    /// Whether two handles point at the same registry and cache.
    pub fn same_as(&self, other: &SharedState) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry) && Arc::ptr_eq(&self.cache, &other.cache)
    }

    pub fn prototype_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    pub fn registry_stats(&self) -> RegistryStats {
        self.registry.read().stats()
    }

    pub fn cached_ids(&self) -> HashMap<String, EntityId> {
        self.cache.lock().snapshot()
    }
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut defaults: Vec<String> = self.defaults.read().keys().cloned().collect();
        defaults.sort();

        f.debug_struct("SharedState")
            .field("prototypes", &self.prototype_names())
            .field("cached", &self.cache.lock().len())
            .field("defaults", &defaults)
            .field("prototype_dir", &*self.prototype_dir.lock())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum PrototypeDirState {
    #[default]
    Unresolved,
    Resolved(Option<PathBuf>),
}

pub struct ObjectMother {
    state: SharedState,
    kinds: Arc<KindRegistry>,
    config: ObjectMotherConfig,
}

impl fmt::Debug for ObjectMother {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMother")
            .field("state", &self.state)
            .field("kinds", &self.kinds)
            .field("config", &self.config)
            .finish()
    }
}

impl ObjectMother {
    /// Mother with a private registry and cache.
    pub fn new(kinds: Arc<KindRegistry>) -> Self {
        Self::with_state(kinds, SharedState::new())
    }

    /// Mother over existing shared state.
    pub fn with_state(kinds: Arc<KindRegistry>, state: SharedState) -> Self {
        Self {
            state,
            kinds,
            config: ObjectMotherConfig::default(),
        }
    }

    /// Mother over the process-wide [`SharedState::global`].
    pub fn global(kinds: Arc<KindRegistry>) -> Self {
        Self::with_state(kinds, SharedState::global())
    }

    /// Mother with a private registry, configured by a validated `config`.
    pub fn from_config(kinds: Arc<KindRegistry>, config: ObjectMotherConfig) -> FactoryResult<Self> {
        config.validate()?;
        Ok(Self::new(kinds).with_config(config))
    }

    /// Replace the configuration. The prototype directory is resolved again
    /// on next access.
    #[must_use]
    pub fn with_config(mut self, config: ObjectMotherConfig) -> Self {
        self.config = config;
        *self.state.prototype_dir.lock() = PrototypeDirState::Unresolved;
        self
    }

    /// Builder form of [`provide_defaults`](Self::provide_defaults).
    #[must_use]
    pub fn with_defaults<F>(self, kind: &str, provider: F) -> Self
    where
        F: Fn() -> Attributes + Send + Sync + 'static,
    {
        self.provide_defaults(kind, provider);
        self
    }

    pub fn config(&self) -> &ObjectMotherConfig {
        &self.config
    }

    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.kinds
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    // ------------------------------------------------------------------------
    // Declaration

    /// Declare an attribute prototype for `kind`. The kind must already be
    /// registered. Redeclaring a name replaces it.
    pub fn declare(&self, name: &str, kind: &str, base: Attributes) -> FactoryResult<()> {
        self.kinds.resolve(kind)?;
        self.register(PrototypeDefinition::attributes(name, kind, base));
        Ok(())
    }

    /// Declare a prototype built by `creation_fn`. The optional kind is used
    /// only to destroy stale entities on recreate.
    pub fn declare_with(
        &self,
        name: &str,
        kind: Option<&str>,
        creation_fn: CreationFn,
    ) -> FactoryResult<()> {
        if let Some(kind) = kind {
            self.kinds.resolve(kind)?;
        }
        self.register(PrototypeDefinition::custom(
            name,
            kind.map(str::to_string),
            creation_fn,
        ));
        Ok(())
    }

    fn register(&self, definition: PrototypeDefinition) {
        let name = definition.name().to_string();
        let kind = definition.entity_kind().map(str::to_string);
        let previous = self.state.registry.write().register(definition);
        let replaced = previous.is_some();

        let kind_changed = previous.is_some_and(|previous| {
            previous.entity_kind().map(classify) != kind.as_deref().map(classify)
        });
        if kind_changed {
            if let Some(id) = self.state.cache.lock().invalidate(&name) {
                debug!(prototype = %name, id = %id, "Entity kind changed, dropped cached identity");
            }
        }

        info!(
            prototype = %name,
            kind = kind.as_deref().unwrap_or("<custom>"),
            replaced,
            "Declared prototype"
        );
    }

    pub fn definition(&self, name: &str) -> Option<Arc<PrototypeDefinition>> {
        self.state.registry.read().definition(name)
    }

    pub fn prototype_names(&self) -> Vec<String> {
        self.state.prototype_names()
    }

    /// Names of every generated factory method, sorted.
    pub fn generated_methods(&self) -> Vec<String> {
        self.state.registry.read().method_names()
    }

    pub fn registry_stats(&self) -> RegistryStats {
        self.state.registry_stats()
    }

    /// Remove a prototype and its cached identity. Nothing is destroyed.
    pub fn remove_prototype(&self, name: &str) -> bool {
        let removed = self.state.registry.write().remove(name).is_some();
        if removed {
            self.state.cache.lock().invalidate(name);
        }
        removed
    }

    /// Clear this mother's state: registry, cache, defaults providers and the
    /// loaded prototype directory.
    pub fn reset(&self) {
        self.state.reset();
    }

    // ------------------------------------------------------------------------
    // Default-attribute providers

    /// Register the `<kind>_prototype` source of default attributes on this
    /// mother's state. Feeds both the `create_<kind>` family and attribute
    /// prototypes of `kind`.
    pub fn provide_defaults<F>(&self, kind: &str, provider: F)
    where
        F: Fn() -> Attributes + Send + Sync + 'static,
    {
        let canonical = classify(kind);
        debug!(kind = %kind, canonical = %canonical, "Registered default attributes provider");
        self.state.defaults.write().insert(canonical, Arc::new(provider));
    }

    pub fn has_defaults(&self, kind: &str) -> bool {
        self.state.defaults.read().contains_key(&classify(kind))
    }

    /// Output of the `<kind>_prototype` provider, empty when none exists.
    pub fn kind_defaults(&self, kind: &str) -> Attributes {
        let provider = self.state.defaults.read().get(&classify(kind)).cloned();
        provider.map(|provider| provider()).unwrap_or_default()
    }

    fn merged_attributes(
        &self,
        kind: &str,
        base: &Attributes,
        overrides: Option<&Attributes>,
    ) -> Attributes {
        let mut attributes = self.kind_defaults(kind);
        merge_into(&mut attributes, base);
        if let Some(overrides) = overrides {
            merge_into(&mut attributes, overrides);
        }
        attributes
    }

    // ------------------------------------------------------------------------
    // Named prototypes

    /// `name(overrides)`: reload the cached entity or create a new one.
    pub fn produce(
        &self,
        name: &str,
        overrides: Option<&Attributes>,
    ) -> FactoryResult<Option<EntityRef>> {
        self.run_named(name, MethodVariant::Plain, &override_args(overrides))
    }

    /// `name!(overrides)`: as [`produce`](Self::produce) with a raising
    /// create. Unavailable for custom prototypes.
    pub fn produce_or_raise(
        &self,
        name: &str,
        overrides: Option<&Attributes>,
    ) -> FactoryResult<EntityRef> {
        let definition = self.named_definition(name, MethodVariant::Bang)?;
        self.find_or_create_raising(&definition, &override_args(overrides))
    }

    /// `recreate_name(overrides)`: drop and destroy the cached entity, then
    /// produce a fresh one.
    pub fn recreate(
        &self,
        name: &str,
        overrides: Option<&Attributes>,
    ) -> FactoryResult<Option<EntityRef>> {
        self.run_named(name, MethodVariant::Recreate, &override_args(overrides))
    }

    fn run_named(
        &self,
        name: &str,
        variant: MethodVariant,
        args: &[Value],
    ) -> FactoryResult<Option<EntityRef>> {
        let definition = self.named_definition(name, variant)?;
        self.run(&definition, variant, args)
    }

    fn named_definition(
        &self,
        name: &str,
        variant: MethodVariant,
    ) -> FactoryResult<Arc<PrototypeDefinition>> {
        let definition = self
            .definition(name)
            .ok_or_else(|| ObjectMotherError::unknown_operation(variant.method_name(name)))?;

        if !definition.variants().contains(&variant) {
            return Err(ObjectMotherError::unknown_operation(
                variant.method_name(name),
            ));
        }

        Ok(definition)
    }

    fn run(
        &self,
        definition: &PrototypeDefinition,
        variant: MethodVariant,
        args: &[Value],
    ) -> FactoryResult<Option<EntityRef>> {
        debug!(
            method = %GeneratedMethod::new(definition.name(), variant),
            "Running factory method"
        );

        match variant {
            MethodVariant::Plain => self.find_or_create(definition, args),
            MethodVariant::Bang => self.find_or_create_raising(definition, args).map(Some),
            MethodVariant::Recreate => {
                self.invalidate_and_destroy(definition)?;
                self.find_or_create(definition, args)
            }
        }
    }

    fn find_or_create(
        &self,
        definition: &PrototypeDefinition,
        args: &[Value],
    ) -> FactoryResult<Option<EntityRef>> {
        let name = definition.name();

        let base = match definition.recipe() {
            Recipe::Custom(creation_fn) => {
                let entity = creation_fn(args)?;
                self.cache_entity(name, entity.as_ref());
                return Ok(entity);
            }
            Recipe::Attributes(base) => base,
        };

        let kind = attribute_kind(definition)?;
        let adapter = self.kinds.resolve(kind)?;

        if let Some(entity) = self.cache_fetch(name, adapter.as_ref()) {
            return Ok(Some(entity));
        }

        let attributes = self.merged_attributes(kind, base, overrides_from_args(args));
        let entity = self.create_entity(kind, adapter.as_ref(), &attributes);
        self.cache_entity(name, entity.as_ref());
        Ok(entity)
    }

    fn find_or_create_raising(
        &self,
        definition: &PrototypeDefinition,
        args: &[Value],
    ) -> FactoryResult<EntityRef> {
        let name = definition.name();

        let Recipe::Attributes(base) = definition.recipe() else {
            return Err(ObjectMotherError::unknown_operation(
                MethodVariant::Bang.method_name(name),
            ));
        };

        let kind = attribute_kind(definition)?;
        let adapter = self.kinds.resolve(kind)?;

        if let Some(entity) = self.cache_fetch(name, adapter.as_ref()) {
            return Ok(entity);
        }

        let attributes = self.merged_attributes(kind, base, overrides_from_args(args));
        let entity = self.create_entity_or_raise(kind, adapter.as_ref(), &attributes)?;
        self.cache_entity(name, Some(&entity));
        Ok(entity)
    }

    /// Reload a named prototype by its cached identity. A cached identity the
    /// store no longer knows is dropped and treated as a miss.
    fn cache_fetch(&self, name: &str, adapter: &dyn LifecycleAdapter) -> Option<EntityRef> {
        let id = self.state.cache.lock().get(name)?;

        match adapter.find_by_id(&id) {
            Some(entity) => {
                debug!(prototype = %name, id = %id, "Identity cache hit");
                Some(entity)
            }
            None => {
                debug!(prototype = %name, id = %id, "Stale identity cache entry, recreating");
                self.state.cache.lock().invalidate(name);
                None
            }
        }
    }

    fn cache_entity(&self, name: &str, entity: Option<&EntityRef>) {
        match entity {
            Some(entity) => {
                self.state.cache.lock().put(name, &**entity);
            }
            None => debug!(prototype = %name, "Nothing produced, identity cache untouched"),
        }
    }

    fn create_entity(
        &self,
        kind: &str,
        adapter: &dyn LifecycleAdapter,
        attributes: &Attributes,
    ) -> Option<EntityRef> {
        let entity = adapter.create(attributes);
        if entity.is_none() {
            debug!(kind = %kind, "Store declined to create entity");
        }
        entity
    }

    fn create_entity_or_raise(
        &self,
        kind: &str,
        adapter: &dyn LifecycleAdapter,
        attributes: &Attributes,
    ) -> FactoryResult<EntityRef> {
        adapter
            .create_or_raise(attributes)
            .map_err(|source| {
                warn!(kind = %kind, error = %source, "Raising create failed");
                ObjectMotherError::CreationFailed {
                    kind: classify(kind),
                    source,
                }
            })
    }

    fn invalidate_and_destroy(&self, definition: &PrototypeDefinition) -> FactoryResult<()> {
        let name = definition.name();
        let Some(id) = self.state.cache.lock().invalidate(name) else {
            debug!(prototype = %name, "Nothing cached, skipping destroy");
            return Ok(());
        };

        let Some(kind) = definition.entity_kind() else {
            debug!(prototype = %name, id = %id, "Prototype has no entity kind, skipping destroy");
            return Ok(());
        };

        let adapter = self.kinds.resolve(kind)?;
        match adapter.destroy(&id) {
            Ok(()) => {
                log_factory_operation("recreate", Some(name), Some(kind), "destroyed", None);
                Ok(())
            }
            Err(source) if self.config.propagate_destroy_failures => {
                Err(ObjectMotherError::DestroyFailed {
                    kind: classify(kind),
                    id,
                    source,
                })
            }
            Err(source) => {
                warn!(
                    prototype = %name,
                    kind = %kind,
                    id = %id,
                    error = %source,
                    "Destroying cached entity failed, continuing with recreate"
                );
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Generic create_<kind> family

    /// `create_<kind>(overrides)`: merge the kind's defaults with `overrides`
    /// and create. Never touches the identity cache.
    pub fn create_kind(
        &self,
        kind: &str,
        overrides: Option<&Attributes>,
    ) -> FactoryResult<Option<EntityRef>> {
        let adapter = self.kinds.resolve(kind)?;
        let attributes = self.merged_attributes(kind, &Attributes::new(), overrides);
        Ok(self.create_entity(kind, adapter.as_ref(), &attributes))
    }

    /// `create_<kind>!(overrides)`
    pub fn create_kind_or_raise(
        &self,
        kind: &str,
        overrides: Option<&Attributes>,
    ) -> FactoryResult<EntityRef> {
        let adapter = self.kinds.resolve(kind)?;
        let attributes = self.merged_attributes(kind, &Attributes::new(), overrides);
        self.create_entity_or_raise(kind, adapter.as_ref(), &attributes)
    }

    /// `create_<kind>(overrides) { |attributes| ... }`: hand the merged
    /// attributes to `block` instead of the store and return its result.
    pub fn create_kind_with<R>(
        &self,
        kind: &str,
        overrides: Option<&Attributes>,
        block: impl FnOnce(Attributes) -> R,
    ) -> FactoryResult<R> {
        self.kinds.resolve(kind)?;
        let attributes = self.merged_attributes(kind, &Attributes::new(), overrides);
        Ok(block(attributes))
    }

    // ------------------------------------------------------------------------
    // Identity cache

    /// Copy of every cached prototype identity.
    pub fn cached_ids(&self) -> HashMap<String, EntityId> {
        self.state.cached_ids()
    }

    pub fn cached_id(&self, name: &str) -> Option<EntityId> {
        self.state.cache.lock().get(name)
    }

    /// Seed the cache with a known identity for `name`.
    pub fn cache_id(&self, name: &str, id: impl Into<EntityId>) {
        self.state.cache.lock().insert(name, id.into());
    }

    /// Forget the cached identity for `name` without destroying anything.
    pub fn forget(&self, name: &str) -> Option<EntityId> {
        self.state.cache.lock().invalidate(name)
    }

    pub fn clear_cache(&self) {
        self.state.cache.lock().clear();
    }

    // ------------------------------------------------------------------------
    // Dynamic dispatch

    /// Resolve `call_name` and run it with `args`.
    ///
    /// Generated methods run their prototype; `define*` declares one;
    /// `<kind>_prototype` evaluates a registered defaults provider;
    /// `create_<kind>[!]` runs the generic family. `block` supplies the
    /// creation function for `define*` and the block for `create_<kind>`.
    pub fn dispatch(
        &self,
        call_name: &str,
        args: &[Value],
        block: Option<CreationFn>,
    ) -> FactoryResult<Dispatched> {
        let generated = self.state.registry.read().resolve_method(call_name);
        if let Some((definition, variant)) = generated {
            return self
                .run(&definition, variant, args)
                .map(Dispatched::Produced);
        }

        let pattern = CallPattern::parse(call_name);

        if let Some(CallPattern::Define { kind }) = &pattern {
            return self.dispatch_define(kind.as_deref(), args, block);
        }

        if let Some(kind) = defaults_kind(call_name).filter(|kind| self.has_defaults(kind)) {
            return Ok(Dispatched::Defaults(self.kind_defaults(kind)));
        }

        if let Some(CallPattern::CreateKind { kind, raise }) = pattern {
            let overrides = overrides_from_args(args);
            let entity = match block {
                Some(block) => self
                    .create_kind_with(&kind, overrides, |merged| block(&[Value::Object(merged)]))??,
                None if raise => Some(self.create_kind_or_raise(&kind, overrides)?),
                None => self.create_kind(&kind, overrides)?,
            };
            return Ok(Dispatched::Produced(entity));
        }

        debug!(call = %call_name, "No factory method matches call");
        Err(ObjectMotherError::unknown_operation(call_name))
    }

    fn dispatch_define(
        &self,
        kind: Option<&str>,
        args: &[Value],
        block: Option<CreationFn>,
    ) -> FactoryResult<Dispatched> {
        let name = args
            .first()
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ObjectMotherError::invalid_declaration(
                    "first argument to define must be the prototype name",
                )
            })?
            .to_string();

        match (block, kind) {
            (Some(block), kind) => self.declare_with(&name, kind, block)?,
            (None, Some(kind)) => {
                let base = match args.get(1) {
                    None | Some(Value::Null) => Attributes::new(),
                    Some(Value::Object(attributes)) => attributes.clone(),
                    Some(other) => {
                        return Err(ObjectMotherError::invalid_declaration(format!(
                            "attributes for prototype '{name}' must be an object, got {other}"
                        )))
                    }
                };
                self.declare(&name, kind, base)?
            }
            (None, None) => {
                return Err(ObjectMotherError::invalid_declaration(format!(
                    "prototype '{name}' needs an entity kind or a creation function"
                )))
            }
        }

        Ok(Dispatched::Declared { name })
    }

    /// Whether [`dispatch`](Self::dispatch) would accept `call_name`.
    pub fn responds_to(&self, call_name: &str) -> bool {
        if self.state.registry.read().method(call_name).is_some() {
            return true;
        }

        if defaults_kind(call_name).is_some_and(|kind| self.has_defaults(kind)) {
            return true;
        }

        match CallPattern::parse(call_name) {
            Some(CallPattern::Define { .. }) => true,
            Some(CallPattern::CreateKind { kind, .. }) => self.kinds.contains(&kind),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Prototype directory

    /// The prototype directory, resolved (and loaded) on first access.
    pub fn prototype_dir(&self) -> FactoryResult<Option<PathBuf>> {
        let current = self.state.prototype_dir.lock().clone();
        match current {
            PrototypeDirState::Resolved(dir) => Ok(dir),
            PrototypeDirState::Unresolved => self.set_prototype_dir(None),
        }
    }

    /// Point the mother at `dir` (or the configured default when `None`)
    /// and load its prototypes if the resolved directory changed.
    pub fn set_prototype_dir(&self, dir: Option<&Path>) -> FactoryResult<Option<PathBuf>> {
        let explicit = dir.map(Path::to_path_buf).or_else(|| {
            self.config
                .prototype_dir
                .as_ref()
                .map(|configured| self.config.project_root.join(configured))
        });
        let resolved =
            resolve_prototype_dir(explicit.as_deref(), &self.config.candidate_prototype_dirs());

        let next = PrototypeDirState::Resolved(resolved.clone());
        if *self.state.prototype_dir.lock() == next {
            return Ok(resolved);
        }

        if let Some(dir) = &resolved {
            self.load_prototypes(dir)?;
        } else {
            debug!("No prototype directory found");
        }

        *self.state.prototype_dir.lock() = next;
        Ok(resolved)
    }

    /// Declare every prototype and defaults provider found under `dir`.
    /// Returns the number of prototypes declared.
    pub fn load_prototypes(&self, dir: &Path) -> FactoryResult<usize> {
        let mut declared = 0;

        for (path, file) in load_directory(dir)? {
            for (kind, attributes) in file.defaults {
                self.provide_defaults(&kind, move || attributes.clone());
            }

            for spec in file.prototypes {
                if let Err(e) = self.declare(&spec.name, &spec.kind, spec.attributes) {
                    warn!(
                        path = %path.display(),
                        prototype = %spec.name,
                        error = %e,
                        "Failed to declare prototype from file"
                    );
                    return Err(e);
                }
                declared += 1;
            }
        }

        log_factory_operation(
            "load_prototypes",
            None,
            None,
            "completed",
            Some(&format!("{declared} prototypes from {}", dir.display())),
        );

        Ok(declared)
    }
}

fn attribute_kind(definition: &PrototypeDefinition) -> FactoryResult<&str> {
    definition.entity_kind().ok_or_else(|| {
        ObjectMotherError::invalid_declaration(format!(
            "attribute prototype '{}' has no entity kind",
            definition.name()
        ))
    })
}

fn override_args(overrides: Option<&Attributes>) -> Vec<Value> {
    overrides
        .map(|overrides| vec![Value::Object(overrides.clone())])
        .unwrap_or_default()
}
