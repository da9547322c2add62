//! # Prototype Definitions
//!
//! A prototype is a named recipe for producing an entity: either a set of
//! base attributes handed to the kind's store, or a creation function that
//! owns construction entirely.

use super::method_dispatch::MethodVariant;
use crate::entity::{Attributes, EntityRef};
use crate::error::FactoryResult;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// User-supplied construction for custom prototypes and creation blocks.
///
/// Receives the raw call arguments. Returning `Ok(None)` means nothing was
/// produced; errors propagate to the caller unchanged.
pub type CreationFn = Arc<dyn Fn(&[Value]) -> FactoryResult<Option<EntityRef>> + Send + Sync>;

/// Box a closure as a [`CreationFn`].
pub fn creation_fn<F>(f: F) -> CreationFn
where
    F: Fn(&[Value]) -> FactoryResult<Option<EntityRef>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a prototype produces its entity.
#[derive(Clone)]
pub enum Recipe {
    Attributes(Attributes),
    Custom(CreationFn),
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipe::Attributes(attributes) => f.debug_tuple("Attributes").field(attributes).finish(),
            Recipe::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

/// A declared prototype. Immutable once registered.
#[derive(Debug, Clone)]
pub struct PrototypeDefinition {
    name: String,
    entity_kind: Option<String>,
    recipe: Recipe,
}

impl PrototypeDefinition {
    /// Attribute-driven prototype for `kind`.
    pub fn attributes(name: impl Into<String>, kind: impl Into<String>, base: Attributes) -> Self {
        Self {
            name: name.into(),
            entity_kind: Some(kind.into()),
            recipe: Recipe::Attributes(base),
        }
    }

    /// Prototype whose entity is built by `creation_fn`. The kind is optional
    /// and only used to destroy stale entities on recreate.
    pub fn custom(name: impl Into<String>, kind: Option<String>, creation_fn: CreationFn) -> Self {
        Self {
            name: name.into(),
            entity_kind: kind,
            recipe: Recipe::Custom(creation_fn),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_kind(&self) -> Option<&str> {
        self.entity_kind.as_deref()
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Base attributes, `None` for custom prototypes.
    pub fn base_attributes(&self) -> Option<&Attributes> {
        match &self.recipe {
            Recipe::Attributes(attributes) => Some(attributes),
            Recipe::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.recipe, Recipe::Custom(_))
    }

    /// Method variants generated for this prototype. Custom prototypes have
    /// no raising variant.
    pub fn variants(&self) -> &'static [MethodVariant] {
        match self.recipe {
            Recipe::Attributes(_) => &[
                MethodVariant::Plain,
                MethodVariant::Bang,
                MethodVariant::Recreate,
            ],
            Recipe::Custom(_) => &[MethodVariant::Plain, MethodVariant::Recreate],
        }
    }

    /// Names of the generated factory methods.
    pub fn method_names(&self) -> Vec<String> {
        self.variants()
            .iter()
            .map(|variant| variant.method_name(&self.name))
            .collect()
    }
}
