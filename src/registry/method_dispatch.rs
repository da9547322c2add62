//! # Method Dispatch
//!
//! Name-based dispatch for generated factory methods.
//!
//! Declaring a prototype generates method names into the registry's dispatch
//! table. Incoming call names are resolved in order:
//!
//! ```text
//! call name
//!     │
//!     ├─ 1. generated method?      wilma / wilma! / recreate_wilma
//!     ├─ 2. declaration pattern?   define / define_user
//!     ├─ 3. kind defaults?         user_prototype (when a provider exists)
//!     ├─ 4. generic family?        create_user / create_user!
//!     └─ 5. UnknownOperation
//! ```
//!
//! This module owns the naming rules; execution lives on
//! [`ObjectMother`](crate::mother::ObjectMother).

use crate::entity::{Attributes, EntityRef};
use std::fmt;

const RECREATE_PREFIX: &str = "recreate_";
const DEFINE_PREFIX: &str = "define";
const CREATE_PREFIX: &str = "create_";
const DEFAULTS_SUFFIX: &str = "_prototype";

/// Flavour of a generated factory method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodVariant {
    /// `name`: cached, quiet creation
    Plain,
    /// `name!`: cached, raising creation
    Bang,
    /// `recreate_name`: invalidate, then plain
    Recreate,
}

impl MethodVariant {
    /// Method name generated for `prototype`.
    pub fn method_name(self, prototype: &str) -> String {
        match self {
            MethodVariant::Plain => prototype.to_string(),
            MethodVariant::Bang => format!("{prototype}!"),
            MethodVariant::Recreate => format!("{RECREATE_PREFIX}{prototype}"),
        }
    }
}

/// Dispatch-table entry pointing back at the owning prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMethod {
    pub prototype: String,
    pub variant: MethodVariant,
}

impl GeneratedMethod {
    pub fn new(prototype: impl Into<String>, variant: MethodVariant) -> Self {
        Self {
            prototype: prototype.into(),
            variant,
        }
    }

    pub fn method_name(&self) -> String {
        self.variant.method_name(&self.prototype)
    }
}

impl fmt::Display for GeneratedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} of {})", self.method_name(), self.variant, self.prototype)
    }
}

/// Pattern-matched call names that are not in the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPattern {
    /// `define` or `define_<kind>`
    Define { kind: Option<String> },
    /// `create_<kind>` or `create_<kind>!`
    CreateKind { kind: String, raise: bool },
}

impl CallPattern {
    /// Match a call name against the declaration and generic-family patterns.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix(DEFINE_PREFIX) {
            let kind = rest.strip_prefix('_').unwrap_or(rest);
            if kind.contains('!') {
                return None;
            }
            return Some(CallPattern::Define {
                kind: (!kind.is_empty()).then(|| kind.to_string()),
            });
        }

        if let Some(rest) = name.strip_prefix(CREATE_PREFIX) {
            let (kind, raise) = match rest.strip_suffix('!') {
                Some(kind) => (kind, true),
                None => (rest, false),
            };
            if kind.is_empty() || kind.contains('!') {
                return None;
            }
            return Some(CallPattern::CreateKind {
                kind: kind.to_string(),
                raise,
            });
        }

        None
    }
}

/// Kind named by a `<kind>_prototype` call, if the name has that shape.
pub fn defaults_kind(name: &str) -> Option<&str> {
    name.strip_suffix(DEFAULTS_SUFFIX)
        .filter(|kind| !kind.is_empty() && !kind.contains('!'))
}

/// Outcome of a dynamic dispatch.
#[derive(Debug, Clone)]
pub enum Dispatched {
    /// A factory method ran; `None` when the store declined to create.
    Produced(Option<EntityRef>),
    /// A declaration registered the named prototype.
    Declared { name: String },
    /// A `<kind>_prototype` provider was evaluated.
    Defaults(Attributes),
}

impl Dispatched {
    pub fn entity(&self) -> Option<&EntityRef> {
        match self {
            Dispatched::Produced(entity) => entity.as_ref(),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<EntityRef> {
        match self {
            Dispatched::Produced(entity) => entity,
            _ => None,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, Dispatched::Declared { .. })
    }
}
