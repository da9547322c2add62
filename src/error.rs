//! Error types for the Object Mother factory.
//!

use crate::config::ConfigurationError;
use crate::entity::EntityId;
use crate::lifecycle::LifecycleError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectMotherError {
    #[error("Unknown entity kind '{kind}' (resolved as {canonical})")]
    UnknownEntityKind { kind: String, canonical: String },

    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Creation of {kind} failed: {source}")]
    CreationFailed {
        kind: String,
        #[source]
        source: LifecycleError,
    },

    #[error("Creation function for prototype '{prototype}' failed: {reason}")]
    CreationFnFailed { prototype: String, reason: String },

    #[error("Destroying {kind} {id} failed: {source}")]
    DestroyFailed {
        kind: String,
        id: EntityId,
        #[source]
        source: LifecycleError,
    },

    #[error("Invalid declaration: {reason}")]
    InvalidDeclaration { reason: String },

    #[error("Failed to load prototypes from {path}: {reason}")]
    PrototypeLoad { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ObjectMotherError {
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    pub fn invalid_declaration(reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            reason: reason.into(),
        }
    }

    pub fn prototype_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::PrototypeLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Backend rejection surfaced by a raising call path.
    pub fn is_creation_failure(&self) -> bool {
        matches!(self, Self::CreationFailed { .. })
    }
}

pub type FactoryResult<T> = Result<T, ObjectMotherError>;
