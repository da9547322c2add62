//! # Prototype Loader
//!
//! Declarative prototype files and prototype directory resolution.
//!
//! A prototype directory holds YAML files (searched recursively, loaded in
//! sorted path order) of the form:
//!
//! ```yaml
//! prototypes:
//!   - name: wilma
//!     kind: user
//!     attributes:
//!       name: wilma
//!   - name: bobo
//!     kind: user
//! defaults:
//!   user:
//!     species: human
//! ```
//!
//! `defaults` entries become `<kind>_prototype` providers; `prototypes`
//! entries become attribute prototypes. Applying the parsed files is done by
//! [`ObjectMother::load_prototypes`](crate::mother::ObjectMother::load_prototypes).

use crate::entity::Attributes;
use crate::error::{FactoryResult, ObjectMotherError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROTOTYPE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// One prototype file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrototypeFile {
    #[serde(default)]
    pub prototypes: Vec<PrototypeSpec>,
    /// Kind identifier → default attributes
    #[serde(default)]
    pub defaults: BTreeMap<String, Attributes>,
}

/// A single attribute prototype declaration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrototypeSpec {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Pick the prototype directory: `explicit` when given, otherwise the first
/// candidate that exists as a directory.
pub fn resolve_prototype_dir(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }

    candidates.iter().find(|dir| dir.is_dir()).cloned()
}

/// Every prototype file under `dir`, recursively, sorted by path.
///
/// A directory that does not exist holds no prototypes.
pub fn discover_prototype_files(dir: &Path) -> FactoryResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        collect_prototype_files(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn collect_prototype_files(dir: &Path, files: &mut Vec<PathBuf>) -> FactoryResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| ObjectMotherError::prototype_load(dir, e))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ObjectMotherError::prototype_load(dir, e))?
            .path();

        if path.is_dir() {
            collect_prototype_files(&path, files)?;
        } else if is_prototype_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_prototype_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| PROTOTYPE_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
}

/// Parse one prototype file. Empty files declare nothing.
pub fn load_prototype_file(path: &Path) -> FactoryResult<PrototypeFile> {
    let content =
        fs::read_to_string(path).map_err(|e| ObjectMotherError::prototype_load(path, e))?;

    if content.trim().is_empty() {
        return Ok(PrototypeFile::default());
    }

    let file: PrototypeFile =
        serde_yaml::from_str(&content).map_err(|e| ObjectMotherError::prototype_load(path, e))?;

    if let Some(spec) = file.prototypes.iter().find(|spec| spec.name.is_empty()) {
        return Err(ObjectMotherError::prototype_load(
            path,
            format!("prototype of kind '{}' has an empty name", spec.kind),
        ));
    }

    debug!(
        path = %path.display(),
        prototypes = file.prototypes.len(),
        defaults = file.defaults.len(),
        "Parsed prototype file"
    );

    Ok(file)
}

/// Parse every prototype file under `dir`, in load order.
pub fn load_directory(dir: &Path) -> FactoryResult<Vec<(PathBuf, PrototypeFile)>> {
    discover_prototype_files(dir)?
        .into_iter()
        .map(|path| load_prototype_file(&path).map(|file| (path, file)))
        .collect()
}
