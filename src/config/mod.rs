//! # Object Mother Configuration
//!
//! Settings that control where prototypes are discovered and how the
//! factory treats lifecycle failures.
//!
//! ## Sources
//!
//! Later sources override earlier ones:
//!
//! 1. [`ObjectMotherConfig::default`]
//! 2. `<config_dir>/object_mother.{toml,yaml,json}`
//! 3. `<config_dir>/object_mother.<environment>.{toml,yaml,json}`
//! 4. `OBJECT_MOTHER_*` environment variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use object_mother::config::ConfigLoader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_directory(Some(Path::new("config")))?;
//! println!("prototype dirs: {:?}", config.default_prototype_dirs);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::{detect_environment, ConfigLoader};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional prototype directories, relative to the project root.
pub const SPEC_PROTOTYPE_DIR: &str = "spec/object_mother";
pub const TEST_PROTOTYPE_DIR: &str = "test/object_mother";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectMotherConfig {
    /// Root the default prototype directories are resolved against
    pub project_root: PathBuf,

    /// Explicit prototype directory; wins over the defaults when set
    pub prototype_dir: Option<PathBuf>,

    /// Searched in order when no explicit directory is set
    pub default_prototype_dirs: Vec<PathBuf>,

    /// Fail `recreate_*` calls when destroying the stale entity fails
    pub propagate_destroy_failures: bool,

    /// Log level override used by `logging::init_console_only`
    pub log_level: Option<String>,
}

impl Default for ObjectMotherConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            prototype_dir: None,
            default_prototype_dirs: vec![
                PathBuf::from(SPEC_PROTOTYPE_DIR),
                PathBuf::from(TEST_PROTOTYPE_DIR),
            ],
            propagate_destroy_failures: false,
            log_level: None,
        }
    }
}

impl ObjectMotherConfig {
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_prototype_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prototype_dir = Some(dir.into());
        self
    }

    pub fn with_destroy_failures_propagated(mut self) -> Self {
        self.propagate_destroy_failures = true;
        self
    }

    /// Default prototype directories joined onto the project root.
    pub fn candidate_prototype_dirs(&self) -> Vec<PathBuf> {
        self.default_prototype_dirs
            .iter()
            .map(|dir| self.project_root.join(dir))
            .collect()
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for dir in &self.default_prototype_dirs {
            if dir.is_absolute() {
                return Err(ConfigurationError::invalid_value(
                    "default_prototype_dirs",
                    dir.display().to_string(),
                    "default prototype directories must be relative to project_root",
                ));
            }
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "log_level",
                    level.clone(),
                    format!("expected one of {}", LOG_LEVELS.join(", ")),
                ));
            }
        }

        Ok(())
    }
}
