//! Configuration Loader
//!
//! Environment-aware loading of [`ObjectMotherConfig`]. Layers optional
//! configuration files from a config directory under `OBJECT_MOTHER_*`
//! environment overrides, then validates the result.

use super::error::ConfigResult;
use super::ObjectMotherConfig;
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for environment variable overrides (`OBJECT_MOTHER_PROTOTYPE_DIR`)
pub const ENV_PREFIX: &str = "OBJECT_MOTHER";

/// Base name of configuration files (`object_mother.yaml`, `object_mother.test.toml`)
pub const CONFIG_FILE_STEM: &str = "object_mother";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Detect current environment from environment variables.
///
/// `OBJECT_MOTHER_ENV || APP_ENV || RUST_ENV || "development"`, lowercased.
pub fn detect_environment() -> String {
    env::var("OBJECT_MOTHER_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .or_else(|_| env::var("RUST_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `./config` with environment auto-detection
    pub fn load() -> ConfigResult<ObjectMotherConfig> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<&Path>) -> ConfigResult<ObjectMotherConfig> {
        let environment = detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration with an explicit environment name
    pub fn load_from_directory_with_env(
        config_dir: Option<&Path>,
        environment: &str,
    ) -> ConfigResult<ObjectMotherConfig> {
        Self::build(config_dir, environment, None)
    }

    /// Load configuration with the environment overrides taken from `vars`
    /// instead of the process environment. Keys carry the full prefix.
    pub fn load_with_env_vars(
        config_dir: Option<&Path>,
        environment: &str,
        vars: HashMap<String, String>,
    ) -> ConfigResult<ObjectMotherConfig> {
        Self::build(config_dir, environment, Some(vars))
    }

    fn build(
        config_dir: Option<&Path>,
        environment: &str,
        vars: Option<HashMap<String, String>>,
    ) -> ConfigResult<ObjectMotherConfig> {
        let config_directory = config_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading object mother configuration"
        );

        let base = config_directory.join(CONFIG_FILE_STEM);
        let env_specific = config_directory.join(format!("{CONFIG_FILE_STEM}.{environment}"));

        let config: ObjectMotherConfig = Config::builder()
            .add_source(File::with_name(&base.to_string_lossy()).required(false))
            .add_source(File::with_name(&env_specific.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("default_prototype_dirs")
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            project_root = %config.project_root.display(),
            prototype_dir = ?config.prototype_dir,
            propagate_destroy_failures = config.propagate_destroy_failures,
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}
