//! Registry endpoint resolution for component-publisher
//!
//! Resolves the ordered registry list once per publish run, from an explicit
//! config file, an environment override, or the project config file.

use super::config::RegistryConfig;
use crate::core::error::PublishError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Project configuration file name
const CONFIG_FILENAME: &str = ".publish-registries.yaml";

/// Environment override: comma-separated registry base URLs
const REGISTRIES_ENV_VAR: &str = "COMPONENT_PUBLISHER_REGISTRIES";

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Component path whose project config is consulted
    pub component_path: PathBuf,

    /// Explicit config file (highest priority)
    pub config_file: Option<PathBuf>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options using the process environment
    pub fn from_process_env(component_path: PathBuf, config_file: Option<PathBuf>) -> Self {
        Self {
            component_path,
            config_file,
            env: std::env::vars().collect(),
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the ordered registry endpoint list
    ///
    /// Priority (high to low):
    /// 1. Explicit config file (`--config`)
    /// 2. `COMPONENT_PUBLISHER_REGISTRIES` (comma-separated)
    /// 3. Project config (`<component>/.publish-registries.yaml`)
    ///
    /// Fails when no source is configured or the source cannot be read. An
    /// explicitly configured empty list is valid and makes the upload loop
    /// vacuous.
    pub async fn load(options: ConfigLoadOptions) -> Result<RegistryConfig, PublishError> {
        if let Some(ref file) = options.config_file {
            return Self::load_file(file).await;
        }

        if let Some(env_config) = Self::load_env_config(&options.env) {
            return Ok(env_config);
        }

        let project_file = options.component_path.join(CONFIG_FILENAME);
        if fs::try_exists(&project_file).await.unwrap_or(false) {
            return Self::load_file(&project_file).await;
        }

        Err(PublishError::RegistryResolution {
            message: format!("{} が見つかりません", CONFIG_FILENAME),
        })
    }

    async fn load_file(path: &Path) -> Result<RegistryConfig, PublishError> {
        let content =
            fs::read_to_string(path)
                .await
                .map_err(|e| PublishError::RegistryResolution {
                    message: format!("{}: {}", path.display(), e),
                })?;

        serde_yaml::from_str(&content).map_err(|e| PublishError::RegistryResolution {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn load_env_config(env: &HashMap<String, String>) -> Option<RegistryConfig> {
        let raw = env.get(REGISTRIES_ENV_VAR)?;
        let registries: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Some(RegistryConfig::new(registries))
    }

}
