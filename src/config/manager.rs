use super::{portfolio::PortfolioConfig, search::SearchConfig, traits::ConfigManifest, traits::ConfigSection};
use crate::error::{RebalanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment variables that override file settings,
/// e.g. `SHAREBALANCE_SEARCH__POPULATION_SIZE=200`.
pub const ENV_PREFIX: &str = "SHAREBALANCE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.portfolio.validate()?;
        Ok(())
    }

    pub fn manifest(&self) -> Vec<ConfigManifest> {
        vec![self.search.to_manifest(), self.portfolio.to_manifest()]
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
    env_prefix: String,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_env_prefix(ENV_PREFIX)
    }

    /// Manager reading overrides from `<prefix>_SECTION__FIELD` variables.
    pub fn with_env_prefix(prefix: &str) -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
            env_prefix: prefix.to_string(),
        }
    }

    /// Load a TOML or JSON file (by extension), then apply environment overrides.
    ///
    /// Overrides stay strings, so decimal settings keep every digit.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RebalanceError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(&self.get())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply `f` and keep the result only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
