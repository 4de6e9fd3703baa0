//! Layered configuration loading backed by the `config` crate.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::{debug, info};

use super::QbankConfig;
use crate::error::{QbankError, Result};
use crate::logging::get_environment;

const BASE_FILE: &str = "qbank.toml";
const ENV_PREFIX: &str = "QBANK";

/// Owns the resolved configuration plus the environment it was resolved for
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: QbankConfig,
    environment: String,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Load from `./config` for the environment named by `QBANK_ENV`/`APP_ENV`
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("config"), &get_environment())
    }

    /// Load from an explicit directory and environment, then validate
    pub fn load_from_dir(config_dir: &Path, environment: &str) -> Result<Self> {
        let base_path = config_dir.join(BASE_FILE);
        let env_path = config_dir
            .join("environments")
            .join(format!("{environment}.toml"));

        debug!(
            base = %base_path.display(),
            overlay = %env_path.display(),
            environment,
            "Loading configuration"
        );

        let settings = Config::builder()
            .add_source(File::from(base_path).required(false))
            .add_source(File::from(env_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| QbankError::ConfigurationError(e.to_string()))?;

        let mut config: QbankConfig = settings
            .try_deserialize()
            .map_err(|e| QbankError::ConfigurationError(e.to_string()))?;

        // DATABASE_URL wins over every file layer, matching sqlx tooling
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                config.database.url = url;
            }
        }

        config.validate(environment)?;

        info!(environment, "Configuration loaded");

        Ok(Self {
            config,
            environment: environment.to_string(),
            config_dir: config_dir.to_path_buf(),
        })
    }

    /// Wrap an already-built configuration, validating it first
    pub fn from_config(config: QbankConfig, environment: &str) -> Result<Self> {
        config.validate(environment)?;
        Ok(Self {
            config,
            environment: environment.to_string(),
            config_dir: PathBuf::from("config"),
        })
    }

    pub fn config(&self) -> &QbankConfig {
        &self.config
    }

    pub fn into_config(self) -> QbankConfig {
        self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
