// src/config/config.rs
use crate::types::SelectionMetric;
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings of the miner process
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Coordination service endpoint
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Transport timeout for a single call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How the block to mine on is chosen
    #[serde(default)]
    pub selection: SelectionMetric,
}

fn default_service_url() -> String {
    "http://localhost:5000".into()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout_secs(),
            selection: SelectionMetric::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MinerError)` - If file couldn't be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&config_str)
    }

    /// Parses and validates configuration text
    pub fn parse(text: &str) -> Result<Self, MinerError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MinerError> {
        if self.service_url.trim().is_empty() {
            return Err(MinerError::ConfigError("service_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(MinerError::ConfigError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Transport timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Generates a commented configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Blocksim Miner Configuration\n\n");
        template.push_str("# Coordination service JSON-RPC endpoint\n");
        template.push_str(&format!("service_url = \"{}\"\n", default_service_url()));
        template.push_str("# Timeout for a single service call, in seconds\n");
        template.push_str(&format!(
            "request_timeout_secs = {}\n",
            default_request_timeout_secs()
        ));
        template.push_str("# Block selection: \"deficit\" or \"least-progress\"\n");
        template.push_str("selection = \"deficit\"\n");
        template
    }
}
