// src/config/mod.rs
//! Configuration management
//!
//! Settings live in a TOML file: the coordination service URL, the transport
//! timeout and the block selection metric. The miner identity itself comes
//! from the command line.

/// Core configuration implementation
pub mod config;

pub use config::Config;

use crate::utils::error::MinerError;
use std::path::Path;

/// Loads configuration, falling back to defaults when `path` does not exist
pub fn load_or_default(path: &Path) -> Result<Config, MinerError> {
    if path.exists() {
        Config::load(path)
    } else {
        log::info!("No config at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
