//! # Configuration State
//!
//! The loaded [`ClientConfig`] and the file it came from.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TAVOLA_*`)
//! 2. Config file (`config.toml`)
//! 3. Defaults
//!
//! Read-only after load, so no lock.

use std::path::PathBuf;

use tavola_client::ClientConfig;

use crate::error::CliResult;

#[derive(Debug, Clone)]
pub struct ConfigState {
    config: ClientConfig,
    path: Option<PathBuf>,
}

impl ConfigState {
    /// Loads from `path`, or from the platform config directory.
    pub fn load(path: Option<PathBuf>) -> CliResult<Self> {
        let path = path.or_else(ClientConfig::default_config_path);
        let config = ClientConfig::load(path.clone())?;
        Ok(ConfigState { config, path })
    }

    pub fn from_config(config: ClientConfig) -> Self {
        ConfigState { config, path: None }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Writes the current settings to the config file.
    pub fn save(&self) -> CliResult<()> {
        self.config.save(self.path.clone())?;
        Ok(())
    }
}
