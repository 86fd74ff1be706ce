//! Configuration port interface

use async_trait::async_trait;
use log::warn;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration; fields absent from storage stay `None`.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the whole configuration.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing file.
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write defaults. Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Load, falling back to an empty config when the file is unreadable
    async fn load_or_empty(&self) -> AppConfig {
        match self.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config at {}: {}", self.path().display(), e);
                AppConfig::empty()
            }
        }
    }
}
