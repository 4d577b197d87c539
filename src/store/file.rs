//! File-based configuration store with atomic writes.
//!
//! Stores `TeamGames.configuration.json` under `dirs::config_dir()/<namespace>/`.
//! Uses temp file + rename for atomic writes.

use crate::config::StoreConfiguration;
use crate::store::ConfigStore;
use crate::TeamGamesError;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "TeamGames.configuration.json";

/// File-based configuration store.
#[derive(Debug)]
pub struct FileConfigStore {
    /// Directory holding the configuration file.
    config_dir: PathBuf,
}

impl FileConfigStore {
    /// Create a store under `dirs::config_dir()/<namespace>/`.
    pub fn new(namespace: &str) -> Result<Self, TeamGamesError> {
        let base_dir = dirs::config_dir().ok_or_else(|| {
            TeamGamesError::ConfigIO("Could not find config directory".to_string())
        })?;

        Self::with_path(base_dir.join(namespace))
    }

    /// Create a store in an explicit directory, e.g. the host's plugin folder.
    pub fn with_path(config_dir: PathBuf) -> Result<Self, TeamGamesError> {
        fs::create_dir_all(&config_dir).map_err(|e| {
            TeamGamesError::ConfigIO(format!("Failed to create config dir: {}", e))
        })?;
        Ok(Self { config_dir })
    }

    /// Full path of the configuration file.
    pub fn path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn write_atomic(&self, target: &Path, json: &str) -> Result<(), TeamGamesError> {
        let temp_path = self.config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        fs::write(&temp_path, json)
            .map_err(|e| TeamGamesError::ConfigIO(format!("Failed to write temp file: {}", e)))?;

        fs::rename(&temp_path, target).map_err(|e| {
            TeamGamesError::ConfigIO(format!("Failed to rename config file: {}", e))
        })?;

        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&mut self) -> Result<StoreConfiguration, TeamGamesError> {
        let path = self.path();

        if !path.exists() {
            let defaults = StoreConfiguration::default();
            self.save(&defaults)?;
            tracing::info!(path = %path.display(), "wrote default TeamGames configuration");
            return Ok(defaults);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| TeamGamesError::ConfigIO(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&json)
            .map_err(|e| TeamGamesError::ConfigIO(format!("Failed to parse config file: {}", e)))
    }

    fn save(&mut self, config: &StoreConfiguration) -> Result<(), TeamGamesError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| TeamGamesError::ConfigIO(format!("Failed to serialize config: {}", e)))?;
        self.write_atomic(&self.path(), &json)
    }
}
