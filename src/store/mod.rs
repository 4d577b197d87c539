//! Persistence for [`StoreConfiguration`](crate::config::StoreConfiguration).

pub mod file;

use crate::config::StoreConfiguration;
use crate::TeamGamesError;

/// Backend that persists the plugin configuration between restarts.
pub trait ConfigStore: Send {
    /// Load the configuration, creating it with defaults if absent.
    fn load(&mut self) -> Result<StoreConfiguration, TeamGamesError>;

    /// Persist the configuration.
    fn save(&mut self, config: &StoreConfiguration) -> Result<(), TeamGamesError>;
}

/// In-memory store, for hosts that persist configuration themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    current: Option<StoreConfiguration>,
    saves: usize,
}

impl MemoryConfigStore {
    /// Create an empty store; the first load yields defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a configuration.
    pub fn with_config(config: StoreConfiguration) -> Self {
        Self {
            current: Some(config),
            saves: 0,
        }
    }

    /// Last saved (or seeded) configuration.
    pub fn current(&self) -> Option<&StoreConfiguration> {
        self.current.as_ref()
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&mut self) -> Result<StoreConfiguration, TeamGamesError> {
        Ok(self.current.get_or_insert_with(StoreConfiguration::default).clone())
    }

    fn save(&mut self, config: &StoreConfiguration) -> Result<(), TeamGamesError> {
        self.current = Some(config.clone());
        self.saves += 1;
        Ok(())
    }
}
