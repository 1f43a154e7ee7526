use std::sync::Arc;

use super::{
    FileKeyValueStore, GameSettings, KeyValueScorePersistence, KeyValueStore, LastConfiguration, Statistics,
};
use crate::config::{
    ConfigContentProvider, ConfigManager, ConfigSerializer, KeyValueContentProvider, StorageConfig,
    YamlConfigSerializer,
};
use crate::games::memory::{Difficulty, MatchMode};
use crate::log;

pub const SETTINGS_KEY: &str = "settings";
pub const STATISTICS_KEY: &str = "statistics";
pub const LAST_CONFIGURATION_KEY: &str = "lastConfiguration";

/// Player preferences, the last game configuration and lifetime statistics,
/// each kept under its own key of one [`KeyValueStore`]. Reads never fail:
/// missing or unreadable values come back as defaults and are logged.
pub struct StorageManager<TStore: KeyValueStore> {
    store: Arc<TStore>,
    settings: ConfigManager<KeyValueContentProvider<TStore>, GameSettings>,
    statistics: ConfigManager<KeyValueContentProvider<TStore>, Statistics>,
    last_configuration: KeyValueContentProvider<TStore>,
}

impl StorageManager<FileKeyValueStore> {
    pub fn open(config: &StorageConfig) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(config.location.as_str())))
    }
}

impl<TStore: KeyValueStore> StorageManager<TStore> {
    pub fn new(store: Arc<TStore>) -> Self {
        Self {
            settings: ConfigManager::new(
                KeyValueContentProvider::new(store.clone(), SETTINGS_KEY),
                YamlConfigSerializer::new(),
            ),
            statistics: ConfigManager::new(
                KeyValueContentProvider::new(store.clone(), STATISTICS_KEY),
                YamlConfigSerializer::new(),
            ),
            last_configuration: KeyValueContentProvider::new(store.clone(), LAST_CONFIGURATION_KEY),
            store,
        }
    }

    pub fn load_settings(&self) -> GameSettings {
        self.settings.get_config().unwrap_or_else(|e| {
            log!("Failed to load settings, using defaults: {}", e);
            GameSettings::default()
        })
    }

    pub fn save_settings(&self, settings: &GameSettings) -> Result<(), String> {
        self.settings.set_config(settings)
    }

    pub fn save_last_configuration(&self, mode: MatchMode, difficulty: Difficulty) -> Result<(), String> {
        let content = YamlConfigSerializer::new().serialize(&LastConfiguration { mode, difficulty })?;
        self.last_configuration.set_config_content(&content)
    }

    /// `None` until a game has been started, or when the stored value is unreadable.
    pub fn load_last_configuration(&self) -> Option<LastConfiguration> {
        let content = match self.last_configuration.get_config_content() {
            Ok(content) => content?,
            Err(e) => {
                log!("Failed to read last configuration: {}", e);
                return None;
            }
        };

        let result: Result<LastConfiguration, String> = YamlConfigSerializer::new().deserialize(&content);
        match result {
            Ok(configuration) => Some(configuration),
            Err(e) => {
                log!("Ignoring last configuration: {}", e);
                None
            }
        }
    }

    pub fn increment_games_played(&self) -> Result<Statistics, String> {
        self.statistics
            .update(|statistics| statistics.games_played = statistics.games_played.saturating_add(1))
    }

    pub fn add_to_total_score(&self, score: u32) -> Result<Statistics, String> {
        self.statistics
            .update(|statistics| statistics.total_score = statistics.total_score.saturating_add(score as u64))
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics.get_config().unwrap_or_else(|e| {
            log!("Failed to load statistics, using defaults: {}", e);
            Statistics::default()
        })
    }

    pub fn reset_statistics(&self) -> Result<(), String> {
        self.statistics.set_config(&Statistics::default())
    }

    /// High-score persistence backed by the same store.
    pub fn score_persistence(&self) -> KeyValueScorePersistence<TStore> {
        KeyValueScorePersistence::new(self.store.clone())
    }
}
