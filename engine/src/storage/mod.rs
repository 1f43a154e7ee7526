mod key_value_store;
mod score_persistence;
mod settings;
mod storage_manager;

pub use key_value_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use score_persistence::{HIGH_SCORES_KEY, KeyValueScorePersistence};
pub use settings::{GameSettings, LastConfiguration, Statistics, Theme};
pub use storage_manager::{LAST_CONFIGURATION_KEY, SETTINGS_KEY, STATISTICS_KEY, StorageManager};
