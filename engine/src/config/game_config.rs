use serde::{Deserialize, Serialize};

use super::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use crate::games::memory::{MATCH_REVEAL_DELAY_MS, MISMATCH_FLIP_BACK_DELAY_MS, TICK_INTERVAL_MS};
use crate::high_scores::DEFAULT_MAX_PER_BUCKET;
use crate::log;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub tick_interval_ms: u64,
    pub match_delay_ms: u64,
    pub mismatch_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            match_delay_ms: MATCH_REVEAL_DELAY_MS,
            mismatch_delay_ms: MISMATCH_FLIP_BACK_DELAY_MS,
        }
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HighScoreConfig {
    pub max_per_bucket: usize,
}

impl Default for HighScoreConfig {
    fn default() -> Self {
        Self {
            max_per_bucket: DEFAULT_MAX_PER_BUCKET,
        }
    }
}

impl Validate for HighScoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_per_bucket == 0 {
            return Err("max_per_bucket must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub location: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: "memory_tiles_data".to_string(),
        }
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.location.is_empty() {
            return Err("storage location must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub high_scores: HighScoreConfig,
    pub storage: StorageConfig,
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        self.session.validate()?;
        self.high_scores.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

pub fn load_game_config(file_path: &str) -> Result<GameConfig, String> {
    let manager: ConfigManager<FileContentConfigProvider, GameConfig, YamlConfigSerializer> =
        ConfigManager::from_yaml_file(file_path);
    manager.get_config().inspect_err(|e| {
        log!("Failed to load {}: {}", file_path, e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::{ConfigContentProvider, ConfigSerializer};
    use crate::games::memory::{Difficulty, MatchMode, SessionTimings};
    use crate::high_scores::{HighScoreEntry, HighScoreStore, NoPersistence};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_memory_tiles_config_{}.yaml", random_number));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let serializer = YamlConfigSerializer::new();
        let config = GameConfig::default();

        let content = serializer.serialize(&config).unwrap();
        let restored: GameConfig = serializer.deserialize(&content).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let config = load_game_config("this_file_does_not_exist.yaml").unwrap();

        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file_path = get_temp_file_path();
        FileContentConfigProvider::new(file_path.clone())
            .set_config_content("session:\n  tick_interval_ms: 250\n")
            .unwrap();

        let config = load_game_config(&file_path).unwrap();

        assert_eq!(config.session.tick_interval_ms, 250);
        assert_eq!(config.session.match_delay_ms, MATCH_REVEAL_DELAY_MS);
        assert_eq!(config.high_scores.max_per_bucket, DEFAULT_MAX_PER_BUCKET);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let file_path = get_temp_file_path();
        FileContentConfigProvider::new(file_path.clone())
            .set_config_content("session:\n  tick_interval_ms: 0\n")
            .unwrap();

        let result = load_game_config(&file_path);

        assert!(result.unwrap_err().contains("tick_interval_ms"));
    }

    #[test]
    fn test_loaded_config_drives_components() {
        let file_path = get_temp_file_path();
        FileContentConfigProvider::new(file_path.clone())
            .set_config_content("session:\n  tick_interval_ms: 500\nhigh_scores:\n  max_per_bucket: 1\n")
            .unwrap();
        let config = load_game_config(&file_path).unwrap();

        let timings = SessionTimings::from(&config.session);
        let mut high_scores = HighScoreStore::from_config(Box::new(NoPersistence), &config.high_scores);
        high_scores.add(HighScoreEntry::new(300, MatchMode::ColorOnly, Difficulty::Easy, 4, 50));
        high_scores.add(HighScoreEntry::new(500, MatchMode::ColorOnly, Difficulty::Easy, 4, 55));

        assert_eq!(timings.tick_interval, Duration::from_millis(500));
        assert_eq!(high_scores.len(), 1);
        assert_eq!(high_scores.top_score(MatchMode::ColorOnly, Difficulty::Easy), Some(500));
    }

    #[test]
    fn test_zero_bucket_size_rejected() {
        let config = GameConfig {
            high_scores: HighScoreConfig { max_per_bucket: 0 },
            ..GameConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manager_caches_after_set() {
        let file_path = get_temp_file_path();
        let manager: ConfigManager<_, GameConfig, _> = ConfigManager::from_yaml_file(&file_path);
        let config = GameConfig {
            storage: StorageConfig { location: "elsewhere".to_string() },
            ..GameConfig::default()
        };

        manager.set_config(&config).unwrap();

        assert_eq!(manager.get_config().unwrap(), config);
        assert_eq!(load_game_config(&file_path).unwrap(), config);
    }
}
