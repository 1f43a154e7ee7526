use std::sync::Arc;

use super::KeyValueStore;
use crate::high_scores::{HighScoreEntry, ScorePersistence};
use crate::log;

pub const HIGH_SCORES_KEY: &str = "highScores";

/// Keeps the whole high-score list as one YAML document under
/// [`HIGH_SCORES_KEY`].
pub struct KeyValueScorePersistence<TStore: KeyValueStore> {
    store: Arc<TStore>,
}

impl<TStore: KeyValueStore> KeyValueScorePersistence<TStore> {
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    fn try_load(&self) -> Result<Vec<HighScoreEntry>, String> {
        let Some(bytes) = self.store.get(HIGH_SCORES_KEY)? else {
            return Ok(Vec::new());
        };
        let content = String::from_utf8(bytes).map_err(|e| format!("High scores are not UTF-8: {}", e))?;
        serde_yaml_ng::from_str(&content).map_err(|e| format!("Failed to decode high scores: {}", e))
    }

    fn try_save(&self, entries: &[HighScoreEntry]) -> Result<(), String> {
        let content =
            serde_yaml_ng::to_string(entries).map_err(|e| format!("Failed to encode high scores: {}", e))?;
        self.store.set(HIGH_SCORES_KEY, content.as_bytes())
    }
}

impl<TStore: KeyValueStore> ScorePersistence for KeyValueScorePersistence<TStore> {
    fn load(&self) -> Vec<HighScoreEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                log!("High scores unavailable, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[HighScoreEntry]) {
        if let Err(e) = self.try_save(entries) {
            log!("Failed to save high scores: {}", e);
        }
    }
}
