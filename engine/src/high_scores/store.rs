use std::collections::HashMap;

use super::entry::HighScoreEntry;
use crate::config::HighScoreConfig;
use crate::games::memory::{Difficulty, MatchMode};

pub const DEFAULT_MAX_PER_BUCKET: usize = 10;

/// Backing storage for the score list. Load failures are the implementor's
/// to absorb: they return an empty list.
pub trait ScorePersistence: Send {
    fn load(&self) -> Vec<HighScoreEntry>;
    fn save(&self, entries: &[HighScoreEntry]);
}

pub struct NoPersistence;

impl ScorePersistence for NoPersistence {
    fn load(&self) -> Vec<HighScoreEntry> {
        Vec::new()
    }

    fn save(&self, _entries: &[HighScoreEntry]) {}
}

pub struct HighScoreStore {
    entries: Vec<HighScoreEntry>,
    max_per_bucket: usize,
    persistence: Box<dyn ScorePersistence>,
}

impl HighScoreStore {
    pub fn new(persistence: Box<dyn ScorePersistence>) -> Self {
        Self::with_bucket_size(persistence, DEFAULT_MAX_PER_BUCKET)
    }

    pub fn with_bucket_size(persistence: Box<dyn ScorePersistence>, max_per_bucket: usize) -> Self {
        let mut store = Self {
            entries: persistence.load(),
            max_per_bucket,
            persistence,
        };
        store.normalize();
        store
    }

    pub fn from_config(persistence: Box<dyn ScorePersistence>, config: &HighScoreConfig) -> Self {
        Self::with_bucket_size(persistence, config.max_per_bucket)
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(NoPersistence))
    }

    pub fn add(&mut self, entry: HighScoreEntry) {
        self.entries.push(entry);
        self.normalize();
        self.persistence.save(&self.entries);
    }

    /// Re-sorts everything by score (stable, so equal scores keep insertion
    /// order) and keeps the first `max_per_bucket` entries of every
    /// (mode, difficulty) bucket.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score().cmp(&a.score()));

        let mut counts: HashMap<(MatchMode, Difficulty), usize> = HashMap::new();
        let max_per_bucket = self.max_per_bucket;
        self.entries.retain(|entry| {
            let count = counts.entry(entry.bucket()).or_insert(0);
            if *count < max_per_bucket {
                *count += 1;
                true
            } else {
                false
            }
        });
    }

    pub fn query(&self, mode: MatchMode, difficulty: Difficulty) -> Vec<HighScoreEntry> {
        let mut bucket: Vec<HighScoreEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.bucket() == (mode, difficulty))
            .cloned()
            .collect();
        bucket.sort_by(|a, b| b.score().cmp(&a.score()));
        bucket
    }

    pub fn top_score(&self, mode: MatchMode, difficulty: Difficulty) -> Option<u32> {
        self.query(mode, difficulty).first().map(HighScoreEntry::score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persistence.save(&self.entries);
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
