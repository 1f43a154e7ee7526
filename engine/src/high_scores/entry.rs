use serde::{Deserialize, Serialize};

use crate::games::memory::{Difficulty, MatchMode};
use crate::id_generator::generate_entry_id;
use crate::identifiers::EntryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    id: EntryId,
    score: u32,
    mode: MatchMode,
    difficulty: Difficulty,
    timestamp_ms: i64,
    moves: u32,
    time_remaining: u32,
}

impl HighScoreEntry {
    pub fn new(score: u32, mode: MatchMode, difficulty: Difficulty, moves: u32, time_remaining: u32) -> Self {
        Self {
            id: generate_entry_id(),
            score,
            mode,
            difficulty,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            moves,
            time_remaining,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn bucket(&self) -> (MatchMode, Difficulty) {
        (self.mode, self.difficulty)
    }
}
