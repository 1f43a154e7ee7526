//! Final score for a finished session.
//!
//! `(matched * 100 + time_remaining * 10 + max(0, total * 3 - moves) * 5) * multiplier`,
//! floored. The difficulty multiplier (1.0 / 1.5 / 2.0) is applied as an exact
//! ratio so identical inputs always produce identical scores.

use super::types::{Difficulty, MATCH_POINTS};

pub const TIME_BONUS_PER_SECOND: u32 = 10;
pub const MOVE_EFFICIENCY_POINTS: u32 = 5;
pub const MOVE_ALLOWANCE_PER_PAIR: u32 = 3;
const MULTIPLIER_DENOMINATOR: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub moves: u32,
    pub time_remaining: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub match_score: u32,
    pub time_bonus: u32,
    pub move_efficiency: u32,
    /// Sum of the parts after the difficulty multiplier.
    pub total: u32,
}

fn multiplier_numerator(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 2,
        Difficulty::Medium => 3,
        Difficulty::Complex => 4,
    }
}

pub fn score_multiplier(difficulty: Difficulty) -> f64 {
    multiplier_numerator(difficulty) as f64 / MULTIPLIER_DENOMINATOR as f64
}

pub fn calculate_score(input: ScoreInput) -> ScoreBreakdown {
    let match_score = input.matched_pairs.saturating_mul(MATCH_POINTS);
    let time_bonus = input.time_remaining.saturating_mul(TIME_BONUS_PER_SECOND);
    let move_efficiency = input
        .total_pairs
        .saturating_mul(MOVE_ALLOWANCE_PER_PAIR)
        .saturating_sub(input.moves)
        .saturating_mul(MOVE_EFFICIENCY_POINTS);

    let base = match_score as u64 + time_bonus as u64 + move_efficiency as u64;
    let scaled = base * multiplier_numerator(input.difficulty) / MULTIPLIER_DENOMINATOR;

    ScoreBreakdown {
        match_score,
        time_bonus,
        move_efficiency,
        total: u32::try_from(scaled).unwrap_or(u32::MAX),
    }
}
