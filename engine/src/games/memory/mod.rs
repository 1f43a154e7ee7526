mod deck;
mod game_state;
mod match_evaluator;
mod palette;
mod scoring;
mod session;
mod types;

pub use deck::{DeckError, TileDeckGenerator};
pub use game_state::{GameSession, GameSnapshot};
pub use match_evaluator::matches;
pub use palette::{ColorPalette, TileColor};
pub use scoring::{ScoreBreakdown, ScoreInput, calculate_score, score_multiplier};
pub use session::{GameOverNotification, MemorySession, MemorySessionState, SessionCommand, SessionTimings};
pub use types::{
    BoardLayout, Difficulty, FlipOutcome, GameEvent, MatchMode, PairId, PairOutcome, RejectReason,
    ResolutionTicket, SessionPhase, Shape, Tile, MATCH_REVEAL_DELAY_MS, MISMATCH_FLIP_BACK_DELAY_MS,
    TICK_INTERVAL_MS,
};
