use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::palette::TileColor;
use crate::identifiers::TileId;

pub const TICK_INTERVAL_MS: u64 = 1000;
pub const MATCH_REVEAL_DELAY_MS: u64 = 500;
pub const MISMATCH_FLIP_BACK_DELAY_MS: u64 = 1000;
pub const MATCH_POINTS: u32 = 100;
pub const MAX_PENDING_TILES: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Complex")]
    Complex,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Complex];

    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Complex => 7,
        }
    }

    pub fn pairs_count(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 12,
            Difficulty::Complex => 24,
        }
    }

    pub fn time_limit_seconds(self) -> u32 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 90,
            Difficulty::Complex => 120,
        }
    }

    pub fn layout(self) -> BoardLayout {
        BoardLayout {
            grid_size: self.grid_size(),
            pairs_count: self.pairs_count(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Complex => "Complex",
        }
    }

    pub fn description(self) -> String {
        let size = self.grid_size();
        format!(
            "{}x{} grid • {} pairs • {} seconds",
            size,
            size,
            self.pairs_count(),
            self.time_limit_seconds()
        )
    }

    pub fn icon(self) -> &'static str {
        match self {
            Difficulty::Easy => "⭐",
            Difficulty::Medium => "⭐⭐",
            Difficulty::Complex => "⭐⭐⭐",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MatchMode {
    #[serde(rename = "Color Match")]
    ColorOnly,
    #[serde(rename = "Shape Match")]
    ShapeOnly,
    #[serde(rename = "Combo Match")]
    ColorAndShape,
}

impl MatchMode {
    pub const ALL: [MatchMode; 3] = [MatchMode::ColorOnly, MatchMode::ShapeOnly, MatchMode::ColorAndShape];

    pub fn name(self) -> &'static str {
        match self {
            MatchMode::ColorOnly => "Color Match",
            MatchMode::ShapeOnly => "Shape Match",
            MatchMode::ColorAndShape => "Combo Match",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MatchMode::ColorOnly => "Match tiles by color only",
            MatchMode::ShapeOnly => "Match tiles by shape only",
            MatchMode::ColorAndShape => "Match both color AND shape",
        }
    }
}

/// Grid dimensions handed to the deck generator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BoardLayout {
    pub grid_size: usize,
    pub pairs_count: usize,
}

impl BoardLayout {
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
    Heart,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Diamond,
        Shape::Pentagon,
        Shape::Hexagon,
        Shape::Star,
        Shape::Heart,
    ];
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PairId(u32);

impl PairId {
    /// Shared by every filler tile; never forms a pair.
    pub const FILLER: PairId = PairId(u32::MAX);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn is_filler(self) -> bool {
        self == Self::FILLER
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub shape: Shape,
    pub color: TileColor,
    pub pair_id: PairId,
    pub flipped: bool,
    pub matched: bool,
}

impl Tile {
    pub fn new(id: TileId, shape: Shape, color: TileColor, pair_id: PairId) -> Self {
        Self {
            id,
            shape,
            color,
            pair_id,
            flipped: false,
            matched: false,
        }
    }

    pub fn filler(id: TileId) -> Self {
        Self {
            id,
            shape: Shape::Circle,
            color: TileColor::TRANSPARENT,
            pair_id: PairId::FILLER,
            flipped: false,
            matched: true,
        }
    }

    pub fn is_filler(&self) -> bool {
        self.pair_id.is_filler()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionPhase {
    Idle,
    Active,
    Resolving,
    Ended,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PairOutcome {
    Match,
    Mismatch,
}

impl PairOutcome {
    pub fn default_delay(self) -> Duration {
        match self {
            PairOutcome::Match => Duration::from_millis(MATCH_REVEAL_DELAY_MS),
            PairOutcome::Mismatch => Duration::from_millis(MISMATCH_FLIP_BACK_DELAY_MS),
        }
    }
}

/// Handle for a scheduled pair resolution. Only the ticket issued for the
/// current pending pair of the current epoch is honoured.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ResolutionTicket {
    pub epoch: u64,
    pub sequence: u64,
    pub outcome: PairOutcome,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RejectReason {
    NoActiveSession,
    GameOver,
    Resolving,
    UnknownTile,
    AlreadyFlipped,
    AlreadyMatched,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlipOutcome {
    Rejected(RejectReason),
    Revealed,
    ResolutionScheduled(ResolutionTicket),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SessionStarted {
        mode: MatchMode,
        difficulty: Difficulty,
        total_pairs: u32,
    },
    TileFlipped {
        tile_id: TileId,
    },
    ResolutionScheduled {
        ticket: ResolutionTicket,
    },
    PairMatched {
        first: TileId,
        second: TileId,
    },
    PairMismatched {
        first: TileId,
        second: TileId,
    },
    TimeChanged {
        time_remaining: u32,
    },
    GameEnded {
        won: bool,
        score: u32,
    },
    SessionQuit,
}
