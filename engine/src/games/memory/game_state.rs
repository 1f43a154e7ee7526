use std::sync::Arc;

use super::deck::{DeckError, TileDeckGenerator};
use super::match_evaluator::matches;
use super::scoring::{ScoreBreakdown, ScoreInput, calculate_score};
use super::types::{
    Difficulty, FlipOutcome, GameEvent, MATCH_POINTS, MAX_PENDING_TILES, MatchMode, PairOutcome,
    RejectReason, ResolutionTicket, SessionPhase, Tile,
};
use crate::feedback::{FeedbackEvent, FeedbackSink};
use crate::games::session_rng::SessionRng;
use crate::high_scores::{HighScoreEntry, HighScoreStore};
use crate::identifiers::TileId;
use crate::log;

/// Read-only view of a session handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: SessionPhase,
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    pub score: u32,
    pub moves: u32,
    pub time_remaining: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub is_over: bool,
    pub is_won: bool,
    pub tiles: Vec<Tile>,
    pub pending: Vec<TileId>,
}

pub struct GameSession {
    generator: TileDeckGenerator,
    rng: SessionRng,
    high_scores: HighScoreStore,
    feedback: Arc<dyn FeedbackSink>,
    phase: SessionPhase,
    mode: MatchMode,
    difficulty: Difficulty,
    tiles: Vec<Tile>,
    pending: Vec<TileId>,
    pending_resolution: Option<ResolutionTicket>,
    score: u32,
    moves: u32,
    time_remaining: u32,
    matched_pairs: u32,
    total_pairs: u32,
    won: bool,
    final_score: Option<ScoreBreakdown>,
    epoch: u64,
    sequence: u64,
    pending_events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(rng: SessionRng, high_scores: HighScoreStore, feedback: Arc<dyn FeedbackSink>) -> Self {
        Self {
            generator: TileDeckGenerator::default(),
            rng,
            high_scores,
            feedback,
            phase: SessionPhase::Idle,
            mode: MatchMode::ColorOnly,
            difficulty: Difficulty::Easy,
            tiles: Vec::new(),
            pending: Vec::with_capacity(MAX_PENDING_TILES),
            pending_resolution: None,
            score: 0,
            moves: 0,
            time_remaining: 0,
            matched_pairs: 0,
            total_pairs: 0,
            won: false,
            final_score: None,
            epoch: 0,
            sequence: 0,
            pending_events: Vec::new(),
        }
    }

    pub fn with_generator(mut self, generator: TileDeckGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Deals a fresh deck and arms the timer. Any previous session, including
    /// a resolution still in flight, is abandoned.
    pub fn start(&mut self, mode: MatchMode, difficulty: Difficulty) -> Result<(), DeckError> {
        let tiles = self.generator.generate(difficulty.layout(), &mut self.rng)?;

        self.epoch += 1;
        self.sequence = 0;
        self.mode = mode;
        self.difficulty = difficulty;
        self.tiles = tiles;
        self.pending.clear();
        self.pending_resolution = None;
        self.score = 0;
        self.moves = 0;
        self.time_remaining = difficulty.time_limit_seconds();
        self.matched_pairs = 0;
        self.total_pairs = difficulty.pairs_count() as u32;
        self.won = false;
        self.final_score = None;
        self.phase = SessionPhase::Active;
        self.feedback.notify(FeedbackEvent::Click);

        self.pending_events.push(GameEvent::SessionStarted {
            mode,
            difficulty,
            total_pairs: self.total_pairs,
        });

        log!(
            "Session {} started: {} / {} (seed {})",
            self.epoch,
            mode.name(),
            difficulty.name(),
            self.rng.seed()
        );

        Ok(())
    }

    pub fn flip(&mut self, tile_id: TileId) -> FlipOutcome {
        match self.phase {
            SessionPhase::Idle => return FlipOutcome::Rejected(RejectReason::NoActiveSession),
            SessionPhase::Ended => return FlipOutcome::Rejected(RejectReason::GameOver),
            SessionPhase::Resolving => return FlipOutcome::Rejected(RejectReason::Resolving),
            SessionPhase::Active => {}
        }

        let Some(tile) = self.tiles.iter_mut().find(|tile| tile.id == tile_id) else {
            return FlipOutcome::Rejected(RejectReason::UnknownTile);
        };
        if tile.matched {
            return FlipOutcome::Rejected(RejectReason::AlreadyMatched);
        }
        if tile.flipped {
            return FlipOutcome::Rejected(RejectReason::AlreadyFlipped);
        }

        tile.flipped = true;
        self.pending.push(tile_id);
        self.pending_events.push(GameEvent::TileFlipped { tile_id });
        self.feedback.notify(FeedbackEvent::Flip);

        if self.pending.len() < MAX_PENDING_TILES {
            return FlipOutcome::Revealed;
        }

        self.moves += 1;
        self.phase = SessionPhase::Resolving;

        let outcome = match (self.tile(self.pending[0]), self.tile(self.pending[1])) {
            (Some(first), Some(second)) if matches(first, second, self.mode) => PairOutcome::Match,
            _ => PairOutcome::Mismatch,
        };

        self.sequence += 1;
        let ticket = ResolutionTicket {
            epoch: self.epoch,
            sequence: self.sequence,
            outcome,
        };
        self.pending_resolution = Some(ticket);
        self.pending_events.push(GameEvent::ResolutionScheduled { ticket });

        FlipOutcome::ResolutionScheduled(ticket)
    }

    /// Applies a scheduled resolution. Returns `false` without touching state
    /// when the ticket no longer belongs to the pending pair of this session.
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> bool {
        if self.phase != SessionPhase::Resolving || self.pending_resolution != Some(ticket) {
            return false;
        }
        self.pending_resolution = None;

        let pair: Vec<TileId> = self.pending.drain(..).collect();
        let (first, second) = (pair[0], pair[1]);

        match ticket.outcome {
            PairOutcome::Match => {
                for tile in self.tiles.iter_mut().filter(|tile| pair.contains(&tile.id)) {
                    tile.matched = true;
                }
                self.matched_pairs += 1;
                self.score += MATCH_POINTS;
                self.phase = SessionPhase::Active;
                self.pending_events.push(GameEvent::PairMatched { first, second });
                self.feedback.notify(FeedbackEvent::Match);

                if self.matched_pairs >= self.total_pairs {
                    self.end(true);
                }
            }
            PairOutcome::Mismatch => {
                for tile in self.tiles.iter_mut().filter(|tile| pair.contains(&tile.id)) {
                    tile.flipped = false;
                }
                self.phase = SessionPhase::Active;
                self.pending_events.push(GameEvent::PairMismatched { first, second });
            }
        }

        true
    }

    /// One elapsed second. The clock keeps running while a pair is resolving.
    pub fn tick(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Active | SessionPhase::Resolving) {
            return false;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.pending_events.push(GameEvent::TimeChanged {
            time_remaining: self.time_remaining,
        });

        if self.time_remaining == 0 && self.matched_pairs < self.total_pairs {
            self.end(false);
        }

        true
    }

    pub fn quit(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }

        log!("Session {} quit in phase {:?}", self.epoch, self.phase);
        self.feedback.notify(FeedbackEvent::Click);

        self.epoch += 1;
        self.phase = SessionPhase::Idle;
        self.tiles.clear();
        self.pending.clear();
        self.pending_resolution = None;
        self.score = 0;
        self.moves = 0;
        self.time_remaining = 0;
        self.matched_pairs = 0;
        self.total_pairs = 0;
        self.won = false;
        self.final_score = None;
        self.pending_events.push(GameEvent::SessionQuit);
    }

    fn end(&mut self, won: bool) {
        self.phase = SessionPhase::Ended;
        self.won = won;
        self.pending.clear();
        self.pending_resolution = None;

        if won {
            let breakdown = calculate_score(ScoreInput {
                matched_pairs: self.matched_pairs,
                total_pairs: self.total_pairs,
                moves: self.moves,
                time_remaining: self.time_remaining,
                difficulty: self.difficulty,
            });
            self.score = breakdown.total;
            self.final_score = Some(breakdown);
            self.high_scores.add(HighScoreEntry::new(
                self.score,
                self.mode,
                self.difficulty,
                self.moves,
                self.time_remaining,
            ));
            self.feedback.notify(FeedbackEvent::Win);
        } else {
            self.feedback.notify(FeedbackEvent::Lose);
        }

        self.pending_events.push(GameEvent::GameEnded {
            won,
            score: self.score,
        });

        log!(
            "Session {} ended: won={} score={} moves={} time_remaining={}",
            self.epoch,
            won,
            self.score,
            self.moves,
            self.time_remaining
        );
    }

    fn tile(&self, tile_id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == tile_id)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            mode: self.mode,
            difficulty: self.difficulty,
            score: self.score,
            moves: self.moves,
            time_remaining: self.time_remaining,
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs,
            is_over: self.phase == SessionPhase::Ended,
            is_won: self.won,
            tiles: self.tiles.clone(),
            pending: self.pending.clone(),
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn final_score(&self) -> Option<ScoreBreakdown> {
        self.final_score
    }

    pub fn high_scores(&self) -> &HighScoreStore {
        &self.high_scores
    }

    pub fn high_scores_mut(&mut self) -> &mut HighScoreStore {
        &mut self.high_scores
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::feedback::NoFeedback;

    #[derive(Default)]
    struct RecordingFeedback {
        events: Mutex<Vec<FeedbackEvent>>,
    }

    impl FeedbackSink for RecordingFeedback {
        fn notify(&self, event: FeedbackEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn create_session() -> GameSession {
        GameSession::new(SessionRng::new(12345), HighScoreStore::in_memory(), Arc::new(NoFeedback))
    }

    fn started(difficulty: Difficulty) -> GameSession {
        let mut session = create_session();
        session.start(MatchMode::ColorAndShape, difficulty).unwrap();
        session
    }

    fn unmatched_pairs(session: &GameSession) -> Vec<(TileId, TileId)> {
        let playable: Vec<&Tile> = session.tiles().iter().filter(|t| !t.matched).collect();
        let mut pairs = Vec::new();
        for (i, first) in playable.iter().enumerate() {
            if let Some(second) = playable[i + 1..].iter().find(|t| t.pair_id == first.pair_id) {
                pairs.push((first.id, second.id));
            }
        }
        pairs
    }

    fn find_pair(session: &GameSession) -> (TileId, TileId) {
        unmatched_pairs(session)[0]
    }

    fn find_mismatch(session: &GameSession) -> (TileId, TileId) {
        let pairs = unmatched_pairs(session);
        (pairs[0].0, pairs[1].0)
    }

    fn play_pair(session: &mut GameSession, pair: (TileId, TileId)) -> ResolutionTicket {
        session.flip(pair.0);
        match session.flip(pair.1) {
            FlipOutcome::ResolutionScheduled(ticket) => ticket,
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    fn win(session: &mut GameSession) {
        while session.phase() == SessionPhase::Active {
            let pair = find_pair(session);
            let ticket = play_pair(session, pair);
            assert!(session.resolve(ticket));
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = create_session();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.tiles().is_empty());
    }

    #[test]
    fn test_start_easy_deals_nine_tiles() {
        let session = started(Difficulty::Easy);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.tiles.len(), 9);
        assert_eq!(snapshot.tiles.iter().filter(|t| t.is_filler()).count(), 1);
        assert_eq!(snapshot.total_pairs, 4);
        assert_eq!(snapshot.time_remaining, 60);
        assert_eq!(snapshot.moves, 0);
    }

    #[test]
    fn test_flip_before_start_rejected() {
        let mut session = create_session();

        let outcome = session.flip(TileId::new(0));

        assert_eq!(outcome, FlipOutcome::Rejected(RejectReason::NoActiveSession));
    }

    #[test]
    fn test_matching_pair_resolves_to_matched() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);

        assert_eq!(session.flip(pair.0), FlipOutcome::Revealed);
        let ticket = match session.flip(pair.1) {
            FlipOutcome::ResolutionScheduled(ticket) => ticket,
            other => panic!("unexpected {:?}", other),
        };

        assert_eq!(ticket.outcome, PairOutcome::Match);
        assert_eq!(session.phase(), SessionPhase::Resolving);
        assert_eq!(session.moves(), 1);

        assert!(session.resolve(ticket));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.matched_pairs, 1);
        assert_eq!(snapshot.moves, 1);
        assert_eq!(snapshot.score, MATCH_POINTS);
        assert!(snapshot.pending.is_empty());
        assert!(snapshot.tiles.iter().filter(|t| t.id == pair.0 || t.id == pair.1).all(|t| t.matched));
    }

    #[test]
    fn test_mismatch_flips_tiles_back() {
        let mut session = started(Difficulty::Medium);
        let (first, second) = find_mismatch(&session);

        let ticket = play_pair(&mut session, (first, second));
        assert_eq!(ticket.outcome, PairOutcome::Mismatch);
        assert!(session.resolve(ticket));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.moves, 1);
        assert_eq!(snapshot.matched_pairs, 0);
        assert!(snapshot.pending.is_empty());
        assert!(snapshot.tiles.iter().filter(|t| t.id == first || t.id == second).all(|t| !t.flipped));
    }

    #[test]
    fn test_flip_while_resolving_rejected() {
        let mut session = started(Difficulty::Medium);
        let pairs = unmatched_pairs(&session);
        play_pair(&mut session, pairs[0]);

        let outcome = session.flip(pairs[1].0);

        assert_eq!(outcome, FlipOutcome::Rejected(RejectReason::Resolving));
        assert_eq!(session.snapshot().pending.len(), 2);
        assert!(!session.tiles().iter().find(|t| t.id == pairs[1].0).unwrap().flipped);
    }

    #[test]
    fn test_same_tile_twice_rejected() {
        let mut session = started(Difficulty::Easy);
        let (first, _) = find_pair(&session);
        session.flip(first);
        let before = session.snapshot();

        let outcome = session.flip(first);

        assert_eq!(outcome, FlipOutcome::Rejected(RejectReason::AlreadyFlipped));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_filler_and_unknown_tiles_rejected() {
        let mut session = started(Difficulty::Easy);
        let filler = session.tiles().iter().find(|t| t.is_filler()).unwrap().id;
        let before = session.snapshot();

        assert_eq!(session.flip(filler), FlipOutcome::Rejected(RejectReason::AlreadyMatched));
        assert_eq!(session.flip(TileId::new(999)), FlipOutcome::Rejected(RejectReason::UnknownTile));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_matched_tile_rejected() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);
        let ticket = play_pair(&mut session, pair);
        session.resolve(ticket);

        assert_eq!(session.flip(pair.0), FlipOutcome::Rejected(RejectReason::AlreadyMatched));
    }

    #[test]
    fn test_win_ends_once_and_records_score() {
        let mut session = started(Difficulty::Easy);

        win(&mut session);

        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(session.is_won());
        // 400 + 60 * 10 + (12 - 4) * 5
        assert_eq!(session.score(), 1040);
        assert_eq!(session.final_score().map(|b| b.total), Some(1040));

        let ended: Vec<GameEvent> = session
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameEnded { .. }))
            .collect();
        assert_eq!(ended, vec![GameEvent::GameEnded { won: true, score: 1040 }]);

        let entries = session.high_scores().query(MatchMode::ColorAndShape, Difficulty::Easy);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score(), 1040);
        assert_eq!(entries[0].moves(), 4);
    }

    #[test]
    fn test_flip_and_tick_after_end_are_noops() {
        let mut session = started(Difficulty::Easy);
        win(&mut session);
        session.take_events();
        let before = session.snapshot();

        assert_eq!(session.flip(TileId::new(0)), FlipOutcome::Rejected(RejectReason::GameOver));
        assert!(!session.tick());
        assert_eq!(session.snapshot(), before);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_timeout_ends_lost_without_high_score() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);
        let ticket = play_pair(&mut session, pair);
        session.resolve(ticket);

        for _ in 0..59 {
            session.tick();
        }
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.time_remaining(), 1);

        session.tick();

        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(!session.is_won());
        assert_eq!(session.score(), MATCH_POINTS);
        assert!(session.final_score().is_none());
        assert!(session.high_scores().is_empty());
    }

    #[test]
    fn test_timeout_while_resolving_discards_resolution() {
        let mut session = started(Difficulty::Easy);
        for _ in 0..59 {
            session.tick();
        }
        let pair = find_pair(&session);
        let ticket = play_pair(&mut session, pair);

        session.tick();

        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(!session.resolve(ticket));
        assert_eq!(session.matched_pairs(), 0);
    }

    #[test]
    fn test_stale_ticket_after_restart_is_ignored() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);
        let stale = play_pair(&mut session, pair);

        session.quit();
        session.start(MatchMode::ColorAndShape, Difficulty::Easy).unwrap();
        let pair = find_pair(&session);
        let fresh = play_pair(&mut session, pair);
        let before = session.snapshot();

        assert_ne!(stale.epoch, fresh.epoch);
        assert!(!session.resolve(stale));
        assert_eq!(session.snapshot(), before);
        assert!(session.resolve(fresh));
    }

    #[test]
    fn test_restart_without_quit_also_invalidates() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);
        let stale = play_pair(&mut session, pair);

        session.start(MatchMode::ShapeOnly, Difficulty::Medium).unwrap();

        assert!(!session.resolve(stale));
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.matched_pairs(), 0);
    }

    #[test]
    fn test_ticket_applies_only_once() {
        let mut session = started(Difficulty::Medium);
        let pair = find_mismatch(&session);
        let first = play_pair(&mut session, pair);
        assert!(session.resolve(first));
        let pair = find_pair(&session);
        let second = play_pair(&mut session, pair);

        assert!(!session.resolve(first));
        assert_eq!(session.phase(), SessionPhase::Resolving);
        assert!(session.resolve(second));
    }

    #[test]
    fn test_quit_returns_to_idle() {
        let mut session = started(Difficulty::Complex);

        session.quit();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.tiles().is_empty());
        assert!(!session.tick());
        assert_eq!(session.flip(TileId::new(0)), FlipOutcome::Rejected(RejectReason::NoActiveSession));
    }

    #[test]
    fn test_deck_error_reported_at_start() {
        let palette = crate::games::memory::ColorPalette::new(Vec::new());
        let mut session = create_session().with_generator(TileDeckGenerator::new(palette));

        let result = session.start(MatchMode::ColorOnly, Difficulty::Easy);

        assert!(matches!(result, Err(DeckError::PaletteTooSmall { required: 4, available: 0 })));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_events_drained_by_take() {
        let mut session = started(Difficulty::Easy);
        let pair = find_pair(&session);
        let ticket = play_pair(&mut session, pair);
        session.resolve(ticket);

        let events = session.take_events();

        assert!(matches!(events[0], GameEvent::SessionStarted { total_pairs: 4, .. }));
        assert!(events.contains(&GameEvent::TileFlipped { tile_id: pair.0 }));
        assert!(events.contains(&GameEvent::ResolutionScheduled { ticket }));
        assert!(events.contains(&GameEvent::PairMatched { first: pair.0, second: pair.1 }));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_feedback_notified() {
        let feedback = Arc::new(RecordingFeedback::default());
        let mut session = GameSession::new(SessionRng::new(1), HighScoreStore::in_memory(), feedback.clone());
        session.start(MatchMode::ColorOnly, Difficulty::Easy).unwrap();

        win(&mut session);

        let events = feedback.events.lock().unwrap();
        assert_eq!(events.first(), Some(&FeedbackEvent::Click));
        assert_eq!(events.iter().filter(|e| **e == FeedbackEvent::Flip).count(), 8);
        assert_eq!(events.iter().filter(|e| **e == FeedbackEvent::Match).count(), 4);
        assert_eq!(events.last(), Some(&FeedbackEvent::Win));
    }
}
