use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::game_state::{GameSession, GameSnapshot};
use super::scoring::ScoreBreakdown;
use super::types::{
    Difficulty, FlipOutcome, GameEvent, MATCH_REVEAL_DELAY_MS, MISMATCH_FLIP_BACK_DELAY_MS, MatchMode,
    PairOutcome, ResolutionTicket, TICK_INTERVAL_MS,
};
use crate::config::SessionConfig;
use crate::games::broadcaster::SessionBroadcaster;
use crate::identifiers::TileId;
use crate::log;
use crate::storage::{KeyValueStore, StorageManager};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTimings {
    pub tick_interval: Duration,
    pub match_delay: Duration,
    pub mismatch_delay: Duration,
}

impl SessionTimings {
    fn resolution_delay(&self, outcome: PairOutcome) -> Duration {
        match outcome {
            PairOutcome::Match => self.match_delay,
            PairOutcome::Mismatch => self.mismatch_delay,
        }
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            match_delay: Duration::from_millis(MATCH_REVEAL_DELAY_MS),
            mismatch_delay: Duration::from_millis(MISMATCH_FLIP_BACK_DELAY_MS),
        }
    }
}

impl From<&SessionConfig> for SessionTimings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            match_delay: Duration::from_millis(config.match_delay_ms),
            mismatch_delay: Duration::from_millis(config.mismatch_delay_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start { mode: MatchMode, difficulty: Difficulty },
    Flip(TileId),
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverNotification {
    pub won: bool,
    pub score: u32,
    pub moves: u32,
    pub time_remaining: u32,
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    pub breakdown: Option<ScoreBreakdown>,
}

#[derive(Clone)]
pub struct MemorySessionState {
    pub game: Arc<Mutex<GameSession>>,
    pub timings: SessionTimings,
}

impl MemorySessionState {
    pub fn new(game: GameSession, timings: SessionTimings) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            timings,
        }
    }
}

pub struct MemorySession;

impl MemorySession {
    /// Drives the session until the command channel closes. Returns the last
    /// game-over notification, if any game finished.
    pub async fn run<B: SessionBroadcaster, S: KeyValueStore>(
        state: &MemorySessionState,
        command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: &B,
        storage: &StorageManager<S>,
    ) -> Option<GameOverNotification> {
        let (resolution_tx, mut resolution_rx) = mpsc::unbounded_channel::<ResolutionTicket>();
        let period = state.timings.tick_interval;
        let mut tick_timer = interval_at(Instant::now() + period, period);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_game_over = None;

        loop {
            let update = tokio::select! {
                command = command_rx.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if let SessionCommand::Start { .. } = command {
                        tick_timer.reset();
                    }
                    Self::handle_command(state, command, &resolution_tx, storage).await
                }
                Some(ticket) = resolution_rx.recv() => {
                    let mut game = state.game.lock().await;
                    game.resolve(ticket).then(|| (game.snapshot(), Self::collect_game_over(&mut game)))
                }
                _ = tick_timer.tick() => {
                    let mut game = state.game.lock().await;
                    game.tick().then(|| (game.snapshot(), Self::collect_game_over(&mut game)))
                }
            };

            let Some((snapshot, game_over)) = update else {
                continue;
            };

            broadcaster.broadcast_state(snapshot).await;

            if let Some(notification) = game_over {
                Self::record_statistics(storage, &notification);
                broadcaster.broadcast_game_over(notification.clone()).await;
                last_game_over = Some(notification);
            }
        }

        last_game_over
    }

    async fn handle_command<S: KeyValueStore>(
        state: &MemorySessionState,
        command: SessionCommand,
        resolution_tx: &mpsc::UnboundedSender<ResolutionTicket>,
        storage: &StorageManager<S>,
    ) -> Option<(GameSnapshot, Option<GameOverNotification>)> {
        let mut game = state.game.lock().await;

        match command {
            SessionCommand::Start { mode, difficulty } => {
                if let Err(e) = game.start(mode, difficulty) {
                    log!("Cannot start {} / {}: {}", mode.name(), difficulty.name(), e);
                    return None;
                }
                if let Err(e) = storage.save_last_configuration(mode, difficulty) {
                    log!("Failed to save last configuration: {}", e);
                }
            }
            SessionCommand::Flip(tile_id) => match game.flip(tile_id) {
                FlipOutcome::Rejected(_) => return None,
                FlipOutcome::Revealed => {}
                FlipOutcome::ResolutionScheduled(ticket) => {
                    let delay = state.timings.resolution_delay(ticket.outcome);
                    let resolution_tx = resolution_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = resolution_tx.send(ticket);
                    });
                }
            },
            SessionCommand::Quit => game.quit(),
        }

        Some((game.snapshot(), Self::collect_game_over(&mut game)))
    }

    fn collect_game_over(game: &mut GameSession) -> Option<GameOverNotification> {
        let ended = game
            .take_events()
            .into_iter()
            .find_map(|event| match event {
                GameEvent::GameEnded { won, score } => Some((won, score)),
                _ => None,
            });

        ended.map(|(won, score)| GameOverNotification {
            won,
            score,
            moves: game.moves(),
            time_remaining: game.time_remaining(),
            mode: game.mode(),
            difficulty: game.difficulty(),
            breakdown: game.final_score(),
        })
    }

    fn record_statistics<S: KeyValueStore>(storage: &StorageManager<S>, notification: &GameOverNotification) {
        if let Err(e) = storage.increment_games_played() {
            log!("Failed to update games played: {}", e);
        }
        if notification.won
            && let Err(e) = storage.add_to_total_score(notification.score)
        {
            log!("Failed to update total score: {}", e);
        }
    }
}
