use std::future::Future;

use crate::games::memory::{GameOverNotification, GameSnapshot};

/// Presentation side of a running session.
pub trait SessionBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, notification: GameOverNotification) -> impl Future<Output = ()> + Send;
}
