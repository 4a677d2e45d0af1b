use std::future::Future;

use super::snake::{GameOver, Snapshot};

/// Receives what the session actor produces. Rendering lives behind this seam.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: Snapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        game_over: GameOver,
        snapshot: Snapshot,
    ) -> impl Future<Output = ()> + Send;
}
