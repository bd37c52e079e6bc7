//! Per-player mutation lanes.
//!
//! Each player id gets a lane (an async mutex) while at least one mutation
//! for it is queued or running. Lanes for different ids never block each
//! other. A lane is dropped from the map when its last user leaves.

use std::collections::HashMap;
use std::sync::Arc;

use courtside_protocol::PlayerId;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Lane = Arc<AsyncMutex<()>>;

#[derive(Debug, Default)]
pub(crate) struct MutationQueue {
    lanes: Mutex<HashMap<PlayerId, Lane>>,
}

/// Exclusive turn on one player's lane. Released on drop.
pub(crate) struct Turn<'a> {
    queue: &'a MutationQueue,
    player_id: PlayerId,
    lane: Lane,
    guard: Option<OwnedMutexGuard<()>>,
}

impl MutationQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until every earlier mutation of `player_id` has finished.
    pub(crate) async fn enter(&self, player_id: PlayerId) -> Turn<'_> {
        let lane = Arc::clone(self.lanes.lock().entry(player_id).or_default());
        let guard = Arc::clone(&lane).lock_owned().await;
        Turn {
            queue: self,
            player_id,
            lane,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn lane_count(&self) -> usize {
        self.lanes.lock().len()
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut lanes = self.queue.lanes.lock();
        // One reference in the map, one here: nobody else is waiting.
        if Arc::strong_count(&self.lane) == 2 {
            lanes.remove(&self.player_id);
        }
    }
}
