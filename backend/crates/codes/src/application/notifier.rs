//! Leaderboard Notifier
//!
//! Concurrent registry of live leaderboard subscribers. Each subscriber
//! owns an unbounded channel drained by its own socket writer task, so a
//! slow connection never stalls delivery to the others. Broadcast
//! serializes the snapshot once and clones the same bytes to everyone;
//! a failed send means the subscriber is gone and it is evicted on the
//! spot. Nothing here returns an error to the redeem path.

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A registered subscriber's receiving half
pub struct Subscription {
    pub id: Uuid,
    pub receiver: mpsc::UnboundedReceiver<String>,
}

/// Registry of live leaderboard subscribers
pub struct LeaderboardNotifier {
    connections: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl LeaderboardNotifier {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new subscriber under a fresh connection id
    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connections.insert(id, sender);

        tracing::debug!(%id, total = self.connections.len(), "Leaderboard subscriber joined");
        Subscription { id, receiver }
    }

    /// Drop a subscriber; safe to call twice
    pub fn unsubscribe(&self, id: Uuid) {
        if self.connections.remove(&id).is_some() {
            tracing::debug!(%id, total = self.connections.len(), "Leaderboard subscriber left");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.connections.len()
    }

    /// Push one snapshot to every live subscriber, evicting dead ones.
    /// Returns how many subscribers were reached.
    pub fn broadcast<T: Serialize>(&self, snapshot: &T) -> usize {
        let payload = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize leaderboard snapshot");
                return 0;
            }
        };

        // Collect eviction candidates first; removing mid-iteration
        // could contend on the same shard
        let mut dead = Vec::new();
        let mut delivered = 0usize;

        for entry in self.connections.iter() {
            if entry.value().send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*entry.key());
            }
        }

        for id in dead {
            self.connections.remove(&id);
            tracing::debug!(%id, "Evicted dead leaderboard subscriber");
        }

        tracing::debug!(delivered, "Leaderboard snapshot broadcast");
        delivered
    }
}

impl Default for LeaderboardNotifier {
    fn default() -> Self {
        Self::new()
    }
}
