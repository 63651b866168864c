//! Live owner snapshots for subscribers
//!
//! Each owner with at least one subscriber has a watch channel holding its
//! latest full snapshot. The store publishes after every committed mutation;
//! subscribers re-run whatever aggregation they need over the new snapshot.
//! Snapshots published faster than a subscriber reads them coalesce into the
//! latest one.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::model::Owner;

/// Per-owner snapshot channels
#[derive(Debug, Default)]
pub struct SnapshotFeed {
    channels: Mutex<HashMap<String, watch::Sender<Owner>>>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `owner_id`, seeding the channel with `current` when nobody
    /// else is listening
    pub fn subscribe(&self, owner_id: &str, current: Owner) -> Subscription {
        let mut channels = self.lock();

        let rx = match channels.get(owner_id) {
            Some(tx) if tx.receiver_count() > 0 => tx.subscribe(),
            _ => {
                let (tx, rx) = watch::channel(current);
                channels.insert(owner_id.to_string(), tx);
                rx
            }
        };
        debug!("Subscribed to owner '{}'", owner_id);

        Subscription::new(owner_id, rx)
    }

    /// Send a fresh snapshot to every subscriber of `owner_id`.
    ///
    /// Returns false (and forgets the channel) when nobody is listening.
    pub fn publish(&self, owner_id: &str, snapshot: Owner) -> bool {
        let mut channels = self.lock();

        match channels.get(owner_id) {
            Some(tx) if tx.receiver_count() > 0 => {
                tx.send_replace(snapshot);
                debug!("Published snapshot for owner '{}'", owner_id);
                true
            }
            Some(_) => {
                channels.remove(owner_id);
                false
            }
            None => false,
        }
    }

    pub fn has_subscribers(&self, owner_id: &str) -> bool {
        self.lock()
            .get(owner_id)
            .is_some_and(|tx| tx.receiver_count() > 0)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, watch::Sender<Owner>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live view of one owner's data. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    owner_id: String,
    rx: watch::Receiver<Owner>,
}

impl Subscription {
    fn new(owner_id: &str, mut rx: watch::Receiver<Owner>) -> Self {
        // The first `next_snapshot` yields the current value without waiting
        rx.mark_changed();
        Self {
            owner_id: owner_id.to_string(),
            rx,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Latest snapshot, without waiting
    pub fn current(&self) -> Owner {
        self.rx.borrow().clone()
    }

    /// Wait for the next unseen snapshot; `None` once the feed is gone
    pub async fn next_snapshot(&mut self) -> Option<Owner> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {
        debug!("Unsubscribed from owner '{}'", self.owner_id);
    }
}

/// Run `on_snapshot` for the current snapshot and every later one, on a
/// background task
pub fn spawn_listener<F>(mut subscription: Subscription, mut on_snapshot: F) -> ListenerHandle
where
    F: FnMut(&Owner) + Send + 'static,
{
    let task = tokio::spawn(async move {
        while let Some(owner) = subscription.next_snapshot().await {
            on_snapshot(&owner);
        }
    });
    ListenerHandle { task }
}

/// Handle to a background listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn unsubscribe(self) {
        // Drop aborts the task
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
