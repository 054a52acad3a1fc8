//! Fan-out of "state changed" signals to connected clients.
//!
//! Signals carry no payload: a client that receives one re-fetches whatever it
//! displays. There is no backlog, so a client that connects later must fetch
//! current state itself.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered signals per subscriber before it starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Event pushed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// Roster state changed; re-fetch.
    Update,
}

/// Broadcasts [`ChangeEvent`]s to every current subscriber.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal that roster state changed. Never blocks and never fails;
    /// having no subscribers is normal.
    pub fn notify(&self) {
        match self.tx.send(ChangeEvent::Update) {
            Ok(receivers) => tracing::debug!(receivers, "Broadcast update"),
            Err(_) => tracing::trace!("No subscribers for update"),
        }
    }

    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end held by one connected client.
pub struct ChangeSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    /// Wait for the next signal. Returns `None` once the notifier is gone.
    ///
    /// A subscriber that fell behind still gets one `Update`, since missed
    /// signals all mean the same thing.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Subscriber lagged, collapsing updates");
                Some(ChangeEvent::Update)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). Returns `None` when
    /// nothing is pending.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => Some(ChangeEvent::Update),
            Err(_) => None,
        }
    }
}
