//! Store change notifications
//!
//! Every store mutation is broadcast as a [`StoreEvent`]. Front-ends treat an
//! event as "something changed" and re-read a snapshot; lagging or absent
//! subscribers never block the writer.
//!
//! ```no_run
//! use libreadiego::service::events::{EventBus, StoreEvent};
//!
//! # async fn example() {
//! let bus = EventBus::new(100);
//! let mut events = bus.subscribe();
//!
//! bus.emit(StoreEvent::LoadingChanged { loading: true });
//! assert_eq!(events.recv().await.ok(), Some(StoreEvent::LoadingChanged { loading: true }));
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<StoreEvent>;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// `capacity` events are buffered per subscriber before a lagging one
    /// starts losing the oldest
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Broadcast without blocking; with no subscribers the event is dropped
    pub fn emit(&self, event: StoreEvent) {
        tracing::trace!(?event, "Store changed");
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Which part of the result store changed
///
/// Events carry just enough to log or to decide whether a redraw is needed;
/// the data itself is read back through a store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The loading flag flipped
    LoadingChanged { loading: bool },

    /// Statistics were replaced wholesale
    StatisticsReplaced,

    /// The recommendation/similarity slot was replaced
    RecommendationsReplaced { count: usize },

    /// The user-book slot was replaced
    UserBooksReplaced { count: usize },

    /// A user-facing error message was recorded
    ErrorRecorded { message: String },

    /// The recorded error was cleared
    ErrorCleared,
}
