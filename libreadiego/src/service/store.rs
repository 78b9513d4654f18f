//! Result store
//!
//! Single source of truth for one session: statistics, the current
//! recommendation list, the current user-book list, the loading flag and the
//! last error message. Anyone may read a snapshot or subscribe to changes;
//! only the query controller (same crate) may write.

use std::sync::{Arc, Mutex, MutexGuard};

use super::events::{EventBus, EventReceiver, StoreEvent};
use crate::types::{
    RecommendationItem, RequestOutcome, RequestStatus, Statistics, UserBookItem,
};

/// Point-in-time copy of the store contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub statistics: Option<Statistics>,
    /// Shared by user recommendations and similar books
    pub recommendations: Vec<RecommendationItem>,
    pub user_books: Vec<UserBookItem>,
    pub loading: bool,
    pub error: Option<String>,
    /// Number of requests that have settled this session
    pub settled: u64,
}

impl StoreSnapshot {
    /// Derive the process-wide request outcome
    pub fn outcome(&self) -> RequestOutcome {
        let status = if self.loading {
            RequestStatus::Loading
        } else if self.error.is_some() {
            RequestStatus::Error
        } else if self.settled > 0 {
            RequestStatus::Success
        } else {
            RequestStatus::Idle
        };

        RequestOutcome {
            status,
            message: self.error.clone(),
        }
    }
}

/// Shared, observable container; clones refer to the same store
#[derive(Clone)]
pub struct ResultStore {
    state: Arc<Mutex<StoreSnapshot>>,
    events: EventBus,
}

impl ResultStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreSnapshot::default())),
            events,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().clone()
    }

    pub fn statistics(&self) -> Option<Statistics> {
        self.lock().statistics.clone()
    }

    pub fn recommendations(&self) -> Vec<RecommendationItem> {
        self.lock().recommendations.clone()
    }

    pub fn user_books(&self) -> Vec<UserBookItem> {
        self.lock().user_books.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn outcome(&self) -> RequestOutcome {
        self.lock().outcome()
    }

    /// Receive a [`StoreEvent`] for every mutation made after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    // Writers. Events are emitted after the lock is released.

    pub(crate) fn set_loading(&self, loading: bool) {
        let changed = {
            let mut state = self.lock();
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        };
        if changed {
            self.events.emit(StoreEvent::LoadingChanged { loading });
        }
    }

    pub(crate) fn replace_statistics(&self, statistics: Statistics) {
        self.lock().statistics = Some(statistics);
        self.events.emit(StoreEvent::StatisticsReplaced);
    }

    pub(crate) fn replace_recommendations(&self, items: Vec<RecommendationItem>) {
        let count = items.len();
        self.lock().recommendations = items;
        self.events.emit(StoreEvent::RecommendationsReplaced { count });
    }

    pub(crate) fn replace_user_books(&self, items: Vec<UserBookItem>) {
        let count = items.len();
        self.lock().user_books = items;
        self.events.emit(StoreEvent::UserBooksReplaced { count });
    }

    pub(crate) fn record_error(&self, message: String) {
        self.lock().error = Some(message.clone());
        self.events.emit(StoreEvent::ErrorRecorded { message });
    }

    /// Idempotent: no event when there was nothing to clear
    pub(crate) fn clear_error(&self) {
        let had_error = self.lock().error.take().is_some();
        if had_error {
            self.events.emit(StoreEvent::ErrorCleared);
        }
    }

    pub(crate) fn mark_settled(&self) {
        self.lock().settled += 1;
    }

    fn lock(&self) -> MutexGuard<'_, StoreSnapshot> {
        // The state is plain data, so a poisoned lock still holds a usable value
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
