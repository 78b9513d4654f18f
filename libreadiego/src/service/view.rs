//! View controller
//!
//! Tracks which kind of result the user last asked for and derives what the
//! rendering layer should show from that plus a store snapshot. The
//! derivation itself ([`display_for`]) is a pure function so front-ends can
//! call it on any snapshot they already hold.

use std::sync::{Arc, Mutex, MutexGuard};

use super::query::QueryController;
use super::store::StoreSnapshot;
use crate::config::StalePolicy;
use crate::types::{QueryMode, RecommendationItem, ResultType, UserBookItem};

pub const USER_RECOMMENDATIONS_LABEL: &str = "📚 Recomendaciones para ti";
pub const SIMILAR_BOOKS_LABEL: &str = "📖 Libros Similares";
pub const USER_BOOKS_LABEL: &str = "📕 Mis Libros";

/// Heading shown above the results for a result type
pub fn label(result_type: ResultType) -> Option<&'static str> {
    match result_type {
        ResultType::None => None,
        ResultType::UserRecommendations => Some(USER_RECOMMENDATIONS_LABEL),
        ResultType::SimilarBooks => Some(SIMILAR_BOOKS_LABEL),
        ResultType::UserBooks => Some(USER_BOOKS_LABEL),
    }
}

/// The dataset selected for display
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItems {
    Recommendations(Vec<RecommendationItem>),
    UserBooks(Vec<UserBookItem>),
}

impl DisplayItems {
    pub fn len(&self) -> usize {
        match self {
            DisplayItems::Recommendations(items) => items.len(),
            DisplayItems::UserBooks(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the results area shows
#[derive(Debug, Clone, PartialEq)]
pub enum DisplaySelection {
    /// No results section at all
    Hidden,
    /// Section heading with a loading indicator in place of the items
    Loading { label: &'static str },
    Results {
        label: &'static str,
        items: DisplayItems,
    },
}

/// Select what to render for `result_type` given the store contents
pub fn display_for(result_type: ResultType, snapshot: &StoreSnapshot) -> DisplaySelection {
    let Some(label) = label(result_type) else {
        return DisplaySelection::Hidden;
    };

    if snapshot.recommendations.is_empty() && snapshot.user_books.is_empty() {
        return DisplaySelection::Hidden;
    }

    if snapshot.loading {
        return DisplaySelection::Loading { label };
    }

    let items = match result_type {
        ResultType::UserBooks => DisplayItems::UserBooks(snapshot.user_books.clone()),
        _ => DisplayItems::Recommendations(snapshot.recommendations.clone()),
    };

    // The other slot may still hold data from an earlier search
    if items.is_empty() {
        return DisplaySelection::Hidden;
    }

    DisplaySelection::Results { label, items }
}

/// Where the most recent user-initiated search stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Pending(QueryMode),
    Resolved(QueryMode),
    /// The message is dropped once the error is dismissed
    Failed {
        mode: QueryMode,
        message: Option<String>,
    },
}

#[derive(Debug, Default)]
struct ViewState {
    result_type: ResultType,
    /// Increases with every search; with `DiscardStale` only the latest one
    /// moves the phase
    search_id: u64,
    phase: Option<SearchPhase>,
}

pub struct ViewController {
    query: Arc<QueryController>,
    state: Mutex<ViewState>,
}

impl ViewController {
    pub fn new(query: Arc<QueryController>) -> Self {
        Self {
            query,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn result_type(&self) -> ResultType {
        self.lock().result_type
    }

    pub fn phase(&self) -> SearchPhase {
        self.lock().phase.clone().unwrap_or(SearchPhase::Idle)
    }

    /// Current selection against the live store
    pub fn display(&self) -> DisplaySelection {
        let result_type = self.result_type();
        display_for(result_type, &self.query.store().snapshot())
    }

    /// Run a search for `raw_input` in `mode`
    ///
    /// Input is trimmed and empty input is ignored (returns `false`). The
    /// result type switches to `mode` before the request is issued. A failed
    /// request is logged; its message is already in the store.
    pub async fn search(&self, mode: QueryMode, raw_input: &str) -> bool {
        let input = raw_input.trim();
        if input.is_empty() {
            tracing::debug!(?mode, "Ignoring empty search input");
            return false;
        }

        let search_id = {
            let mut state = self.lock();
            state.result_type = mode.into();
            state.search_id += 1;
            state.phase = Some(SearchPhase::Pending(mode));
            state.search_id
        };

        let top_n = self.query.default_top_n();
        let result = match mode {
            QueryMode::UserRecommendations => self
                .query
                .load_user_recommendations(input, top_n)
                .await
                .map(|_| ()),
            QueryMode::SimilarBooks => self
                .query
                .load_similar_books(input, top_n)
                .await
                .map(|_| ()),
            QueryMode::UserBooks => self.query.load_user_books(input).await.map(|_| ()),
        };

        let phase = match result {
            Ok(()) => SearchPhase::Resolved(mode),
            Err(e) => {
                tracing::warn!(?mode, input, "Search failed: {e}");
                SearchPhase::Failed {
                    mode,
                    message: Some(e.message),
                }
            }
        };

        // Last-write-wins: the phase follows whichever search settles last,
        // like the store does
        let mut state = self.lock();
        let superseded = state.search_id != search_id;
        if self.query.policy() == StalePolicy::DiscardStale && superseded {
            tracing::debug!(?mode, "Discarding stale search outcome");
        } else {
            state.phase = Some(phase);
        }
        true
    }

    /// Dismiss the current error banner
    pub fn clear_error(&self) {
        self.query.clear_error();
        let mut state = self.lock();
        if let Some(SearchPhase::Failed { message, .. }) = state.phase.as_mut() {
            *message = None;
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
