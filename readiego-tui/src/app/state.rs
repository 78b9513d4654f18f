//! Application state
//!
//! Immutable state structure following functional programming principles.
//! All state transitions happen through the reducer (see `reducer.rs`).

use libreadiego::present::BookCard;
use libreadiego::service::view::display_for;
use libreadiego::service::{DisplayItems, DisplaySelection, StoreSnapshot};
use libreadiego::types::{QueryMode, ResultType, Statistics};

use super::actions::Effect;

/// Root application state
///
/// UI-local fields live here directly. Everything about the current query
/// session is a read-only copy in `session`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Should the application quit?
    pub should_quit: bool,

    /// Help overlay visible?
    pub help_visible: bool,

    /// Search tab currently shown
    pub active_tab: QueryMode,

    /// One input buffer per tab, indexed like `QueryMode::ALL`
    pub inputs: [String; 3],

    /// Last read of the result store
    pub session: SessionView,

    /// First visible line of the results list
    pub results_scroll: u16,

    /// Effects queued by the reducer, drained by the event loop
    pub pending: Vec<Effect>,

    /// UI configuration
    pub config: UiConfig,
}

/// Read-only mirror of the library session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub statistics: Option<Statistics>,
    pub loading: bool,
    pub error: Option<String>,
    pub result_type: ResultType,
    pub display: DisplaySelection,
}

impl Default for SessionView {
    fn default() -> Self {
        Self {
            statistics: None,
            loading: false,
            error: None,
            result_type: ResultType::None,
            display: DisplaySelection::Hidden,
        }
    }
}

impl SessionView {
    /// Build from a store snapshot and the view controller's discriminator
    pub fn from_snapshot(snapshot: &StoreSnapshot, result_type: ResultType) -> Self {
        Self {
            statistics: snapshot.statistics.clone(),
            loading: snapshot.loading,
            error: snapshot.error.clone(),
            result_type,
            display: display_for(result_type, snapshot),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Use colors?
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            help_visible: false,
            active_tab: QueryMode::UserRecommendations,
            inputs: Default::default(),
            session: SessionView::default(),
            results_scroll: 0,
            pending: Vec::new(),
            config: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err()
            && std::env::var("READIEGO_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("READIEGO_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
        }
    }
}

/// Position of a mode in `QueryMode::ALL`
pub fn tab_index(mode: QueryMode) -> usize {
    match mode {
        QueryMode::UserRecommendations => 0,
        QueryMode::SimilarBooks => 1,
        QueryMode::UserBooks => 2,
    }
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Input buffer of the active tab
    pub fn input(&self) -> &str {
        &self.inputs[tab_index(self.active_tab)]
    }

    /// Inputs are disabled while a request is outstanding
    pub fn can_search(&self) -> bool {
        !self.session.loading && !self.input().trim().is_empty()
    }

    /// Lines the results list takes before wrapping
    pub fn results_lines(&self) -> u16 {
        let DisplaySelection::Results { ref items, .. } = self.session.display else {
            return 0;
        };
        let cards: Vec<BookCard> = match items {
            DisplayItems::Recommendations(items) => items.iter().map(BookCard::from).collect(),
            DisplayItems::UserBooks(items) => items.iter().map(BookCard::from).collect(),
        };
        cards
            .iter()
            .map(|card| 3 + u16::from(card.isbn_line.is_some()))
            .fold(0, u16::saturating_add)
    }
}
