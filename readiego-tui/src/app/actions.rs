//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. This module defines
//! all possible actions that can modify application state, plus the effects
//! the reducer asks the event loop to perform.

use crossterm::event::KeyEvent;
use libreadiego::types::QueryMode;

use super::state::SessionView;

/// Actions that trigger state transitions
///
/// Following functional programming principles, actions are immutable
/// data structures that describe what should happen. The reducer
/// (see `reducer.rs`) is responsible for applying actions to state.
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick for redraws
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    /// Quit the application
    Quit,

    /// Show help overlay
    ShowHelp,

    /// Hide help overlay
    HideHelp,

    /// Switch to a search tab
    SelectTab(QueryMode),

    NextTab,

    PrevTab,

    // === Search input ===
    /// Character typed into the active tab's input
    InputChar(char),

    /// Delete the last character of the active tab's input
    InputBackspace,

    /// Submit the active tab's input
    SubmitSearch,

    // === Results ===
    /// Scroll the results list up by a number of lines
    ScrollUp(u16),

    /// Scroll the results list down, stopping at its last line
    ScrollDown(u16),

    // === Session ===
    /// The result store changed; carries a fresh read of it
    SessionUpdated(SessionView),

    /// Dismiss the error banner
    DismissError,
}

/// Side effects requested by the reducer and run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a search; the input is passed untrimmed
    Search { mode: QueryMode, input: String },

    /// Clear the error recorded in the store
    ClearError,
}
