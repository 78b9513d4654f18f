//! Pure reducer function for state transitions
//!
//! Following functional programming principles, the reducer is a pure function:
//! `(State, Action) -> State`
//!
//! The reducer has NO side effects - it only computes new state values.
//! Requests to the library are queued as [`Effect`]s and run by the event loop.

use super::actions::{Action, Effect};
use super::state::{tab_index, AppState, SessionView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libreadiego::types::QueryMode;

/// Lines moved by PageUp and PageDown
const PAGE_LINES: u16 = 10;

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
///
/// # Purity Guarantees
///
/// - No network requests
/// - No file I/O
/// - No mutations (returns new state)
/// - Deterministic (same inputs -> same output)
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, _) => state, // Terminal auto-handles resize

        // === Navigation ===
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        Action::SelectTab(mode) => AppState {
            active_tab: mode,
            ..state
        },

        Action::NextTab => {
            let next = QueryMode::ALL[(tab_index(state.active_tab) + 1) % QueryMode::ALL.len()];
            reduce(state, Action::SelectTab(next))
        }

        Action::PrevTab => {
            let len = QueryMode::ALL.len();
            let prev = QueryMode::ALL[(tab_index(state.active_tab) + len - 1) % len];
            reduce(state, Action::SelectTab(prev))
        }

        // === Search input ===
        Action::InputChar(c) if !state.session.loading => {
            let mut inputs = state.inputs.clone();
            inputs[tab_index(state.active_tab)].push(c);
            AppState { inputs, ..state }
        }

        Action::InputBackspace if !state.session.loading => {
            let mut inputs = state.inputs.clone();
            inputs[tab_index(state.active_tab)].pop();
            AppState { inputs, ..state }
        }

        // Inputs are disabled while a request is outstanding
        Action::InputChar(_) | Action::InputBackspace => state,

        Action::SubmitSearch => {
            if !state.can_search() {
                return state;
            }
            let mut pending = state.pending.clone();
            pending.push(Effect::Search {
                mode: state.active_tab,
                input: state.input().to_string(),
            });
            AppState { pending, ..state }
        }

        // === Results ===
        Action::ScrollUp(lines) => AppState {
            results_scroll: state.results_scroll.saturating_sub(lines),
            ..state
        },

        Action::ScrollDown(lines) => {
            let last = state.results_lines().saturating_sub(1);
            AppState {
                results_scroll: state.results_scroll.saturating_add(lines).min(last),
                ..state
            }
        }

        // === Session ===
        // A different result list starts from its top
        Action::SessionUpdated(session) => {
            let results_scroll = if session.display == state.session.display {
                state.results_scroll
            } else {
                0
            };
            AppState {
                session,
                results_scroll,
                ..state
            }
        }

        Action::DismissError => {
            if state.session.error.is_none() {
                return state;
            }
            let mut pending = state.pending.clone();
            pending.push(Effect::ClearError);
            AppState {
                session: SessionView {
                    error: None,
                    ..state.session
                },
                pending,
                ..state
            }
        }
    }
}

/// Handle keyboard input
///
/// Maps keys to high-level actions. This is where keybindings are defined.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // Global keybindings (work everywhere)
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            return reduce(state, Action::Quit);
        }

        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            return reduce(state, action);
        }

        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::HideHelp);
        }

        (KeyCode::Esc, _) if state.session.error.is_some() => {
            return reduce(state, Action::DismissError);
        }

        _ => {}
    }

    // The help overlay swallows everything else
    if state.help_visible {
        return state;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) => reduce(state, Action::NextTab),
        (KeyCode::BackTab, _) => reduce(state, Action::PrevTab),
        (KeyCode::Enter, _) => reduce(state, Action::SubmitSearch),
        (KeyCode::Backspace, _) => reduce(state, Action::InputBackspace),
        (KeyCode::Up, _) => reduce(state, Action::ScrollUp(1)),
        (KeyCode::Down, _) => reduce(state, Action::ScrollDown(1)),
        (KeyCode::PageUp, _) => reduce(state, Action::ScrollUp(PAGE_LINES)),
        (KeyCode::PageDown, _) => reduce(state, Action::ScrollDown(PAGE_LINES)),

        // q only quits when there is nothing typed that it could belong to
        (KeyCode::Char('q'), KeyModifiers::NONE) if state.input().is_empty() => {
            reduce(state, Action::Quit)
        }

        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            reduce(state, Action::InputChar(c))
        }

        _ => state,
    }
}
