//! Test application initialization and boot sequence
//!
//! Verifies that the app initializes with correct defaults
//! based on environment variables.

use libreadiego::service::DisplaySelection;
use libreadiego::types::{QueryMode, ResultType};
use readiego_tui::app::AppState;

#[test]
fn test_app_initializes_to_user_recommendations_tab() {
    let state = AppState::new();

    assert_eq!(state.active_tab, QueryMode::UserRecommendations);
    assert!(!state.should_quit);
}

#[test]
fn test_help_hidden_by_default() {
    let state = AppState::new();

    assert!(!state.help_visible);
}

#[test]
fn test_session_starts_empty() {
    let state = AppState::new();

    assert!(state.session.statistics.is_none());
    assert!(state.session.error.is_none());
    assert!(!state.session.loading);
    assert_eq!(state.session.result_type, ResultType::None);
    assert_eq!(state.session.display, DisplaySelection::Hidden);
}

#[test]
fn test_inputs_start_empty() {
    let state = AppState::new();

    assert!(state.inputs.iter().all(String::is_empty));
    assert!(state.pending.is_empty());
}

#[test]
fn test_cannot_search_initially() {
    let state = AppState::new();

    // Empty input never starts a search
    assert!(!state.can_search());
}

// Environment variables are process-wide, so these run as one test
#[test]
fn test_ui_config_from_env() {
    std::env::remove_var("READIEGO_TUI_TICK_MS");
    assert_eq!(AppState::new().config.tick_rate_ms, 100);

    std::env::set_var("READIEGO_TUI_TICK_MS", "250");
    assert_eq!(AppState::new().config.tick_rate_ms, 250);
    std::env::remove_var("READIEGO_TUI_TICK_MS");

    std::env::set_var("READIEGO_TUI_NO_COLOR", "1");
    assert!(!AppState::new().config.colors_enabled);
    std::env::remove_var("READIEGO_TUI_NO_COLOR");
}
