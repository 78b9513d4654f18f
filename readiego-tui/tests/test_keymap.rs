//! Test keybinding mappings to actions
//!
//! Verifies that keyboard input is correctly mapped to actions
//! through the reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libreadiego::service::{DisplayItems, DisplaySelection};
use libreadiego::types::{BookSummary, QueryMode, RecommendationItem, Relevance, ResultType};
use readiego_tui::app::{reduce, Action, AppState, Effect, SessionView};

fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn press(state: AppState, code: KeyCode) -> AppState {
    reduce(state, Action::Key(key_event(code, KeyModifiers::NONE)))
}

fn type_text(mut state: AppState, text: &str) -> AppState {
    for c in text.chars() {
        state = press(state, KeyCode::Char(c));
    }
    state
}

#[test]
fn test_q_quits_with_empty_input() {
    let state = press(AppState::new(), KeyCode::Char('q'));

    assert!(state.should_quit);
}

#[test]
fn test_q_is_typed_when_input_has_text() {
    let state = type_text(AppState::new(), "0q");

    assert!(!state.should_quit);
    assert_eq!(state.input(), "0q");
}

#[test]
fn test_ctrl_c_always_quits() {
    let state = type_text(AppState::new(), "276725");
    let state = reduce(
        state,
        Action::Key(key_event(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    );

    assert!(state.should_quit);
}

#[test]
fn test_f1_toggles_help() {
    let state = AppState::new();
    assert!(!state.help_visible);

    let state = press(state, KeyCode::F(1));
    assert!(state.help_visible);

    let state = press(state, KeyCode::F(1));
    assert!(!state.help_visible);
}

#[test]
fn test_help_overlay_swallows_typing() {
    let state = press(AppState::new(), KeyCode::F(1));
    let state = type_text(state, "12");

    assert!(state.input().is_empty());
}

#[test]
fn test_tab_and_shift_tab_cycle_tabs() {
    let state = press(AppState::new(), KeyCode::Tab);
    assert_eq!(state.active_tab, QueryMode::SimilarBooks);

    let state = press(state, KeyCode::Tab);
    assert_eq!(state.active_tab, QueryMode::UserBooks);

    let state = reduce(
        state,
        Action::Key(key_event(KeyCode::BackTab, KeyModifiers::SHIFT)),
    );
    assert_eq!(state.active_tab, QueryMode::SimilarBooks);
}

#[test]
fn test_backspace_edits_active_input() {
    let state = type_text(AppState::new(), "2767255");
    let state = press(state, KeyCode::Backspace);

    assert_eq!(state.input(), "276725");
}

#[test]
fn test_enter_queues_search_for_active_tab() {
    let state = press(AppState::new(), KeyCode::Tab);
    let state = type_text(state, "0439136350");
    let state = press(state, KeyCode::Enter);

    assert_eq!(
        state.pending,
        vec![Effect::Search {
            mode: QueryMode::SimilarBooks,
            input: "0439136350".to_string(),
        }]
    );
}

#[test]
fn test_enter_with_blank_input_does_nothing() {
    let state = type_text(AppState::new(), "   ");
    let state = press(state, KeyCode::Enter);

    assert!(state.pending.is_empty());
}

#[test]
fn test_esc_dismisses_error() {
    let mut state = AppState::new();
    state.session.error = Some("Error al cargar estadísticas".to_string());

    let state = press(state, KeyCode::Esc);

    assert!(state.session.error.is_none());
    assert_eq!(state.pending, vec![Effect::ClearError]);
}

#[test]
fn test_esc_hides_help_before_error() {
    let mut state = AppState::new();
    state.help_visible = true;
    state.session.error = Some("Error al cargar estadísticas".to_string());

    let state = press(state, KeyCode::Esc);

    assert!(!state.help_visible);
    assert!(state.session.error.is_some());
}

fn with_ten_recommendations() -> AppState {
    let items = (0..10)
        .map(|i| RecommendationItem {
            book_id: format!("00000000{i}"),
            book_info: BookSummary::bare(format!("00000000{i}")),
            relevance: Relevance::Score(3.5),
            method: None,
        })
        .collect();
    let mut state = AppState::new();
    state.session = SessionView {
        result_type: ResultType::UserRecommendations,
        display: DisplaySelection::Results {
            label: "📚 Recomendaciones para ti",
            items: DisplayItems::Recommendations(items),
        },
        ..SessionView::default()
    };
    state
}

#[test]
fn test_arrow_keys_scroll_results() {
    let state = press(with_ten_recommendations(), KeyCode::Down);
    let state = press(state, KeyCode::Down);
    assert_eq!(state.results_scroll, 2);

    let state = press(state, KeyCode::Up);
    assert_eq!(state.results_scroll, 1);
}

#[test]
fn test_page_keys_scroll_by_a_page() {
    let state = press(with_ten_recommendations(), KeyCode::PageDown);
    assert_eq!(state.results_scroll, 10);

    // Ten cards of four lines: the last line is 39
    let state = (0..5).fold(state, |state, _| press(state, KeyCode::PageDown));
    assert_eq!(state.results_scroll, 39);

    let state = press(state, KeyCode::PageUp);
    assert_eq!(state.results_scroll, 29);
}

#[test]
fn test_scroll_keys_leave_input_alone() {
    let state = type_text(with_ten_recommendations(), "276725");
    let state = press(state, KeyCode::Down);

    assert_eq!(state.input(), "276725");
    assert_eq!(state.results_scroll, 1);
}

#[test]
fn test_help_overlay_swallows_scrolling() {
    let state = press(with_ten_recommendations(), KeyCode::F(1));
    let state = press(state, KeyCode::Down);

    assert_eq!(state.results_scroll, 0);
}
