//! End-to-end search flow through the service handle
//!
//! Drives the reducer, the effect runner and the store event bridge the way
//! the event loop does, against a scripted API client.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use libreadiego::api::mock::{Endpoint, MockApiClient, MockPayload};
use libreadiego::error::ApiError;
use libreadiego::service::events::StoreEvent;
use libreadiego::service::{DisplayItems, DisplaySelection};
use libreadiego::types::{BookSummary, RecommendationItem, Relevance, Statistics};
use libreadiego::Config;
use readiego_tui::app::{reduce, Action, AppState};
use readiego_tui::services::ServiceHandle;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Block until the store reports the outstanding request settled
fn wait_until_settled(rx: &Receiver<StoreEvent>) {
    loop {
        match rx.recv_timeout(TIMEOUT) {
            Ok(StoreEvent::LoadingChanged { loading: false }) => return,
            Ok(_) => continue,
            Err(e) => panic!("store never settled: {e}"),
        }
    }
}

fn run_effects(mut state: AppState, services: &ServiceHandle) -> AppState {
    for effect in std::mem::take(&mut state.pending) {
        services.perform(effect);
    }
    state
}

fn type_text(mut state: AppState, text: &str) -> AppState {
    for c in text.chars() {
        state = reduce(state, Action::InputChar(c));
    }
    state
}

#[test]
fn test_statistics_load_on_session_start() {
    let mock = MockApiClient::new();
    mock.reply(MockPayload::stats(Statistics {
        user_count: 1200,
        book_count: 8500,
        rating_count: 10000,
        density: 0.00098,
    }));
    let services = ServiceHandle::with_client(Config::default(), Arc::new(mock)).unwrap();
    let rx = services.subscribe();

    services.start_session();
    wait_until_settled(&rx);

    let session = services.session_view();
    assert_eq!(session.statistics.map(|s| s.book_count), Some(8500));
    assert!(session.error.is_none());
}

#[test]
fn test_search_from_keyboard_to_results() {
    let mock = MockApiClient::new();
    mock.reply(MockPayload::recommendations(vec![RecommendationItem {
        book_id: "0316666343".to_string(),
        book_info: BookSummary::bare("0316666343"),
        relevance: Relevance::Score(4.2),
        method: None,
    }]));
    let services = ServiceHandle::with_client(Config::default(), Arc::new(mock.clone())).unwrap();
    let rx = services.subscribe();

    let state = type_text(AppState::new(), " 276725 ");
    let state = reduce(state, Action::SubmitSearch);
    let state = run_effects(state, &services);
    wait_until_settled(&rx);
    let state = reduce(state, Action::SessionUpdated(services.session_view()));

    assert_eq!(mock.calls()[0].argument.as_deref(), Some("276725"));
    match state.session.display {
        DisplaySelection::Results {
            label,
            items: DisplayItems::Recommendations(items),
        } => {
            assert_eq!(label, "📚 Recomendaciones para ti");
            assert_eq!(items.len(), 1);
        }
        other => panic!("unexpected display: {other:?}"),
    }
}

#[test]
fn test_failed_search_shows_banner_until_dismissed() {
    let mock = MockApiClient::new();
    mock.fail(Endpoint::UserBooks, ApiError::Network("refused".to_string()));
    let services = ServiceHandle::with_client(Config::default(), Arc::new(mock)).unwrap();
    let rx = services.subscribe();

    let state = reduce(AppState::new(), Action::PrevTab);
    let state = type_text(state, "11676");
    let state = run_effects(reduce(state, Action::SubmitSearch), &services);
    wait_until_settled(&rx);
    let state = reduce(state, Action::SessionUpdated(services.session_view()));

    assert_eq!(
        state.session.error.as_deref(),
        Some("Usuario 11676 no encontrado o sin libros")
    );
    assert_eq!(state.session.display, DisplaySelection::Hidden);

    let state = run_effects(reduce(state, Action::DismissError), &services);
    assert!(state.session.error.is_none());
    assert!(services.session_view().error.is_none());
}
