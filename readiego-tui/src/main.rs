//! readiego-tui - Terminal UI for Readiego
//!
//! Interactive terminal page for the book recommendation service: system
//! statistics, three search tabs and the result list, in one screen.
//!
//! Logging goes to the file named by `READIEGO_TUI_LOG` (stderr would
//! corrupt the screen); without it nothing is logged.

use std::path::PathBuf;

use anyhow::Context;
use readiego_tui::{
    app::{event::EventHandler, reduce, Action, AppState},
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui,
};

fn main() -> anyhow::Result<()> {
    if let Some(path) = std::env::var_os("READIEGO_TUI_LOG").map(PathBuf::from) {
        libreadiego::logging::config_from_env(false, "info")
            .init_with_file(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
    }

    // Build services before touching the terminal so config errors print normally
    let services = ServiceHandle::new().context("Failed to initialize Readiego")?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &services);

    restore_terminal(terminal)?;

    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let store_rx = services.subscribe();
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    services.start_session();
    tracing::info!("readiego-tui started");

    loop {
        terminal.draw(|frame| ui::render(frame, &state))?;

        let action: Action = event_handler.next()?.into();
        state = reduce(state, action);

        // Run what the reducer asked for
        for effect in std::mem::take(&mut state.pending) {
            tracing::debug!(?effect, "Performing effect");
            services.perform(effect);
        }

        // Any store change means re-reading the whole session
        let mut changed = false;
        while store_rx.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            state = reduce(state, Action::SessionUpdated(services.session_view()));
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
