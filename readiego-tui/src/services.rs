//! Service layer adapter for TUI
//!
//! This module provides an adapter between the async ReadiegoService
//! and the synchronous TUI event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle`: Wraps ReadiegoService and owns a tokio runtime
//! - Searches: spawned on the runtime, never awaited by the UI thread
//! - Events: Bridges the store's tokio broadcast channel to crossbeam
//!
//! # Example
//!
//! ```no_run
//! use libreadiego::types::QueryMode;
//! use readiego_tui::services::ServiceHandle;
//!
//! # fn example() -> readiego_tui::error::Result<()> {
//! let services = ServiceHandle::new()?;
//! let store_rx = services.subscribe();
//!
//! services.search(QueryMode::UserBooks, "11676".to_string());
//!
//! // In the event loop, redraw after any store change
//! if store_rx.try_recv().is_ok() {
//!     let session = services.session_view();
//! }
//! # Ok(())
//! # }
//! ```

use crate::app::{Effect, SessionView};
use crate::error::{Result, TuiError};
use crossbeam_channel::{unbounded, Receiver};
use libreadiego::service::events::StoreEvent;
use libreadiego::service::ReadiegoService;
use libreadiego::types::QueryMode;
use libreadiego::{ApiClient, Config};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Service handle for TUI operations
///
/// Wraps ReadiegoService and provides sync/async bridges for the TUI event
/// loop. Uses its own tokio runtime so the UI thread never blocks on I/O.
pub struct ServiceHandle {
    service: Arc<ReadiegoService>,
    runtime: tokio::runtime::Runtime,
}

impl ServiceHandle {
    /// Create a handle with configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration cannot be loaded
    /// - Tokio runtime cannot be created
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let service = ReadiegoService::from_config(config)?;
        Self::with_service(service)
    }

    /// Create a handle around a prepared service (tests use a mock client)
    pub fn with_service(service: ReadiegoService) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| TuiError::Runtime(e.to_string()))?;

        Ok(Self {
            service: Arc::new(service),
            runtime,
        })
    }

    /// Build a handle for `config` around an arbitrary client
    pub fn with_client(config: Config, client: Arc<dyn ApiClient>) -> Result<Self> {
        Self::with_service(ReadiegoService::with_client(config, client))
    }

    /// Subscribe to store events
    ///
    /// Bridges the tokio broadcast channel to a crossbeam channel for the
    /// sync event loop. The bridge task ends when the receiver is dropped.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        let mut events = self.service.subscribe();

        self.runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // The UI re-reads the whole store, so lost events are harmless
                        tracing::warn!("Store event receiver lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        rx
    }

    /// Fetch statistics in the background
    pub fn start_session(&self) {
        let service = Arc::clone(&self.service);
        self.runtime.spawn(async move {
            service.start_session().await;
        });
    }

    /// Run a search in the background; completion shows up as store events
    pub fn search(&self, mode: QueryMode, input: String) {
        let view = Arc::clone(self.service.view());
        self.runtime.spawn(async move {
            view.search(mode, &input).await;
        });
    }

    pub fn clear_error(&self) {
        self.service.view().clear_error();
    }

    /// Run an effect queued by the reducer
    pub fn perform(&self, effect: Effect) {
        match effect {
            Effect::Search { mode, input } => self.search(mode, input),
            Effect::ClearError => self.clear_error(),
        }
    }

    /// Current read of the session for rendering
    pub fn session_view(&self) -> SessionView {
        let snapshot = self.service.store().snapshot();
        SessionView::from_snapshot(&snapshot, self.service.view().result_type())
    }

    pub fn service(&self) -> &ReadiegoService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libreadiego::api::mock::MockApiClient;
    use libreadiego::service::DisplaySelection;

    #[test]
    fn test_session_view_starts_hidden() {
        let services =
            ServiceHandle::with_client(Config::default(), Arc::new(MockApiClient::new())).unwrap();

        let session = services.session_view();
        assert_eq!(session.display, DisplaySelection::Hidden);
        assert!(session.statistics.is_none());
        assert!(!session.loading);
    }
}
