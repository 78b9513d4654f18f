//! Service layer for Readiego
//!
//! This module provides a clean, testable API for the query lifecycle that
//! can be consumed by multiple interfaces (CLI, TUI) without code
//! duplication.
//!
//! # Architecture
//!
//! The service layer follows a facade pattern with `ReadiegoService` as the
//! main entry point, wiring one session together:
//!
//! - `ApiClient`: remote calls (HTTP in production, scripted in tests)
//! - `ResultStore`: the observable session state
//! - `QueryController`: the only writer of the store
//! - `ViewController`: which result set is shown, and how
//! - `EventBus`: store change distribution
//!
//! # Example
//!
//! ```no_run
//! use libreadiego::service::ReadiegoService;
//! use libreadiego::types::QueryMode;
//!
//! # async fn example() -> libreadiego::Result<()> {
//! let service = ReadiegoService::new()?;
//! service.start_session().await;
//!
//! service.view().search(QueryMode::UserRecommendations, "276725").await;
//! println!("{:?}", service.view().display());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod query;
pub mod store;
pub mod view;

pub use self::query::{QueryController, QueryError};
pub use self::store::{ResultStore, StoreSnapshot};
pub use self::view::{DisplayItems, DisplaySelection, SearchPhase, ViewController};

use self::events::EventBus;
use crate::api::http::HttpApiClient;
use crate::api::ApiClient;
use crate::{Config, Result};
use std::sync::Arc;

/// Main service facade for one session
///
/// All components share the same `Arc<dyn ApiClient>` and `ResultStore`
/// instances, so clones of the store handed to a front-end observe the
/// controller's writes directly.
pub struct ReadiegoService {
    config: Arc<Config>,
    client: Arc<dyn ApiClient>,
    store: ResultStore,
    query: Arc<QueryController>,
    view: Arc<ViewController>,
    event_bus: EventBus,
}

impl ReadiegoService {
    /// Create a new service with default configuration
    ///
    /// This loads configuration from the default location and builds an
    /// HTTP client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration cannot be loaded or is invalid
    /// - The base URL is not an http(s) URL
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = HttpApiClient::new(&config.api)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a service around an existing client
    ///
    /// Used by tests with [`crate::api::mock::MockApiClient`].
    pub fn with_client(config: Config, client: Arc<dyn ApiClient>) -> Self {
        let event_bus = EventBus::new(100);
        let store = ResultStore::new(event_bus.clone());
        let query = Arc::new(QueryController::new(
            Arc::clone(&client),
            store.clone(),
            &config.query,
        ));
        let view = Arc::new(ViewController::new(Arc::clone(&query)));

        Self {
            config: Arc::new(config),
            client,
            store,
            query,
            view,
            event_bus,
        }
    }

    /// Seed the store with statistics
    ///
    /// Failure is recorded in the store, never returned.
    pub async fn start_session(&self) {
        self.query.load_statistics().await;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the API client directly, for one-off lookups that do not
    /// touch the store (book and user records, sample users)
    pub fn client(&self) -> &Arc<dyn ApiClient> {
        &self.client
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn query(&self) -> &Arc<QueryController> {
        &self.query
    }

    pub fn view(&self) -> &Arc<ViewController> {
        &self.view
    }

    /// Subscribe to store events
    ///
    /// Returns a receiver that will receive an event for every store
    /// mutation. Multiple subscribers are supported.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use libreadiego::service::ReadiegoService;
    ///
    /// # async fn example() -> libreadiego::Result<()> {
    /// let service = ReadiegoService::new()?;
    /// let mut events = service.subscribe();
    ///
    /// tokio::spawn(async move {
    ///     while let Ok(event) = events.recv().await {
    ///         println!("Event: {:?}", event);
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe(&self) -> events::EventReceiver {
        self.event_bus.subscribe()
    }
}
