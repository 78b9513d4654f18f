//! Query controller
//!
//! Orchestrates the request lifecycle for every query mode and is the only
//! writer of the [`ResultStore`]. Each operation:
//!
//! 1. clears the previous error (recommendations, similar books, user books)
//! 2. raises the shared loading flag
//! 3. awaits the remote call
//! 4. writes data or records the per-operation message
//! 5. lowers the loading flag, whatever the outcome
//!
//! The loading flag is process-wide, not per operation. With
//! [`StalePolicy::LastWriteWins`] overlapping requests simply apply in
//! settlement order. With [`StalePolicy::DiscardStale`] each slot carries a
//! generation counter and superseded responses are dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::store::ResultStore;
use crate::api::{ApiClient, ApiResult};
use crate::config::{QueryConfig, StalePolicy};
use crate::error::ApiError;
use crate::types::{RecommendationItem, UserBookItem};

pub const STATISTICS_ERROR: &str = "Error al cargar estadísticas";

pub fn user_recommendations_error(user_id: &str) -> String {
    format!("Usuario {user_id} no encontrado o sin recomendaciones")
}

pub fn similar_books_error(isbn: &str) -> String {
    format!("Libro con ISBN {isbn} no encontrado")
}

pub fn user_books_error(user_id: &str) -> String {
    format!("Usuario {user_id} no encontrado o sin libros")
}

/// A failed query, after its message has been recorded in the store
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct QueryError {
    /// The user-facing message (also recorded in the store unless stale)
    pub message: String,
    /// What actually went wrong
    #[source]
    pub source: ApiError,
}

/// Store slots that can be written by a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Statistics = 0,
    Recommendations = 1,
    UserBooks = 2,
}

#[derive(Debug)]
struct Ticket {
    request: u64,
    slot: Slot,
    generation: u64,
}

pub struct QueryController {
    client: Arc<dyn ApiClient>,
    store: ResultStore,
    policy: StalePolicy,
    default_top_n: usize,
    requests: AtomicU64,
    generations: [AtomicU64; 3],
}

impl QueryController {
    pub fn new(client: Arc<dyn ApiClient>, store: ResultStore, config: &QueryConfig) -> Self {
        Self {
            client,
            store,
            policy: config.stale_policy,
            default_top_n: config.top_n,
            requests: AtomicU64::new(0),
            generations: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
        }
    }

    /// Read access to the store this controller writes
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Number of items requested when the caller does not say
    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Fetch global statistics
    ///
    /// Failure is recorded as [`STATISTICS_ERROR`] and never returned; the
    /// previous statistics stay in place. Success clears the error.
    pub async fn load_statistics(&self) {
        let ticket = self.begin(Slot::Statistics, false);
        let result = self.client.health().await;

        if self.is_current(&ticket) {
            match result {
                Ok(response) => {
                    tracing::info!(
                        users = response.stats.user_count,
                        books = response.stats.book_count,
                        "Loaded statistics"
                    );
                    self.store.replace_statistics(response.stats);
                    self.store.clear_error();
                }
                Err(e) => {
                    tracing::error!("Failed to load statistics: {e}");
                    self.store.record_error(STATISTICS_ERROR.to_string());
                }
            }
        } else {
            tracing::debug!("Discarding stale statistics response");
        }

        self.finish(ticket);
    }

    /// Fetch ranked recommendations for a user into the recommendations slot
    pub async fn load_user_recommendations(
        &self,
        user_id: &str,
        top_n: usize,
    ) -> Result<Vec<RecommendationItem>, QueryError> {
        tracing::info!(user_id, top_n, "Loading user recommendations");
        let fetch = async {
            self.client
                .user_recommendations(user_id, top_n)
                .await
                .map(|r| r.recommendations)
        };
        self.run_list(
            Slot::Recommendations,
            fetch,
            user_recommendations_error(user_id),
            ResultStore::replace_recommendations,
        )
        .await
    }

    /// Fetch books similar to `isbn` into the recommendations slot
    pub async fn load_similar_books(
        &self,
        isbn: &str,
        top_n: usize,
    ) -> Result<Vec<RecommendationItem>, QueryError> {
        tracing::info!(isbn, top_n, "Loading similar books");
        let fetch = async {
            self.client
                .similar_books(isbn, top_n)
                .await
                .map(|r| r.similar_books)
        };
        self.run_list(
            Slot::Recommendations,
            fetch,
            similar_books_error(isbn),
            ResultStore::replace_recommendations,
        )
        .await
    }

    /// Fetch the books a user has rated into the user-books slot
    pub async fn load_user_books(&self, user_id: &str) -> Result<Vec<UserBookItem>, QueryError> {
        tracing::info!(user_id, "Loading user books");
        let fetch = async { self.client.user_books(user_id).await.map(|r| r.books) };
        self.run_list(
            Slot::UserBooks,
            fetch,
            user_books_error(user_id),
            ResultStore::replace_user_books,
        )
        .await
    }

    /// Forget the recorded error; nothing else changes
    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    /// Shared lifecycle of the list-producing operations
    async fn run_list<T, F>(
        &self,
        slot: Slot,
        fetch: F,
        message: String,
        write: fn(&ResultStore, Vec<T>),
    ) -> Result<Vec<T>, QueryError>
    where
        T: Clone,
        F: Future<Output = ApiResult<Vec<T>>>,
    {
        let ticket = self.begin(slot, true);
        let result = fetch.await;
        let current = self.is_current(&ticket);

        let outcome = match result {
            Ok(items) => {
                if current {
                    write(&self.store, items.clone());
                } else {
                    tracing::debug!(?slot, "Discarding stale response");
                }
                Ok(items)
            }
            Err(source) => {
                tracing::warn!(?slot, not_found = source.is_not_found(), "{message}: {source}");
                if current {
                    write(&self.store, Vec::new());
                    self.store.record_error(message.clone());
                }
                Err(QueryError { message, source })
            }
        };

        self.finish(ticket);
        outcome
    }

    fn begin(&self, slot: Slot, clear_error: bool) -> Ticket {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generations[slot as usize].fetch_add(1, Ordering::SeqCst) + 1;

        if clear_error {
            self.store.clear_error();
        }
        self.store.set_loading(true);

        Ticket {
            request,
            slot,
            generation,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        match self.policy {
            StalePolicy::LastWriteWins => true,
            StalePolicy::DiscardStale => {
                self.generations[ticket.slot as usize].load(Ordering::SeqCst) == ticket.generation
            }
        }
    }

    fn finish(&self, ticket: Ticket) {
        let lower = match self.policy {
            StalePolicy::LastWriteWins => true,
            // Leave the flag up while a newer request is still in flight
            StalePolicy::DiscardStale => self.requests.load(Ordering::SeqCst) == ticket.request,
        };
        if lower {
            self.store.set_loading(false);
        }
        self.store.mark_settled();
    }
}
