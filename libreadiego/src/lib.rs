//! Readiego - query tools for a graph-based book recommender
//!
//! This library provides the query-orchestration core shared by the
//! terminal UI and the command-line tool: a typed client for the
//! recommendation API, an observable result store, and the controllers
//! that drive the request lifecycle and decide what gets displayed.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod present;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::{Config, StalePolicy};
pub use error::{ApiError, ReadiegoError, Result};
pub use service::ReadiegoService;
pub use types::{
    BookSummary, QueryMode, RecommendationItem, Relevance, ResultType, Statistics, UserBookItem,
};
