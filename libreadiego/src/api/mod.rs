//! Client abstraction for the recommendation API
//!
//! This module provides a unified trait for the remote recommendation service.
//! The query layer only ever talks to [`ApiClient`], so it can run against the
//! real HTTP backend or against the scripted [`mock::MockApiClient`].
//!
//! # Examples
//!
//! ```no_run
//! use libreadiego::api::{ApiClient, http::HttpApiClient};
//! use libreadiego::config::ApiConfig;
//!
//! # async fn example() -> Result<(), libreadiego::error::ApiError> {
//! let client = HttpApiClient::new(&ApiConfig::default())?;
//!
//! let health = client.health().await?;
//! println!("{} users in the graph", health.stats.user_count);
//!
//! let recs = client.user_recommendations("276725", 10).await?;
//! for item in recs.recommendations {
//!     println!("{} ({:.2})", item.book_id, item.relevance.value());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{
    BookRecord, BookSummary, RecommendationItem, SampleUsers, Statistics, UserBookItem,
    UserRecord,
};

pub mod http;

// Mock client is available for all builds (not just tests) to support integration tests
pub mod mock;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Payload of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub stats: Statistics,
}

/// Payload of `GET /api/recommend/user/{userId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendationsResponse {
    #[serde(default)]
    pub user_id: Option<String>,
    pub recommendations: Vec<RecommendationItem>,
}

/// Payload of `GET /api/recommend/book/{isbn}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarBooksResponse {
    #[serde(default)]
    pub base_book: Option<BookSummary>,
    pub similar_books: Vec<RecommendationItem>,
}

/// Payload of `GET /api/user/{userId}/books`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBooksResponse {
    #[serde(default)]
    pub user_id: Option<String>,
    pub books: Vec<UserBookItem>,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Remote recommendation service
///
/// One method per endpoint. Identifiers are opaque: implementations pass
/// them through untouched apart from transport-level encoding.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Global graph statistics
    async fn health(&self) -> ApiResult<HealthResponse>;

    /// Ranked recommendations for a user (items carry `score`)
    async fn user_recommendations(
        &self,
        user_id: &str,
        top_n: usize,
    ) -> ApiResult<UserRecommendationsResponse>;

    /// Books similar to a reference book (items carry `similarity`)
    async fn similar_books(&self, isbn: &str, top_n: usize) -> ApiResult<SimilarBooksResponse>;

    /// Books a user has rated
    async fn user_books(&self, user_id: &str) -> ApiResult<UserBooksResponse>;

    /// Catalogue record for one book
    async fn book_info(&self, isbn: &str) -> ApiResult<BookRecord>;

    /// Record for one user
    async fn user_info(&self, user_id: &str) -> ApiResult<UserRecord>;

    /// Users with enough ratings to make good examples
    async fn sample_users(&self) -> ApiResult<SampleUsers>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_similar_books_response_with_null_base_book() {
        let response: SimilarBooksResponse = serde_json::from_value(json!({
            "base_book": null,
            "similar_books": []
        }))
        .unwrap();

        assert!(response.base_book.is_none());
        assert!(response.similar_books.is_empty());
    }

    #[test]
    fn test_user_books_response_from_server_shape() {
        let response: UserBooksResponse = serde_json::from_value(json!({
            "user_id": "11676",
            "books": [
                { "isbn": "0446310786", "title": "To Kill a Mockingbird", "user_rating": 10 },
                { "isbn": "0452282152", "title": "Girl with a Pearl Earring", "user_rating": 8 }
            ],
            "total": 2
        }))
        .unwrap();

        assert_eq!(response.books.len(), 2);
        assert_eq!(response.books[0].user_rating, 10.0);
        assert_eq!(response.total, Some(2));
    }

    #[test]
    fn test_health_response_ignores_extra_fields() {
        let response: HealthResponse = serde_json::from_value(json!({
            "status": "ok",
            "stats": { "users": 3, "books": 4, "ratings": 5, "density": 0.4 },
            "uptime": 12
        }))
        .unwrap();

        assert_eq!(response.status.as_deref(), Some("ok"));
        assert_eq!(response.stats.rating_count, 5);
    }
}
