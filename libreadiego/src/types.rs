//! Core data types for Readiego
//!
//! Payload shapes are decided once, here, at the deserialization boundary:
//! a recommendation either carries a `score` or a `similarity`, and a rated
//! book arrives either nested under `book_info` or flattened. Everything
//! downstream works with the resolved variants.

use serde::{Deserialize, Serialize};

/// Global graph statistics reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "users")]
    pub user_count: u64,
    #[serde(rename = "books")]
    pub book_count: u64,
    #[serde(rename = "ratings")]
    pub rating_count: u64,
    /// Ratio of observed rating edges to all possible edges (0..=1)
    pub density: f64,
}

/// Minimal book description attached to recommendation and rating items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BookSummary {
    /// Summary carrying nothing but the identifier
    pub fn bare(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: None,
            author: None,
            year: None,
            image_url: None,
        }
    }
}

/// How a recommended book was ranked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    /// Relevance to a target user (collaborative filtering)
    Score(f64),
    /// Closeness to a reference book (item similarity)
    Similarity(f64),
}

impl Relevance {
    pub fn value(&self) -> f64 {
        match self {
            Relevance::Score(v) | Relevance::Similarity(v) => *v,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Relevance::Score(v) => Some(*v),
            Relevance::Similarity(_) => None,
        }
    }

    pub fn similarity(&self) -> Option<f64> {
        match self {
            Relevance::Similarity(v) => Some(*v),
            Relevance::Score(_) => None,
        }
    }
}

/// One entry of a user recommendation or book similarity list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecommendation")]
pub struct RecommendationItem {
    pub book_id: String,
    pub book_info: BookSummary,
    #[serde(flatten)]
    pub relevance: Relevance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Deserialize)]
struct RawRecommendation {
    book_id: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    similarity: Option<f64>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    book_info: Option<BookSummary>,
}

impl TryFrom<RawRecommendation> for RecommendationItem {
    type Error = String;

    fn try_from(raw: RawRecommendation) -> Result<Self, Self::Error> {
        let relevance = match (raw.score, raw.similarity) {
            (Some(score), None) => Relevance::Score(score),
            (None, Some(similarity)) => Relevance::Similarity(similarity),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "recommendation for {} carries both score and similarity",
                    raw.book_id
                ))
            }
            (None, None) => {
                return Err(format!(
                    "recommendation for {} carries neither score nor similarity",
                    raw.book_id
                ))
            }
        };

        // The server drops book_info when the catalogue has no row for the ISBN
        let book_info = raw
            .book_info
            .unwrap_or_else(|| BookSummary::bare(raw.book_id.clone()));

        Ok(Self {
            book_id: raw.book_id,
            book_info,
            relevance,
            method: raw.method,
        })
    }
}

/// A book the user has rated, with that rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUserBook")]
pub struct UserBookItem {
    pub book_info: BookSummary,
    pub user_rating: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserBook {
    Nested {
        book_info: BookSummary,
        user_rating: f64,
    },
    Flat {
        #[serde(flatten)]
        book_info: BookSummary,
        user_rating: f64,
    },
}

impl From<RawUserBook> for UserBookItem {
    fn from(raw: RawUserBook) -> Self {
        match raw {
            RawUserBook::Nested {
                book_info,
                user_rating,
            }
            | RawUserBook::Flat {
                book_info,
                user_rating,
            } => Self {
                book_info,
                user_rating,
            },
        }
    }
}

/// Full catalogue record for one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub isbn: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<BookRecord> for BookSummary {
    fn from(record: BookRecord) -> Self {
        Self {
            isbn: record.isbn,
            title: record.title,
            author: record.author,
            year: record.year,
            image_url: record.image_url,
        }
    }
}

/// Demographic record for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// A user known to have rated enough books to get recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleUser {
    pub user_id: String,
    pub books_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleUsers {
    pub sample_users: Vec<SampleUser>,
    pub total_users_in_graph: u64,
}

/// Which query mode is active, and therefore which dataset is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    #[default]
    None,
    UserRecommendations,
    SimilarBooks,
    UserBooks,
}

/// The three searches a user can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    UserRecommendations,
    SimilarBooks,
    UserBooks,
}

impl QueryMode {
    pub const ALL: [QueryMode; 3] = [
        QueryMode::UserRecommendations,
        QueryMode::SimilarBooks,
        QueryMode::UserBooks,
    ];
}

impl From<QueryMode> for ResultType {
    fn from(mode: QueryMode) -> Self {
        match mode {
            QueryMode::UserRecommendations => ResultType::UserRecommendations,
            QueryMode::SimilarBooks => ResultType::SimilarBooks,
            QueryMode::UserBooks => ResultType::UserBooks,
        }
    }
}

impl ResultType {
    pub fn mode(&self) -> Option<QueryMode> {
        match self {
            ResultType::None => None,
            ResultType::UserRecommendations => Some(QueryMode::UserRecommendations),
            ResultType::SimilarBooks => Some(QueryMode::SimilarBooks),
            ResultType::UserBooks => Some(QueryMode::UserBooks),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Process-wide outcome of the most recent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statistics_wire_names() {
        let stats: Statistics = serde_json::from_value(json!({
            "users": 1200,
            "books": 8500,
            "ratings": 10000,
            "density": 0.00098
        }))
        .unwrap();

        assert_eq!(stats.user_count, 1200);
        assert_eq!(stats.book_count, 8500);
        assert_eq!(stats.rating_count, 10000);
        assert!((stats.density - 0.00098).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recommendation_with_score() {
        let item: RecommendationItem = serde_json::from_value(json!({
            "book_id": "0316666343",
            "score": 4.5,
            "method": "collaborative_filtering",
            "book_info": {
                "isbn": "0316666343",
                "title": "The Lovely Bones: A Novel",
                "author": "Alice Sebold",
                "year": 2002,
                "publisher": "Little, Brown",
                "image_url": "http://images.amazon.com/images/P/0316666343.01.MZZZZZZZ.jpg"
            }
        }))
        .unwrap();

        assert_eq!(item.relevance, Relevance::Score(4.5));
        assert_eq!(item.relevance.similarity(), None);
        assert_eq!(item.book_info.author.as_deref(), Some("Alice Sebold"));
        assert_eq!(item.method.as_deref(), Some("collaborative_filtering"));
    }

    #[test]
    fn test_recommendation_with_similarity() {
        let item: RecommendationItem = serde_json::from_value(json!({
            "book_id": "0439139597",
            "similarity": 0.33,
            "method": "item_similarity"
        }))
        .unwrap();

        assert_eq!(item.relevance.similarity(), Some(0.33));
        assert_eq!(item.relevance.score(), None);
    }

    #[test]
    fn test_recommendation_without_book_info_gets_bare_summary() {
        let item: RecommendationItem = serde_json::from_value(json!({
            "book_id": "0000000000",
            "score": 1.0
        }))
        .unwrap();

        assert_eq!(item.book_info, BookSummary::bare("0000000000"));
    }

    #[test]
    fn test_recommendation_rejects_ambiguous_relevance() {
        let both = serde_json::from_value::<RecommendationItem>(json!({
            "book_id": "1",
            "score": 1.0,
            "similarity": 0.5
        }));
        assert!(both.unwrap_err().to_string().contains("both score and similarity"));

        let neither = serde_json::from_value::<RecommendationItem>(json!({ "book_id": "1" }));
        assert!(neither
            .unwrap_err()
            .to_string()
            .contains("neither score nor similarity"));
    }

    #[test]
    fn test_recommendation_serializes_flat_relevance() {
        let item = RecommendationItem {
            book_id: "1".to_string(),
            book_info: BookSummary::bare("1"),
            relevance: Relevance::Similarity(0.25),
            method: None,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["similarity"], json!(0.25));
        assert!(value.get("score").is_none());
        assert!(value.get("method").is_none());
    }

    #[test]
    fn test_user_book_flat_shape() {
        let item: UserBookItem = serde_json::from_value(json!({
            "isbn": "0060928336",
            "title": "Divine Secrets of the Ya-Ya Sisterhood: A Novel",
            "author": "Rebecca Wells",
            "year": 1997,
            "publisher": "Perennial",
            "image_url": null,
            "user_rating": 9.0
        }))
        .unwrap();

        assert_eq!(item.book_info.isbn, "0060928336");
        assert_eq!(item.book_info.image_url, None);
        assert_eq!(item.user_rating, 9.0);
    }

    #[test]
    fn test_user_book_nested_shape() {
        let item: UserBookItem = serde_json::from_value(json!({
            "book_info": { "isbn": "0060928336", "title": "Divine Secrets" },
            "user_rating": 7.0
        }))
        .unwrap();

        assert_eq!(item.book_info.title.as_deref(), Some("Divine Secrets"));
        assert_eq!(item.user_rating, 7.0);
    }

    #[test]
    fn test_user_book_requires_rating() {
        let result = serde_json::from_value::<UserBookItem>(json!({ "isbn": "0060928336" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_type_from_mode() {
        assert_eq!(ResultType::default(), ResultType::None);
        for mode in QueryMode::ALL {
            assert_eq!(ResultType::from(mode).mode(), Some(mode));
        }
        assert_eq!(ResultType::None.mode(), None);
    }

    #[test]
    fn test_book_record_into_summary() {
        let record = BookRecord {
            isbn: "0195153448".to_string(),
            title: Some("Classical Mythology".to_string()),
            author: Some("Mark P. O. Morford".to_string()),
            year: Some(2002),
            publisher: Some("Oxford University Press".to_string()),
            image_url: None,
        };

        let summary: BookSummary = record.into();
        assert_eq!(summary.isbn, "0195153448");
        assert_eq!(summary.year, Some(2002));
    }
}
