//! HTTP implementation of [`ApiClient`]
//!
//! Talks JSON to the recommendation backend over reqwest. Every non-2xx
//! answer is logged with its body before being returned as
//! [`ApiError::Status`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::{
    ApiClient, ApiResult, HealthResponse, SimilarBooksResponse, UserBooksResponse,
    UserRecommendationsResponse,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{BookRecord, SampleUsers, UserRecord};

/// Longest slice of a response body quoted in decode errors
const BODY_PREVIEW_LEN: usize = 300;

/// reqwest-backed client rooted at `<origin>/api`
#[derive(Clone)]
pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn get<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ApiResult<R> {
        let url = self.url(segments);
        tracing::debug!(%url, ?query, "GET");

        let resp = self.http.get(&url).query(query).send().await.map_err(|e| {
            tracing::error!("API Error: {e}");
            ApiError::from(e)
        })?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "API Error: {body}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = match body.char_indices().nth(BODY_PREVIEW_LEN) {
                Some((idx, _)) => &body[..idx],
                None => &body,
            };
            ApiError::Decode(format!("{url}: {e}\nBody: {preview}"))
        })
    }
}

/// Trim trailing slashes and reject anything that is not an http(s) URL
fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn health(&self) -> ApiResult<HealthResponse> {
        self.get(&["health"], &[]).await
    }

    async fn user_recommendations(
        &self,
        user_id: &str,
        top_n: usize,
    ) -> ApiResult<UserRecommendationsResponse> {
        self.get(
            &["recommend", "user", user_id],
            &[("top_n", top_n.to_string())],
        )
        .await
    }

    async fn similar_books(&self, isbn: &str, top_n: usize) -> ApiResult<SimilarBooksResponse> {
        self.get(&["recommend", "book", isbn], &[("top_n", top_n.to_string())])
            .await
    }

    async fn user_books(&self, user_id: &str) -> ApiResult<UserBooksResponse> {
        self.get(&["user", user_id, "books"], &[]).await
    }

    async fn book_info(&self, isbn: &str) -> ApiResult<BookRecord> {
        self.get(&["book", isbn], &[]).await
    }

    async fn user_info(&self, user_id: &str) -> ApiResult<UserRecord> {
        self.get(&["user", user_id], &[]).await
    }

    async fn sample_users(&self) -> ApiResult<SampleUsers> {
        self.get(&["debug", "sample-users"], &[]).await
    }
}
