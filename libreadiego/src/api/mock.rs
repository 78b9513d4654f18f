//! Mock API client for testing
//!
//! This module provides a scriptable client that replays queued replies per
//! endpoint, optionally after a delay, and records every call it receives.
//! It's designed for exercising the query layer without a running backend,
//! including overlapping requests that settle in a chosen order.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use super::{
    ApiClient, ApiResult, HealthResponse, SimilarBooksResponse, UserBooksResponse,
    UserRecommendationsResponse,
};
use crate::error::ApiError;
use crate::types::{
    BookRecord, RecommendationItem, SampleUsers, Statistics, UserBookItem, UserRecord,
};

/// Endpoint identifier used to key scripted replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    UserRecommendations,
    SimilarBooks,
    UserBooks,
    BookInfo,
    UserInfo,
    SampleUsers,
}

/// A successful reply for one endpoint
#[derive(Debug, Clone)]
pub enum MockPayload {
    Health(HealthResponse),
    UserRecommendations(UserRecommendationsResponse),
    SimilarBooks(SimilarBooksResponse),
    UserBooks(UserBooksResponse),
    BookInfo(BookRecord),
    UserInfo(UserRecord),
    SampleUsers(SampleUsers),
}

impl MockPayload {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            MockPayload::Health(_) => Endpoint::Health,
            MockPayload::UserRecommendations(_) => Endpoint::UserRecommendations,
            MockPayload::SimilarBooks(_) => Endpoint::SimilarBooks,
            MockPayload::UserBooks(_) => Endpoint::UserBooks,
            MockPayload::BookInfo(_) => Endpoint::BookInfo,
            MockPayload::UserInfo(_) => Endpoint::UserInfo,
            MockPayload::SampleUsers(_) => Endpoint::SampleUsers,
        }
    }

    pub fn stats(stats: Statistics) -> Self {
        MockPayload::Health(HealthResponse {
            status: Some("ok".to_string()),
            stats,
        })
    }

    pub fn recommendations(items: Vec<RecommendationItem>) -> Self {
        MockPayload::UserRecommendations(UserRecommendationsResponse {
            user_id: None,
            recommendations: items,
        })
    }

    pub fn similar(items: Vec<RecommendationItem>) -> Self {
        MockPayload::SimilarBooks(SimilarBooksResponse {
            base_book: None,
            similar_books: items,
        })
    }

    pub fn user_books(items: Vec<UserBookItem>) -> Self {
        let total = items.len();
        MockPayload::UserBooks(UserBooksResponse {
            user_id: None,
            books: items,
            total: Some(total),
        })
    }
}

/// A call received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub endpoint: Endpoint,
    pub argument: Option<String>,
    pub top_n: Option<usize>,
}

struct Scripted {
    reply: ApiResult<MockPayload>,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    replies: HashMap<Endpoint, VecDeque<Scripted>>,
    calls: Vec<MockCall>,
}

/// Scriptable client; clones share the same script and call log
#[derive(Clone, Default)]
pub struct MockApiClient {
    state: Arc<Mutex<MockState>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply, returned immediately
    pub fn reply(&self, payload: MockPayload) -> &Self {
        self.reply_after(Duration::ZERO, payload)
    }

    /// Queue a successful reply, returned after `delay`
    pub fn reply_after(&self, delay: Duration, payload: MockPayload) -> &Self {
        let endpoint = payload.endpoint();
        self.push(endpoint, Ok(payload), delay)
    }

    /// Queue a failure, returned immediately
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) -> &Self {
        self.fail_after(endpoint, Duration::ZERO, error)
    }

    /// Queue a failure, returned after `delay`
    pub fn fail_after(&self, endpoint: Endpoint, delay: Duration, error: ApiError) -> &Self {
        self.push(endpoint, Err(error), delay)
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for one endpoint
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    fn push(&self, endpoint: Endpoint, reply: ApiResult<MockPayload>, delay: Duration) -> &Self {
        self.lock()
            .replies
            .entry(endpoint)
            .or_default()
            .push_back(Scripted { reply, delay });
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the script from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn take(
        &self,
        endpoint: Endpoint,
        argument: Option<&str>,
        top_n: Option<usize>,
    ) -> ApiResult<MockPayload> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(MockCall {
                endpoint,
                argument: argument.map(str::to_string),
                top_n,
            });
            state
                .replies
                .get_mut(&endpoint)
                .and_then(|queue| queue.pop_front())
        };

        let Some(scripted) = scripted else {
            return Err(ApiError::Status {
                status: 404,
                body: format!("no scripted reply for {endpoint:?}"),
            });
        };

        if !scripted.delay.is_zero() {
            sleep(scripted.delay).await;
        }
        scripted.reply
    }
}

fn mismatch(expected: Endpoint, got: &MockPayload) -> ApiError {
    ApiError::Decode(format!(
        "scripted {:?} reply served for {:?}",
        got.endpoint(),
        expected
    ))
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn health(&self) -> ApiResult<HealthResponse> {
        match self.take(Endpoint::Health, None, None).await? {
            MockPayload::Health(r) => Ok(r),
            other => Err(mismatch(Endpoint::Health, &other)),
        }
    }

    async fn user_recommendations(
        &self,
        user_id: &str,
        top_n: usize,
    ) -> ApiResult<UserRecommendationsResponse> {
        match self
            .take(Endpoint::UserRecommendations, Some(user_id), Some(top_n))
            .await?
        {
            MockPayload::UserRecommendations(r) => Ok(r),
            other => Err(mismatch(Endpoint::UserRecommendations, &other)),
        }
    }

    async fn similar_books(&self, isbn: &str, top_n: usize) -> ApiResult<SimilarBooksResponse> {
        match self
            .take(Endpoint::SimilarBooks, Some(isbn), Some(top_n))
            .await?
        {
            MockPayload::SimilarBooks(r) => Ok(r),
            other => Err(mismatch(Endpoint::SimilarBooks, &other)),
        }
    }

    async fn user_books(&self, user_id: &str) -> ApiResult<UserBooksResponse> {
        match self.take(Endpoint::UserBooks, Some(user_id), None).await? {
            MockPayload::UserBooks(r) => Ok(r),
            other => Err(mismatch(Endpoint::UserBooks, &other)),
        }
    }

    async fn book_info(&self, isbn: &str) -> ApiResult<BookRecord> {
        match self.take(Endpoint::BookInfo, Some(isbn), None).await? {
            MockPayload::BookInfo(r) => Ok(r),
            other => Err(mismatch(Endpoint::BookInfo, &other)),
        }
    }

    async fn user_info(&self, user_id: &str) -> ApiResult<UserRecord> {
        match self.take(Endpoint::UserInfo, Some(user_id), None).await? {
            MockPayload::UserInfo(r) => Ok(r),
            other => Err(mismatch(Endpoint::UserInfo, &other)),
        }
    }

    async fn sample_users(&self) -> ApiResult<SampleUsers> {
        match self.take(Endpoint::SampleUsers, None, None).await? {
            MockPayload::SampleUsers(r) => Ok(r),
            other => Err(mismatch(Endpoint::SampleUsers, &other)),
        }
    }
}
