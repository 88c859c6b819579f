//! Testing utilities including a scripted HTTP client.
//!
//! These are useful for exercising resolvers and the coordinator without
//! touching the real sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AvailabilityError;
use crate::http::{FetchRequest, FetchResponse, HttpClient};
use crate::models::SourceId;

/// Canned reply for a route.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A decoded page.
    Page {
        status_code: u16,
        /// URL after redirects. Defaults to the request URL.
        final_url: Option<String>,
        body: String,
    },
    /// The request exceeds its timeout.
    Timeout,
    /// The connection is refused.
    Refused,
    /// The client panics mid-request.
    Panic,
}

impl MockReply {
    /// 200 response with the given body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::Page {
            status_code: 200,
            final_url: None,
            body: body.into(),
        }
    }

    /// Pretend the request was redirected. No-op on failure replies.
    pub fn redirected_to(self, url: impl Into<String>) -> Self {
        match self {
            Self::Page {
                status_code, body, ..
            } => Self::Page {
                status_code,
                final_url: Some(url.into()),
                body,
            },
            other => other,
        }
    }

    /// Replace the status code. No-op on failure replies.
    pub fn with_status(self, code: u16) -> Self {
        match self {
            Self::Page {
                final_url, body, ..
            } => Self::Page {
                status_code: code,
                final_url,
                body,
            },
            other => other,
        }
    }
}

/// Record of a request made through the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub source: SourceId,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
    /// Session the request went through, `None` for the plain client.
    pub session: Option<usize>,
}

impl RecordedRequest {
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    /// (url fragment, reply), matched in insertion order
    routes: RwLock<Vec<(String, MockReply)>>,
    requests: RwLock<Vec<RecordedRequest>>,
    sessions: AtomicUsize,
}

/// A scripted [`HttpClient`].
///
/// Requests are matched against routes by URL substring, first match wins.
/// Unmatched requests fail as refused connections. Sessions share the routes
/// and the request log with the client that opened them.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<MockState>,
    session: Option<usize>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route for URLs containing `fragment`.
    pub fn on(self, fragment: impl Into<String>, reply: MockReply) -> Self {
        if let Ok(mut routes) = self.state.routes.write() {
            routes.push((fragment.into(), reply));
        }
        self
    }

    /// All requests made so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Requests made on behalf of one source.
    pub fn requests_for(&self, source: SourceId) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.source == source)
            .collect()
    }

    /// Number of sessions opened.
    pub fn session_count(&self) -> usize {
        self.state.sessions.load(Ordering::SeqCst)
    }

    fn route(&self, url: &str) -> Option<MockReply> {
        let routes = self.state.routes.read().ok()?;
        routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, AvailabilityError> {
        if let Ok(mut requests) = self.state.requests.write() {
            requests.push(RecordedRequest {
                source: request.source,
                url: request.url.clone(),
                query: request.query.clone(),
                timeout: request.timeout,
                session: self.session,
            });
        }

        let source_id = request.source.as_str().to_string();
        match self.route(&request.url) {
            Some(MockReply::Page {
                status_code,
                final_url,
                body,
            }) => Ok(FetchResponse {
                status_code,
                final_url: final_url.unwrap_or(request.url),
                body,
                encoding: "UTF-8".to_string(),
            }),
            Some(MockReply::Timeout) => Err(AvailabilityError::Timeout {
                source_id,
                url: request.url,
            }),
            Some(MockReply::Panic) => panic!("mock transport panic for {}", request.url),
            Some(MockReply::Refused) | None => Err(AvailabilityError::Transport {
                source_id,
                message: format!("connection refused: {}", request.url),
            }),
        }
    }

    fn session(&self) -> Result<Arc<dyn HttpClient>, AvailabilityError> {
        let id = self.state.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Self {
            state: Arc::clone(&self.state),
            session: Some(id),
        }))
    }
}
