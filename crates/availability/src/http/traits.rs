//! HTTP access trait definitions.
//!
//! Resolvers never talk to `reqwest` directly. They build a [`FetchRequest`]
//! and hand it to an [`HttpClient`], which keeps the network seam mockable and
//! keeps timeouts and charset handling in one place.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AvailabilityError;
use crate::models::SourceId;

/// How the response body should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Trust the `Content-Type` charset, falling back to UTF-8.
    #[default]
    Declared,
    /// Guess the encoding from the response bytes. For sources whose charset
    /// declarations are unreliable.
    Detect,
}

/// A single GET request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Source on whose behalf the request is made. Used for errors and logs.
    pub source: SourceId,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Every request must carry a budget; there is no unbounded fetch.
    pub timeout: Duration,
    pub charset: Charset,
}

impl FetchRequest {
    pub fn get(source: SourceId, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            source,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout,
            charset: Charset::Declared,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn detect_charset(mut self) -> Self {
        self.charset = Charset::Detect;
        self
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A decoded response.
///
/// Non-2xx answers are still responses: several sources serve their
/// "nothing found" pages with error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status_code: u16,
    /// URL after redirects.
    pub final_url: String,
    pub body: String,
    /// Name of the encoding the body was decoded with.
    pub encoding: String,
}

/// Retry-free, timeout-bounded HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET. Transport failures and timeouts are returned immediately.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, AvailabilityError>;

    /// A client with its own cookie jar, for sources that must be primed
    /// before they accept a query. Sessions are never shared between resolvers.
    fn session(&self) -> Result<Arc<dyn HttpClient>, AvailabilityError>;
}
