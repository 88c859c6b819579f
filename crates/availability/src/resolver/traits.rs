//! Availability resolver trait definitions.
//!
//! This module defines the `AvailabilityResolver` trait every source
//! implements, and the boundary that turns resolver errors into statuses.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::AvailabilityError;
use crate::models::{SourceId, SourceResult, Status};
use crate::urls;

/// Outcome of a successful resolver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: Status,
    /// Dynamically discovered link. `None` means the source's static deep link applies.
    pub url: Option<String>,
}

impl Resolution {
    pub fn new(status: Status) -> Self {
        Self { status, url: None }
    }

    pub fn with_url(status: Status, url: impl Into<String>) -> Self {
        Self {
            status,
            url: Some(url.into()),
        }
    }
}

/// Trait for availability sources.
///
/// Implementors provide [`check`](Self::check), which may fail. Callers use
/// [`resolve`](Self::resolve), which never does: every error is logged and
/// degraded to the `warn`/"error" status with a usable link.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use bookfinder_availability::resolver::{AvailabilityResolver, Resolution};
///
/// struct AlwaysInStock;
///
/// #[async_trait]
/// impl AvailabilityResolver for AlwaysInStock {
///     fn source(&self) -> SourceId {
///         SourceId::Bookstore
///     }
///
///     async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError> {
///         Ok(Resolution::new(Status::in_stock()))
///     }
/// }
/// ```
#[async_trait]
pub trait AvailabilityResolver: Send + Sync {
    /// The source this resolver queries.
    fn source(&self) -> SourceId;

    /// Link shown when the resolver does not supply one.
    fn default_url(&self, keyword: &str) -> String {
        urls::build_url(self.source(), keyword)
    }

    /// Link shown when resolution failed.
    fn error_url(&self, keyword: &str) -> String {
        self.default_url(keyword)
    }

    /// Run the source's protocol and classify the response.
    ///
    /// Ambiguous signals are `Ok` results with a `warn` status, not errors.
    async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError>;

    /// Total version of [`check`](Self::check).
    async fn resolve(&self, keyword: &str) -> SourceResult {
        let source = self.source();
        match self.check(keyword).await {
            Ok(resolution) => {
                let url = resolution
                    .url
                    .unwrap_or_else(|| self.default_url(keyword));
                SourceResult::new(source, resolution.status, Some(url))
            }
            Err(e) => {
                warn!(
                    "Resolver '{}' failed ({}): {}",
                    source,
                    e.failure_kind(),
                    e
                );
                SourceResult::new(source, Status::error(), Some(self.error_url(keyword)))
            }
        }
    }
}

/// True if `body` contains any of the markers.
pub(crate) fn contains_any(body: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| body.contains(marker))
}
