//! Library B: Kani City Library OPAC.
//!
//! Same priming requirement as Library A, but the result list carries
//! per-copy markers, so this source distinguishes "in stock" from
//! "checked out".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::traits::{contains_any, AvailabilityResolver, Resolution};
use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;
use crate::http::{FetchRequest, HttpClient};
use crate::models::{SourceId, Status};
use crate::urls::{kani_search_params, KANI_ENTRY_URL, KANI_SEARCH_URL};

/// Phrases for an empty result set.
pub const NO_HIT_PHRASES: &[&str] = &["該当する資料はありません", "検索結果 0件"];

/// On-shelf marker.
pub const ON_SHELF_MARKERS: &[&str] = &["○ 在架あり"];

/// Checked-out or reserved markers.
pub const CHECKED_OUT_MARKERS: &[&str] = &["貸出中", "予約"];

const SOURCE: SourceId = SourceId::Kani;

/// Library B resolver.
pub struct KaniLibraryResolver {
    http: Arc<dyn HttpClient>,
    config: AvailabilityConfig,
}

impl KaniLibraryResolver {
    pub fn new(http: Arc<dyn HttpClient>, config: AvailabilityConfig) -> Self {
        Self { http, config }
    }
}

/// Classify a search list page. First matching rule wins.
pub fn classify(body: &str) -> Status {
    if contains_any(body, NO_HIT_PHRASES) {
        Status::not_found()
    } else if contains_any(body, ON_SHELF_MARKERS) {
        Status::in_stock()
    } else if contains_any(body, CHECKED_OUT_MARKERS) {
        Status::checked_out()
    } else {
        Status::available()
    }
}

#[async_trait]
impl AvailabilityResolver for KaniLibraryResolver {
    fn source(&self) -> SourceId {
        SOURCE
    }

    async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError> {
        let session = self.http.session()?;

        debug!("Priming kani session");
        session
            .fetch(FetchRequest::get(SOURCE, KANI_ENTRY_URL, self.config.short_timeout))
            .await?;

        let response = session
            .fetch(
                FetchRequest::get(SOURCE, KANI_SEARCH_URL, self.config.medium_timeout)
                    .query_pairs(kani_search_params(keyword))
                    .detect_charset(),
            )
            .await?;

        let status = classify(&response.body);
        debug!("kani classified '{}' as {}", keyword, status.severity());
        Ok(Resolution::new(status))
    }
}
