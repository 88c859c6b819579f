//! Library A: Gifu City Library OPAC.
//!
//! The OPAC rejects cold requests, so every query starts with a priming
//! request against the landing page on a fresh session. Requests without a
//! usable session are redirected to the media center host, which is treated
//! as "not found".
//!
//! Any response that is not recognised as "not found" resolves to
//! "available". The page title is inspected for logging only.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::traits::{contains_any, AvailabilityResolver, Resolution};
use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;
use crate::http::{FetchRequest, HttpClient};
use crate::models::{SourceId, Status};
use crate::urls::{gifu_search_params, GIFU_SEARCH_URL, GIFU_TOP_URL};

/// Host the OPAC redirects to when it has no session for the request.
pub const NO_SESSION_HOST: &str = "g-mediacosmos.jp";

/// Phrases the OPAC uses for an empty result set.
pub const NO_HIT_PHRASES: &[&str] = &["該当する資料はありません", "該当するリストが存在しません"];

/// Title markers of a result page.
pub const RESULT_TITLE_MARKERS: &[&str] = &["検索結果", "資料検索"];

const SOURCE: SourceId = SourceId::Gifu;

/// Library A resolver.
pub struct GifuLibraryResolver {
    http: Arc<dyn HttpClient>,
    config: AvailabilityConfig,
}

impl GifuLibraryResolver {
    pub fn new(http: Arc<dyn HttpClient>, config: AvailabilityConfig) -> Self {
        Self { http, config }
    }
}

/// Classify a search response.
pub fn classify(final_url: &str, body: &str) -> Status {
    if landed_on_no_session_host(final_url) || contains_any(body, NO_HIT_PHRASES) {
        return Status::not_found();
    }

    let title = page_title(body).unwrap_or_default();
    if contains_any(&title, RESULT_TITLE_MARKERS) {
        debug!("gifu result page recognised by title '{}'", title);
    } else {
        debug!("gifu page title '{}' not recognised, assuming hit", title);
    }
    Status::available()
}

/// Only the host counts; the keyword itself may mention the host name.
fn landed_on_no_session_host(final_url: &str) -> bool {
    Url::parse(final_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .map(|host| host == NO_SESSION_HOST || host.ends_with(&format!(".{}", NO_SESSION_HOST)))
        .unwrap_or(false)
}

fn page_title(body: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(body);
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

#[async_trait]
impl AvailabilityResolver for GifuLibraryResolver {
    fn source(&self) -> SourceId {
        SOURCE
    }

    async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError> {
        let session = self.http.session()?;

        debug!("Priming gifu session");
        session
            .fetch(FetchRequest::get(SOURCE, GIFU_TOP_URL, self.config.short_timeout))
            .await?;

        let response = session
            .fetch(
                FetchRequest::get(SOURCE, GIFU_SEARCH_URL, self.config.short_timeout)
                    .query_pairs(gifu_search_params(keyword))
                    .detect_charset(),
            )
            .await?;

        let status = classify(&response.final_url, &response.body);
        debug!("gifu classified '{}' as {}", keyword, status.severity());
        Ok(Resolution::new(status))
    }
}
