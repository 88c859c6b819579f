//! Bookstore inventory search.
//!
//! Stock state is printed per title as a mark after a "在庫：" label, but the
//! marks are not always present. Classification therefore falls back through
//! the result count, and a positive count without marks is reported as a
//! warning carrying the count rather than upgraded to `ok`.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::traits::{contains_any, AvailabilityResolver, Resolution};
use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;
use crate::http::{FetchRequest, HttpClient};
use crate::models::{SourceId, Status};
use crate::urls::{bookstore_search_params, BOOKSTORE_SEARCH_URL};

/// Zero-result phrases, full-width and half-width colon.
pub const NO_HIT_PHRASES: &[&str] = &["検索結果：0件", "検索結果:0件"];

/// Mark meaning "no stock". Every other mark counts as stock.
pub const OUT_OF_STOCK_MARK: &str = "×";

lazy_static! {
    /// `<strong>N</strong>件中`
    static ref RESULT_COUNT: Regex =
        Regex::new(r"<strong>\s*([0-9０-９]+)\s*</strong>\s*件中").expect("valid result count pattern");
    /// `在庫： ○` and friends
    static ref STOCK_MARK: Regex =
        Regex::new(r"在庫：\s*([○×△▲])").expect("valid stock mark pattern");
}

const SOURCE: SourceId = SourceId::Bookstore;

/// Bookstore resolver.
pub struct BookstoreResolver {
    http: Arc<dyn HttpClient>,
    config: AvailabilityConfig,
}

impl BookstoreResolver {
    pub fn new(http: Arc<dyn HttpClient>, config: AvailabilityConfig) -> Self {
        Self { http, config }
    }
}

/// Result count printed above the list, if present.
///
/// Accepts ASCII and full-width digits. Counts beyond `u64` saturate.
pub fn extract_result_count(body: &str) -> Option<u64> {
    RESULT_COUNT
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_count(m.as_str()))
}

fn parse_count(digits: &str) -> Option<u64> {
    digits.chars().try_fold(0u64, |total, c| {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        Some(total.saturating_mul(10).saturating_add(u64::from(digit)))
    })
}

/// Every stock mark on the page, in document order.
pub fn extract_stock_marks(body: &str) -> Vec<&str> {
    STOCK_MARK
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Classify a search result page. First matching rule wins.
pub fn classify(body: &str) -> Status {
    if contains_any(body, NO_HIT_PHRASES) {
        return Status::not_found();
    }

    let total = extract_result_count(body);
    if total == Some(0) {
        return Status::not_found();
    }

    let marks = extract_stock_marks(body);
    if !marks.is_empty() {
        return if marks.iter().any(|mark| *mark != OUT_OF_STOCK_MARK) {
            Status::in_stock()
        } else {
            Status::not_found()
        };
    }

    match total {
        Some(count) if count > 0 => Status::hit_count(count),
        _ => Status::undetermined(),
    }
}

#[async_trait]
impl AvailabilityResolver for BookstoreResolver {
    fn source(&self) -> SourceId {
        SOURCE
    }

    async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError> {
        let response = self
            .http
            .fetch(
                FetchRequest::get(SOURCE, BOOKSTORE_SEARCH_URL, self.config.short_timeout)
                    .query_pairs(bookstore_search_params(keyword))
                    .detect_charset(),
            )
            .await?;

        let status = classify(&response.body);
        debug!("bookstore classified '{}' as {} ({})", keyword, status.severity(), status.text());
        Ok(Resolution::new(status))
    }
}
