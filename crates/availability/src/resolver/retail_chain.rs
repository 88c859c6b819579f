//! Retail chain store-scoped stock lookup.
//!
//! No single query returns stock for a store, so resolution runs in three
//! strictly ordered stages:
//!
//! 1. **Candidate discovery** - fetch the keyword listing and take the
//!    `workId` from the first anchor pointing at the selection route.
//! 2. **Product key extraction** - open the selection page for that work and
//!    read the `productKey` (ISBN/JAN) from the page, or from the tail of the
//!    redirected URL.
//! 3. **Stock fetch** - open the stock page for the work, edition and
//!    configured store, then classify.
//!
//! Stopping early after stage 1 or 2 is not an error: the result is
//! "undetermined" and links to the search listing. Candidate selection trusts
//! the source's ranking and always takes the first anchor; there is no
//! title or author matching.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::traits::{contains_any, AvailabilityResolver, Resolution};
use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;
use crate::http::{FetchRequest, HttpClient};
use crate::models::{RetailChainCandidate, RetailChainLinks, SourceId, Status};
use crate::urls::{
    build_retail_chain_entry_url, build_retail_chain_search_url, build_retail_chain_stock_url,
    retail_chain_select_params, RETAIL_CHAIN_SELECT_URL,
};

/// Phrases of a store that has the edition on its shelves.
pub const IN_STOCK_PHRASES: &[&str] = &["在庫あり"];

/// Phrases of a store without stock, including "ask the store about arrivals".
pub const OUT_OF_STOCK_PHRASES: &[&str] = &["在庫なし", "入荷予定は店舗にお問い合わせ下さい"];

lazy_static! {
    static ref SELECT_ROUTE: Regex =
        Regex::new(r"/search/result/select\?").expect("valid selection route pattern");
    static ref WORK_ID: Regex = Regex::new(r"workId=(\d+)").expect("valid work id pattern");
    static ref PRODUCT_KEY: Regex =
        Regex::new(r"productKey=(\d+)").expect("valid product key pattern");
    /// `.../<work>/<isbn>` at the end of a path
    static ref TRAILING_PRODUCT_KEY: Regex =
        Regex::new(r"/\d+/(\d{10,13})/?$").expect("valid trailing product key pattern");
}

const SOURCE: SourceId = SourceId::RetailChain;

/// Retail chain resolver.
pub struct RetailChainResolver {
    http: Arc<dyn HttpClient>,
    config: AvailabilityConfig,
}

impl RetailChainResolver {
    pub fn new(http: Arc<dyn HttpClient>, config: AvailabilityConfig) -> Self {
        Self { http, config }
    }

    /// Run stages 1 and 2 and assemble the links.
    ///
    /// When either stage finds nothing, the stock link is the search listing.
    pub async fn discover(&self, keyword: &str) -> Result<RetailChainLinks, AvailabilityError> {
        let search_url = build_retail_chain_search_url(keyword);
        let mut candidate = RetailChainCandidate::default();

        // Stage 1
        let listing = self
            .http
            .fetch(FetchRequest::get(SOURCE, &search_url, self.config.medium_timeout))
            .await?;
        candidate.work_id = extract_first_work_id(&listing.body)?;

        let Some(work_id) = candidate.work_id.clone() else {
            debug!("retail_chain: no selection anchor for '{}'", keyword);
            return Ok(RetailChainLinks::listing_only(search_url, candidate));
        };
        debug!("retail_chain: candidate workId={}", work_id);

        // Stage 2
        let selection = self
            .http
            .fetch(
                FetchRequest::get(SOURCE, RETAIL_CHAIN_SELECT_URL, self.config.medium_timeout)
                    .query_pairs(retail_chain_select_params(&work_id)),
            )
            .await?;
        candidate.product_key = extract_product_key(&selection.body, &selection.final_url);

        let Some(product_key) = candidate.product_key.clone() else {
            debug!("retail_chain: no productKey for workId={}", work_id);
            return Ok(RetailChainLinks::listing_only(search_url, candidate));
        };
        debug!("retail_chain: productKey={}", product_key);

        let stock_url = build_retail_chain_stock_url(&work_id, &product_key, &self.config.store_keyword);
        Ok(RetailChainLinks {
            search_url,
            stock_url,
            candidate,
        })
    }
}

/// `workId` of the first anchor that targets the selection route.
///
/// Only the first matching anchor is considered; if it carries no `workId`
/// the result is `None` even when later anchors would.
pub fn extract_first_work_id(html: &str) -> Result<Option<String>, AvailabilityError> {
    let selector = Selector::parse("a[href]")
        .map_err(|e| AvailabilityError::parse(SOURCE.as_str(), format!("anchor selector: {:?}", e)))?;
    let document = Html::parse_document(html);

    let href = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| SELECT_ROUTE.is_match(href));

    Ok(href
        .and_then(|href| WORK_ID.captures(href))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// `productKey` from the selection page body, else the trailing ISBN/JAN
/// segment of the redirected URL.
pub fn extract_product_key(body: &str, final_url: &str) -> Option<String> {
    if let Some(key) = PRODUCT_KEY.captures(body).and_then(|caps| caps.get(1)) {
        return Some(key.as_str().to_string());
    }

    let path = Url::parse(final_url).ok()?.path().to_string();
    TRAILING_PRODUCT_KEY
        .captures(&path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Classify the store-scoped stock page.
pub fn classify_stock(body: &str) -> Status {
    if contains_any(body, IN_STOCK_PHRASES) {
        Status::in_stock()
    } else if contains_any(body, OUT_OF_STOCK_PHRASES) {
        Status::not_found()
    } else {
        Status::undetermined()
    }
}

#[async_trait]
impl AvailabilityResolver for RetailChainResolver {
    fn source(&self) -> SourceId {
        SOURCE
    }

    fn error_url(&self, _keyword: &str) -> String {
        build_retail_chain_entry_url()
    }

    async fn check(&self, keyword: &str) -> Result<Resolution, AvailabilityError> {
        let links = self.discover(keyword).await?;

        if !links.is_complete() {
            return Ok(Resolution::with_url(Status::undetermined(), links.stock_url));
        }

        // Stage 3
        let response = self
            .http
            .fetch(
                FetchRequest::get(SOURCE, &links.stock_url, self.config.medium_timeout)
                    .detect_charset(),
            )
            .await?;

        let status = classify_stock(&response.body);
        debug!("retail_chain classified '{}' as {}", keyword, status.severity());
        Ok(Resolution::with_url(status, links.stock_url))
    }
}
