//! Aggregation coordinator.
//!
//! Fans one keyword out to every configured resolver and collects the
//! results. Resolvers share no state, so they run as independent tokio tasks:
//!
//! - A resolver error is already a status by the time it leaves the resolver.
//! - A resolver that panics is caught here when its task is joined and
//!   reported as `warn`/"error"; the other entries are unaffected.
//!
//! There is no ordering between sources. The pass is complete when every
//! task has finished, each bounded by its own request timeouts.

mod report;

pub use report::AvailabilityReport;

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::models::{Keyword, SourceId, SourceResult, Status};
use crate::resolver::{
    AvailabilityResolver, BookstoreResolver, GifuLibraryResolver, KaniLibraryResolver,
    RetailChainResolver,
};
use crate::urls;

/// Coordinator over a fixed set of resolvers.
pub struct AvailabilityCoordinator {
    resolvers: Vec<Arc<dyn AvailabilityResolver>>,
}

impl AvailabilityCoordinator {
    /// Create a coordinator over arbitrary resolvers.
    pub fn new(resolvers: Vec<Arc<dyn AvailabilityResolver>>) -> Self {
        Self { resolvers }
    }

    /// The standard four sources over a shared HTTP client.
    ///
    /// Each resolver opens its own sessions from the client, so nothing
    /// stateful is shared between them.
    pub fn with_http(http: Arc<dyn HttpClient>, config: AvailabilityConfig) -> Self {
        let resolvers: Vec<Arc<dyn AvailabilityResolver>> = vec![
            Arc::new(GifuLibraryResolver::new(Arc::clone(&http), config.clone())),
            Arc::new(KaniLibraryResolver::new(Arc::clone(&http), config.clone())),
            Arc::new(BookstoreResolver::new(Arc::clone(&http), config.clone())),
            Arc::new(RetailChainResolver::new(http, config)),
        ];
        Self::new(resolvers)
    }

    /// The standard four sources over the production HTTP client.
    pub fn from_config(config: AvailabilityConfig) -> Result<Self, AvailabilityError> {
        let http = ReqwestHttpClient::new(&config)?;
        Ok(Self::with_http(Arc::new(http), config))
    }

    /// Sources this coordinator resolves.
    pub fn sources(&self) -> Vec<SourceId> {
        self.resolvers.iter().map(|r| r.source()).collect()
    }

    /// Resolve every source for a keyword.
    ///
    /// Never fails: the report has exactly one entry per configured resolver.
    /// A keyword that is empty after trimming is not sent anywhere; every
    /// source reports "empty keyword".
    ///
    /// # Panics
    ///
    /// Each resolver runs on a spawned task, so this must be polled from
    /// within a Tokio runtime. Polling it elsewhere panics.
    pub async fn resolve_all(&self, keyword: &str) -> AvailabilityReport {
        let keyword = keyword.trim();
        let mut report = AvailabilityReport::new(keyword);

        if keyword.is_empty() {
            warn!("Refusing to resolve an empty keyword");
            for resolver in &self.resolvers {
                report.insert(SourceResult::new(
                    resolver.source(),
                    Status::empty_keyword(),
                    Some(resolver.default_url(keyword)),
                ));
            }
            return report;
        }

        info!("Resolving '{}' across {} sources", keyword, self.resolvers.len());

        let tasks = self
            .resolvers
            .iter()
            .map(|resolver| run_isolated(Arc::clone(resolver), keyword.to_string()));

        for result in join_all(tasks).await {
            debug!(
                "{} -> {} ({})",
                result.source,
                result.status.severity(),
                result.status.text()
            );
            report.insert(result);
        }

        report
    }

    /// Resolve a validated keyword.
    pub async fn resolve_keyword(&self, keyword: &Keyword) -> AvailabilityReport {
        self.resolve_all(keyword.as_str()).await
    }

    /// Resolve only the retail chain, returning its status and the
    /// discovered link.
    ///
    /// # Panics
    ///
    /// Like [`resolve_all`](Self::resolve_all), needs a Tokio runtime.
    pub async fn resolve_retail_chain(&self, keyword: &str) -> (Status, String) {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return (
                Status::empty_keyword(),
                urls::build_retail_chain_search_url(keyword),
            );
        }

        let Some(resolver) = self
            .resolvers
            .iter()
            .find(|r| r.source() == SourceId::RetailChain)
        else {
            warn!("No retail chain resolver configured");
            return (Status::error(), urls::build_retail_chain_entry_url());
        };

        let result = run_isolated(Arc::clone(resolver), keyword.to_string()).await;
        let url = result
            .url
            .unwrap_or_else(|| urls::build_retail_chain_search_url(keyword));
        (result.status, url)
    }
}

/// Run one resolver on its own task so a panic cannot reach the caller.
///
/// Requires a Tokio runtime; `tokio::spawn` panics without one.
async fn run_isolated(resolver: Arc<dyn AvailabilityResolver>, keyword: String) -> SourceResult {
    let source = resolver.source();
    let error_url = resolver.error_url(&keyword);

    let handle = tokio::spawn(async move { resolver.resolve(&keyword).await });

    match handle.await {
        Ok(result) => result,
        Err(e) => {
            let error = AvailabilityError::TaskFailed {
                source_id: source.to_string(),
                message: e.to_string(),
            };
            warn!("{}", error);
            SourceResult::new(source, Status::error(), Some(error_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::resolver::Resolution;
    use crate::testing::{MockHttpClient, MockReply};
    use async_trait::async_trait;

    struct PanickingResolver;

    #[async_trait]
    impl AvailabilityResolver for PanickingResolver {
        fn source(&self) -> SourceId {
            SourceId::Bookstore
        }

        async fn check(&self, _keyword: &str) -> Result<Resolution, AvailabilityError> {
            panic!("resolver bug");
        }
    }

    struct FixedResolver(SourceId, Status);

    #[async_trait]
    impl AvailabilityResolver for FixedResolver {
        fn source(&self) -> SourceId {
            self.0
        }

        async fn check(&self, _keyword: &str) -> Result<Resolution, AvailabilityError> {
            Ok(Resolution::new(self.1.clone()))
        }
    }

    fn happy_http() -> MockHttpClient {
        MockHttpClient::new()
            .on("top.do", MockReply::html(""))
            .on("search-standard.do", MockReply::html("<title>検索結果</title>"))
            .on("OPWSRCH1.CSP", MockReply::html(""))
            .on("OPWSRCHLIST.CSP", MockReply::html("貸出中"))
            .on("BookSearchExec.action", MockReply::html("<strong>0</strong>件中"))
            .on("search/result/?keyword", MockReply::html("<p>no anchors</p>"))
    }

    #[tokio::test]
    async fn test_resolve_all_covers_every_source() {
        let coordinator =
            AvailabilityCoordinator::with_http(Arc::new(happy_http()), AvailabilityConfig::default());

        let report = coordinator.resolve_all("  こころ ").await;

        assert_eq!(report.keyword(), "こころ");
        assert_eq!(report.len(), 4);
        assert_eq!(report.status(SourceId::Gifu), Some(&Status::available()));
        assert_eq!(report.status(SourceId::Kani), Some(&Status::checked_out()));
        assert_eq!(
            report.status(SourceId::Bookstore).map(Status::severity),
            Some(Severity::NotFound)
        );
        assert_eq!(
            report.status(SourceId::RetailChain),
            Some(&Status::undetermined())
        );
        assert!(report.iter().all(|r| r.url.is_some()));
    }

    #[tokio::test]
    async fn test_one_transport_failure_does_not_affect_others() {
        let http = MockHttpClient::new()
            .on("top.do", MockReply::html(""))
            .on("search-standard.do", MockReply::html("<title>検索結果</title>"))
            .on("OPWSRCH1.CSP", MockReply::html(""))
            .on("OPWSRCHLIST.CSP", MockReply::Refused)
            .on("BookSearchExec.action", MockReply::html("在庫： ○"))
            .on("search/result/?keyword", MockReply::html(""));
        let coordinator = AvailabilityCoordinator::with_http(Arc::new(http), AvailabilityConfig::default());

        let report = coordinator.resolve_all("x").await;

        assert_eq!(report.status(SourceId::Kani), Some(&Status::error()));
        assert_eq!(report.status(SourceId::Gifu), Some(&Status::available()));
        assert_eq!(report.status(SourceId::Bookstore), Some(&Status::in_stock()));
        assert_eq!(
            report.status(SourceId::RetailChain),
            Some(&Status::undetermined())
        );
    }

    #[tokio::test]
    async fn test_panicking_resolver_is_contained() {
        let coordinator = AvailabilityCoordinator::new(vec![
            Arc::new(PanickingResolver),
            Arc::new(FixedResolver(SourceId::Gifu, Status::in_stock())),
        ]);

        let report = coordinator.resolve_all("x").await;

        assert_eq!(report.len(), 2);
        assert_eq!(report.status(SourceId::Bookstore), Some(&Status::error()));
        assert_eq!(report.status(SourceId::Gifu), Some(&Status::in_stock()));
        assert_eq!(
            report.get(SourceId::Bookstore).and_then(|r| r.url.clone()),
            Some(urls::build_bookstore_url("x"))
        );
    }

    #[tokio::test]
    async fn test_panicking_transport_is_contained() {
        let http = MockHttpClient::new()
            .on("BookSearchExec.action", MockReply::Panic)
            .on("", MockReply::html(""));
        let coordinator = AvailabilityCoordinator::with_http(Arc::new(http), AvailabilityConfig::default());

        let report = coordinator.resolve_all("x").await;

        assert_eq!(report.len(), 4);
        assert_eq!(report.status(SourceId::Bookstore), Some(&Status::error()));
        assert_eq!(report.status(SourceId::Kani), Some(&Status::available()));
    }

    #[tokio::test]
    async fn test_empty_keyword_makes_no_requests() {
        let http = happy_http();
        let coordinator =
            AvailabilityCoordinator::with_http(Arc::new(http.clone()), AvailabilityConfig::default());

        let report = coordinator.resolve_all(" \t ").await;

        assert_eq!(report.len(), 4);
        assert!(report
            .iter()
            .all(|r| r.status == Status::empty_keyword() && r.url.is_some()));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_retail_chain() {
        let coordinator =
            AvailabilityCoordinator::with_http(Arc::new(happy_http()), AvailabilityConfig::default());

        let (status, url) = coordinator.resolve_retail_chain("海辺のカフカ").await;
        assert_eq!(status, Status::undetermined());
        assert_eq!(url, urls::build_retail_chain_search_url("海辺のカフカ"));
    }

    #[tokio::test]
    async fn test_resolve_retail_chain_without_resolver() {
        let coordinator = AvailabilityCoordinator::new(vec![Arc::new(FixedResolver(
            SourceId::Gifu,
            Status::available(),
        ))]);

        let (status, url) = coordinator.resolve_retail_chain("x").await;
        assert_eq!(status, Status::error());
        assert_eq!(url, urls::build_retail_chain_entry_url());
    }

    #[test]
    fn test_resolve_all_runs_on_a_plain_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let coordinator = AvailabilityCoordinator::new(vec![Arc::new(FixedResolver(
            SourceId::Kani,
            Status::in_stock(),
        ))]);

        let report = runtime.block_on(coordinator.resolve_all("x"));
        assert_eq!(report.status(SourceId::Kani), Some(&Status::in_stock()));
    }

    #[test]
    fn test_sources() {
        let coordinator =
            AvailabilityCoordinator::with_http(Arc::new(MockHttpClient::new()), AvailabilityConfig::default());
        assert_eq!(coordinator.sources(), SourceId::RESOLVED.to_vec());
    }
}
