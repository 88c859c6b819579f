use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{SourceId, SourceResult, Status};
use crate::urls;

/// Results of one aggregation pass, one entry per configured source.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    keyword: String,
    results: BTreeMap<SourceId, SourceResult>,
}

impl AvailabilityReport {
    pub(crate) fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            results: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, result: SourceResult) {
        self.results.insert(result.source, result);
    }

    /// The trimmed keyword this report was produced for.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn get(&self, source: SourceId) -> Option<&SourceResult> {
        self.results.get(&source)
    }

    pub fn status(&self, source: SourceId) -> Option<&Status> {
        self.results.get(&source).map(|r| &r.status)
    }

    /// Source id to status, the shape the presentation layer renders.
    pub fn statuses(&self) -> BTreeMap<SourceId, Status> {
        self.results
            .iter()
            .map(|(source, result)| (*source, result.status.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Fallback marketplace link, always available.
    pub fn marketplace_url(&self) -> String {
        urls::build_marketplace_url(&self.keyword)
    }

    pub fn into_results(self) -> BTreeMap<SourceId, SourceResult> {
        self.results
    }
}
