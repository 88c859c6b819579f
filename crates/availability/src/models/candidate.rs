/// Item discovered by the retail chain search, pending edition and stock lookup.
///
/// Lives only for the duration of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetailChainCandidate {
    /// Source-assigned title identifier.
    pub work_id: Option<String>,
    /// Source-assigned edition identifier (ISBN/JAN shaped).
    pub product_key: Option<String>,
}

impl RetailChainCandidate {
    /// Both identifiers, if discovery got that far.
    pub fn identifiers(&self) -> Option<(&str, &str)> {
        match (&self.work_id, &self.product_key) {
            (Some(work_id), Some(product_key)) => Some((work_id, product_key)),
            _ => None,
        }
    }
}

/// Links produced by retail chain discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailChainLinks {
    /// Keyword search listing. Always valid.
    pub search_url: String,
    /// Store-scoped stock page, or the search listing when discovery stopped early.
    pub stock_url: String,
    pub candidate: RetailChainCandidate,
}

impl RetailChainLinks {
    /// Links for a discovery that stopped before reaching the stock page.
    pub fn listing_only(search_url: String, candidate: RetailChainCandidate) -> Self {
        Self {
            stock_url: search_url.clone(),
            search_url,
            candidate,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.candidate.identifiers().is_some()
    }
}
