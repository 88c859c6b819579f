use serde::{Deserialize, Serialize};

use super::status::Status;

/// Identifier of an external source.
///
/// `Marketplace` has no resolver; it only ever appears as a fallback link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Gifu City Library OPAC.
    Gifu,
    /// Kani City Library OPAC.
    Kani,
    /// Gifu station bookstore inventory search.
    Bookstore,
    /// Retail chain store-scoped stock lookup.
    RetailChain,
    /// General online marketplace.
    Marketplace,
}

impl SourceId {
    /// Sources that have a resolver, in display order.
    pub const RESOLVED: [SourceId; 4] = [
        SourceId::Gifu,
        SourceId::Kani,
        SourceId::Bookstore,
        SourceId::RetailChain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Gifu => "gifu",
            SourceId::Kani => "kani",
            SourceId::Bookstore => "bookstore",
            SourceId::RetailChain => "retail_chain",
            SourceId::Marketplace => "marketplace",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::Gifu => "岐阜市立図書館",
            SourceId::Kani => "可児市立図書館",
            SourceId::Bookstore => "岐阜駅本屋",
            SourceId::RetailChain => "草叢BOOKS",
            SourceId::Marketplace => "Amazon",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one source for one keyword, plus the link a user can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResult {
    pub source: SourceId,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceResult {
    pub fn new(source: SourceId, status: Status, url: Option<String>) -> Self {
        Self {
            source,
            status,
            url,
        }
    }
}
