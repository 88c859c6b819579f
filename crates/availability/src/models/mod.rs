//! Availability models
//!
//! This module contains the core data types shared by every resolver:
//! - `status` - The status taxonomy (Status, Severity)
//! - `source` - Source identity and per-source results (SourceId, SourceResult)
//! - `keyword` - Validated search keyword (Keyword)
//! - `candidate` - Retail chain discovery state (RetailChainCandidate, RetailChainLinks)

mod candidate;
mod keyword;
mod source;
mod status;

pub use candidate::{RetailChainCandidate, RetailChainLinks};
pub use keyword::Keyword;
pub use source::{SourceId, SourceResult};
pub use status::{Severity, Status};
