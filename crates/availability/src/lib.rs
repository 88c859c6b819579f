//! Book Finder Availability Crate
//!
//! This crate resolves the availability of a book title across sources that
//! expose no API: two library OPACs, a bookstore inventory search and a
//! retail chain stock lookup.
//!
//! # Overview
//!
//! The availability crate provides:
//! - A three-valued status taxonomy shared by every source
//! - A retry-free, timeout-bounded HTTP layer with session priming and
//!   charset detection
//! - One resolver per source, each a total function from keyword to status
//! - A coordinator that fans a keyword out to all resolvers
//! - Pure deep-link builders that work even when a resolver fails
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     Keyword      |
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   Coordinator    |  (one task per resolver)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    Resolvers     | --> |   HttpClient     |  (sessions, timeouts, charset)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  SourceResult    |  (status + link)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Status`] / [`Severity`] - Outcome of one resolution
//! - [`SourceId`] - Which source a result belongs to
//! - [`SourceResult`] - Status plus deep link
//! - [`AvailabilityReport`] - All results for one keyword
//! - [`AvailabilityConfig`] - Timeouts, user agent, store keyword

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod http;
pub mod models;
pub mod resolver;
pub mod testing;
pub mod urls;

pub use config::AvailabilityConfig;
pub use coordinator::{AvailabilityCoordinator, AvailabilityReport};
pub use errors::{AvailabilityError, FailureKind};
pub use http::{Charset, FetchRequest, FetchResponse, HttpClient, ReqwestHttpClient};
pub use models::{
    Keyword, RetailChainCandidate, RetailChainLinks, Severity, SourceId, SourceResult, Status,
};
pub use resolver::{
    AvailabilityResolver, BookstoreResolver, GifuLibraryResolver, KaniLibraryResolver,
    Resolution, RetailChainResolver,
};
pub use urls::{
    build_bookstore_url, build_gifu_url, build_kani_url, build_marketplace_url,
    build_retail_chain_entry_url, build_retail_chain_search_url, build_retail_chain_stock_url,
    build_url,
};
