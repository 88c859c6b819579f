//! Availability resolver abstractions and implementations.
//!
//! This module contains:
//! - The `AvailabilityResolver` trait that all sources implement
//! - One resolver per source (two library OPACs, a bookstore, a retail chain)
//!
//! # Architecture
//!
//! Each resolver owns its source's whole protocol: priming requests, query
//! parameters, and the marker lists used to classify the response. Marker
//! lists are public constants so contract tests can pin them against saved
//! pages. Classification functions are pure and take the decoded body, so
//! they can be tested without any HTTP.

mod traits;

pub mod bookstore;
pub mod gifu;
pub mod kani;
pub mod retail_chain;

pub use bookstore::BookstoreResolver;
pub use gifu::GifuLibraryResolver;
pub use kani::KaniLibraryResolver;
pub use retail_chain::RetailChainResolver;
pub use traits::{AvailabilityResolver, Resolution};
