//! Book Finder Catalog Crate
//!
//! Companion data for an availability search that does not affect any
//! status: the bibliographic record of the best match and the caller's
//! recent keywords.
//!
//! # Core Types
//!
//! - [`BookMetadata`] - Title, authors, ISBNs, description and links
//! - [`BookMetadataLookup`] - Keyword to best match, never failing
//! - [`GoogleBooksClient`] - Lookup against the public volumes search
//! - [`CachedMetadataLookup`] - TTL cache in front of any lookup
//! - [`SearchHistory`] - Most-recent-first, deduplicated, capped keywords

pub mod cache;
pub mod config;
pub mod error;
pub mod google_books;
pub mod history;
pub mod metadata;

use std::sync::Arc;

pub use cache::CachedMetadataLookup;
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use google_books::GoogleBooksClient;
pub use history::SearchHistory;
pub use metadata::{BookMetadata, BookMetadataLookup};

/// Cached Google Books lookup built from configuration.
pub fn default_lookup(config: CatalogConfig) -> Result<CachedMetadataLookup, CatalogError> {
    let ttl = config.cache_ttl;
    let client = GoogleBooksClient::new(config)?;
    Ok(CachedMetadataLookup::new(Arc::new(client), ttl))
}
