//! Volumes search responses captured from the live endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bookfinder_catalog::google_books::parse_volumes;
use bookfinder_catalog::{BookMetadata, BookMetadataLookup, CachedMetadataLookup, SearchHistory};

const KOKORO: &str = include_str!("fixtures/volumes_kokoro.json");
const EMPTY: &str = include_str!("fixtures/volumes_empty.json");

/// Serves the fixtures as a lookup.
struct FixtureLookup;

#[async_trait]
impl BookMetadataLookup for FixtureLookup {
    async fn lookup(&self, keyword: &str) -> Option<BookMetadata> {
        let body = if keyword == "こころ" { KOKORO } else { EMPTY };
        parse_volumes(body).ok().flatten()
    }
}

#[test]
fn kokoro_volume_maps_every_field() {
    let book = parse_volumes(KOKORO).unwrap().unwrap();

    assert_eq!(book.title.as_deref(), Some("こころ"));
    assert_eq!(book.subtitle.as_deref(), Some("改版"));
    assert_eq!(book.authors_display().as_deref(), Some("夏目漱石"));
    assert_eq!(book.publisher.as_deref(), Some("新潮社"));
    assert_eq!(book.published_date.as_deref(), Some("2004-03"));
    assert_eq!(book.categories, vec!["Fiction"]);
    assert_eq!(book.page_count, Some(326));
    assert_eq!(book.language.as_deref(), Some("ja"));
    assert_eq!(book.isbn(), Some("9784101010137"));
    assert_eq!(book.isbn10.as_deref(), Some("4101010137"));
    assert!(book.thumbnail_url.as_deref().unwrap().ends_with("zoom=1"));
    assert!(book.info_url.as_deref().unwrap().starts_with("http://books.google.co.jp/"));
}

#[test]
fn kokoro_summary_is_five_sentences() {
    let book = parse_volumes(KOKORO).unwrap().unwrap();

    let summary = book.summary_excerpt(300).unwrap();

    assert!(summary.starts_with("親友を裏切って恋人を得た。しかし、親友は自殺した。"));
    assert!(summary.contains("三部からなる。"));
    assert!(!summary.contains("教科書"));
    assert!(summary.ends_with("。..."));
}

#[test]
fn empty_search_is_no_match() {
    assert_eq!(parse_volumes(EMPTY).unwrap(), None);
}

#[tokio::test]
async fn cached_fixture_lookup_with_history() {
    let cache = CachedMetadataLookup::new(Arc::new(FixtureLookup), Duration::from_secs(60));
    let mut history = SearchHistory::default();

    for keyword in ["こころ", "存在しない本", "こころ"] {
        history.add(keyword);
        cache.lookup(keyword).await;
    }

    assert_eq!(history.list(), vec!["こころ", "存在しない本"]);
    assert_eq!(cache.len().await, 2);
    assert!(cache.lookup("こころ").await.is_some());
    assert!(cache.lookup("存在しない本").await.is_none());
}
