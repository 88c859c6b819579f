//! Google Books volumes search.
//!
//! Asks for the single best Japanese-language book match of a keyword and
//! maps it into [`BookMetadata`].

mod models;

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::metadata::{BookMetadata, BookMetadataLookup};

use models::{VolumeInfo, VolumesResponse};

const ISBN_13: &str = "ISBN_13";
const ISBN_10: &str = "ISBN_10";

/// Query parameters for a keyword search.
pub fn volumes_query(keyword: &str) -> Vec<(&'static str, String)> {
    vec![
        ("q", keyword.to_string()),
        ("maxResults", "1".to_string()),
        ("printType", "books".to_string()),
        ("langRestrict", "ja".to_string()),
    ]
}

/// Google Books metadata client.
pub struct GoogleBooksClient {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl GoogleBooksClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Fetch the best match, surfacing every failure.
    pub async fn fetch(&self, keyword: &str) -> Result<Option<BookMetadata>, CatalogError> {
        let url = self.config.endpoint.as_str();
        debug!("Google Books lookup for '{}'", keyword);

        let body = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(&volumes_query(keyword))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| CatalogError::from_reqwest(url, e))?
            .text()
            .await
            .map_err(|e| CatalogError::from_reqwest(url, e))?;

        parse_volumes(&body)
    }
}

#[async_trait]
impl BookMetadataLookup for GoogleBooksClient {
    async fn lookup(&self, keyword: &str) -> Option<BookMetadata> {
        match self.fetch(keyword).await {
            Ok(book) => book,
            Err(e) => {
                warn!("Metadata lookup for '{}' failed: {}", keyword, e);
                None
            }
        }
    }
}

/// Map a volumes search body to its first result.
///
/// An empty or missing `items` list is `Ok(None)`.
pub fn parse_volumes(body: &str) -> Result<Option<BookMetadata>, CatalogError> {
    let response: VolumesResponse = serde_json::from_str(body)?;

    let Some(first) = response.items.and_then(|items| items.into_iter().next()) else {
        return Ok(None);
    };

    Ok(Some(first.volume_info.map(into_metadata).unwrap_or_default()))
}

fn into_metadata(info: VolumeInfo) -> BookMetadata {
    let mut isbn13 = None;
    let mut isbn10 = None;
    for id in info.industry_identifiers.unwrap_or_default() {
        match id.kind.as_deref() {
            Some(ISBN_13) => isbn13 = id.identifier,
            Some(ISBN_10) => isbn10 = id.identifier,
            _ => {}
        }
    }

    let thumbnail_url = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail));

    BookMetadata {
        title: info.title,
        subtitle: info.subtitle,
        authors: info.authors.unwrap_or_default(),
        publisher: info.publisher,
        published_date: info.published_date,
        description: info.description,
        categories: info.categories.unwrap_or_default(),
        page_count: info.page_count,
        language: info.language,
        thumbnail_url,
        info_url: info.info_link,
        isbn13,
        isbn10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_volumes_query() {
        let query = volumes_query("こころ");
        assert_eq!(query[0], ("q", "こころ".to_string()));
        assert!(query.contains(&("maxResults", "1".to_string())));
        assert!(query.contains(&("langRestrict", "ja".to_string())));
    }

    #[test]
    fn test_parse_full_volume() {
        let body = r#"{
            "items": [{
                "volumeInfo": {
                    "title": "こころ",
                    "authors": ["夏目漱石"],
                    "pageCount": 384,
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "4101010013"},
                        {"type": "ISBN_13", "identifier": "9784101010014"},
                        {"type": "OTHER", "identifier": "UOM:39015"}
                    ],
                    "imageLinks": {"smallThumbnail": "http://books.example/s.jpg"},
                    "infoLink": "http://books.example/info"
                }
            }]
        }"#;

        let book = parse_volumes(body).unwrap().unwrap();

        assert_eq!(book.title.as_deref(), Some("こころ"));
        assert_eq!(book.authors, vec!["夏目漱石"]);
        assert_eq!(book.page_count, Some(384));
        assert_eq!(book.isbn13.as_deref(), Some("9784101010014"));
        assert_eq!(book.isbn10.as_deref(), Some("4101010013"));
        assert_eq!(book.thumbnail_url.as_deref(), Some("http://books.example/s.jpg"));
        assert_eq!(book.info_url.as_deref(), Some("http://books.example/info"));
    }

    #[test]
    fn test_thumbnail_preferred_over_small() {
        let body = r#"{"items": [{"volumeInfo": {"imageLinks": {
            "thumbnail": "http://books.example/t.jpg",
            "smallThumbnail": "http://books.example/s.jpg"
        }}}]}"#;
        let book = parse_volumes(body).unwrap().unwrap();
        assert_eq!(book.thumbnail_url.as_deref(), Some("http://books.example/t.jpg"));
    }

    #[test]
    fn test_parse_no_items() {
        assert_eq!(parse_volumes(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap(), None);
        assert_eq!(parse_volumes(r#"{"items": []}"#).unwrap(), None);
        assert_eq!(parse_volumes(r#"{"items": null}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_nulls_become_empty() {
        let body = r#"{"items": [{"volumeInfo": {"title": "x", "authors": null, "categories": null}}]}"#;
        let book = parse_volumes(body).unwrap().unwrap();
        assert!(book.authors.is_empty());
        assert!(book.categories.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_volumes("<html>"), Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_none() {
        let config = CatalogConfig {
            timeout: Duration::from_secs(2),
            ..CatalogConfig::default()
        }
        .with_endpoint("http://127.0.0.1:9/volumes");
        let client = GoogleBooksClient::new(config).unwrap();

        assert!(client.fetch("こころ").await.is_err());
        assert_eq!(client.lookup("こころ").await, None);
    }
}
