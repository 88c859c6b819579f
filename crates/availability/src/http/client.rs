//! `reqwest`-backed HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;

use super::charset::{charset_from_content_type, decode_body};
use super::traits::{FetchRequest, FetchResponse, HttpClient};
use crate::config::AvailabilityConfig;
use crate::errors::AvailabilityError;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Production HTTP client.
///
/// The plain client keeps no cookies. [`HttpClient::session`] builds a new
/// client with a private cookie jar.
pub struct ReqwestHttpClient {
    client: Client,
    user_agent: String,
}

impl ReqwestHttpClient {
    pub fn new(config: &AvailabilityConfig) -> Result<Self, AvailabilityError> {
        let client = Self::builder(&config.user_agent)
            .build()
            .map_err(|e| AvailabilityError::Transport {
                source_id: "http".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    fn builder(user_agent: &str) -> reqwest::ClientBuilder {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("ja,en-US;q=0.7,en;q=0.3"),
        );

        Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, AvailabilityError> {
        let source_id = request.source.as_str();

        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AvailabilityError::from_reqwest(source_id, &request.url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let declared = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AvailabilityError::from_reqwest(source_id, &request.url, e))?;

        let (body, encoding) = decode_body(&bytes, declared.as_deref(), request.charset);

        debug!(
            "{} GET {} -> {} ({} bytes, {}, final url {})",
            source_id,
            request.url,
            status_code,
            bytes.len(),
            encoding,
            final_url
        );

        Ok(FetchResponse {
            status_code,
            final_url,
            body,
            encoding: encoding.to_string(),
        })
    }

    fn session(&self) -> Result<Arc<dyn HttpClient>, AvailabilityError> {
        let client = Self::builder(&self.user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| AvailabilityError::Transport {
                source_id: "http".to_string(),
                message: format!("Failed to build session client: {}", e),
            })?;

        Ok(Arc::new(Self {
            client,
            user_agent: self.user_agent.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;
    use std::time::Duration;

    #[test]
    fn test_builds_from_default_config() {
        let client = ReqwestHttpClient::new(&AvailabilityConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_session_builds_independent_client() {
        let client = ReqwestHttpClient::new(&AvailabilityConfig::default()).unwrap();
        assert!(client.session().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = ReqwestHttpClient::new(&AvailabilityConfig::default()).unwrap();
        let request = FetchRequest::get(
            SourceId::Bookstore,
            "http://127.0.0.1:9/booksearch",
            Duration::from_secs(2),
        );

        let error = client.fetch(request).await.unwrap_err();
        assert!(matches!(
            error,
            AvailabilityError::Transport { .. } | AvailabilityError::Timeout { .. }
        ));
    }
}
