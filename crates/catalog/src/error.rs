use thiserror::Error;

/// Errors from the bibliographic metadata endpoint.
///
/// Lookups surface these only through [`GoogleBooksClient::fetch`]; the
/// [`BookMetadataLookup`] implementations log them and report "no metadata".
///
/// [`GoogleBooksClient::fetch`]: crate::GoogleBooksClient::fetch
/// [`BookMetadataLookup`]: crate::BookMetadataLookup
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Metadata request timed out ({url})")]
    Timeout { url: String },

    #[error("Metadata transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status code.
    #[error("Metadata endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Metadata response could not be decoded: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
