//! Error types and failure classification for the availability crate.
//!
//! This module provides:
//! - [`AvailabilityError`]: The error enum for every fallible step of a resolution
//! - [`FailureKind`]: Classification used when an error is degraded to a status
//!
//! Errors never leave a resolver. The resolver boundary turns every
//! [`AvailabilityError`] into the `warn`/"error" status, so callers of the
//! coordinator only ever see [`Status`](crate::models::Status) values.

mod failure;

pub use failure::FailureKind;

use thiserror::Error;

/// Errors that can occur while resolving availability for a keyword.
#[derive(Error, Debug)]
pub enum AvailabilityError {
    /// The keyword was empty after trimming.
    #[error("Keyword is empty")]
    EmptyKeyword,

    /// The request did not complete within its timeout budget.
    #[error("Timeout: {source_id} ({url})")]
    Timeout {
        /// The source being queried
        source_id: String,
        /// The URL that timed out
        url: String,
    },

    /// Connection refused, DNS failure, TLS failure or any other transport problem.
    #[error("Transport error: {source_id} - {message}")]
    Transport {
        /// The source being queried
        source_id: String,
        /// The underlying transport message
        message: String,
    },

    /// A URL could not be assembled from its parts.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response could not be interpreted (missing markup, bad selector, bad encoding).
    #[error("Parse error: {source_id} - {message}")]
    Parse {
        /// The source whose response failed to parse
        source_id: String,
        /// What went wrong
        message: String,
    },

    /// The resolver task panicked or was aborted before producing a status.
    #[error("Resolver task failed: {source_id} - {message}")]
    TaskFailed {
        /// The source whose task failed
        source_id: String,
        /// Join error message
        message: String,
    },
}

impl AvailabilityError {
    /// Builds a transport or timeout error from a `reqwest` failure.
    pub fn from_reqwest(source_id: &str, url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                source_id: source_id.to_string(),
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                source_id: source_id.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse(source_id: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            source_id: source_id.to_string(),
            message: message.into(),
        }
    }

    /// Returns the failure classification for this error.
    ///
    /// - [`FailureKind::Transport`]: the network did not deliver a response
    /// - [`FailureKind::Parse`]: a response arrived but could not be interpreted
    /// - [`FailureKind::Input`]: the request was rejected before any network call
    ///
    /// # Examples
    ///
    /// ```
    /// use bookfinder_availability::errors::{AvailabilityError, FailureKind};
    ///
    /// let error = AvailabilityError::Timeout {
    ///     source_id: "kani".to_string(),
    ///     url: "https://www.kani-lib.jp/".to_string(),
    /// };
    /// assert_eq!(error.failure_kind(), FailureKind::Transport);
    ///
    /// assert_eq!(AvailabilityError::EmptyKeyword.failure_kind(), FailureKind::Input);
    /// ```
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::EmptyKeyword | Self::InvalidUrl(_) => FailureKind::Input,
            Self::Timeout { .. } | Self::Transport { .. } | Self::TaskFailed { .. } => {
                FailureKind::Transport
            }
            Self::Parse { .. } => FailureKind::Parse,
        }
    }
}
