//! HTTP access layer.
//!
//! This module contains:
//! - The `HttpClient` trait resolvers fetch through
//! - `FetchRequest`/`FetchResponse`, the request and decoded response types
//! - `ReqwestHttpClient`, the production implementation
//! - Charset detection for sources with unreliable declarations
//!
//! There are no retries anywhere in this layer. A failed call is reported once
//! and the resolver decides what it means.

mod charset;
mod client;
mod traits;

pub use charset::{charset_from_content_type, decode_body};
pub use client::ReqwestHttpClient;
pub use traits::{Charset, FetchRequest, FetchResponse, HttpClient};
