//! Page fetching
//!
//! This module handles all page requests for the auditor, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - Following redirects up to a fixed hop limit
//! - Classifying failures (timeout, HTTP status, transport, body)

mod fetcher;

pub use fetcher::{build_http_client, HttpFetcher};

use async_trait::async_trait;
use thiserror::Error;

/// Reasons a page could not be fetched
///
/// A failed fetch never carries a partial body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Page fetching seam used by the page pipeline
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML of `url`, following redirects
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
