//! Content-addressed persistent cache of page audits
//!
//! Each audited URL is stored as one JSON file named by the SHA-256 of the
//! URL string. URLs are hashed verbatim: `https://a.com/x` and
//! `https://a.com/x/` are different entries.
//!
//! Caching is an optimization. Read failures are treated as misses and write
//! failures are reported to the caller, which logs and carries on.

mod key;
mod store;

pub use key::CacheKey;
pub use store::{Cache, CacheStats};

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize cache entry for {url}: {source}")]
    Serialization {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
