//! Content extraction from raw HTML
//!
//! This module turns fetched markup into:
//! - The primary readable text of the page (for word counts and tone analysis)
//! - Page metadata (title, meta description, canonical link, headings)

mod metadata;
mod text;

pub use metadata::{extract_metadata, PageMetadata};
pub use text::extract_text;

use thiserror::Error;

/// Default cap on extracted text, in characters
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// Errors that can occur during extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("No readable text found in page")]
    Empty,
}

/// Text extraction seam used by the page pipeline
pub trait TextExtractor: Send + Sync {
    /// Extracts the primary text content of a page
    fn extract_text(&self, html: &str) -> Result<String, ExtractError>;
}

/// Readability-style extractor backed by [`extract_text`]
#[derive(Debug, Clone, Copy)]
pub struct ReadabilityExtractor {
    max_length: usize,
}

impl ReadabilityExtractor {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for ReadabilityExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_LENGTH)
    }
}

impl TextExtractor for ReadabilityExtractor {
    fn extract_text(&self, html: &str) -> Result<String, ExtractError> {
        extract_text(html, self.max_length)
    }
}
