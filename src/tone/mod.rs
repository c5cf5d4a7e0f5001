//! Tone analysis through a local language model
//!
//! The analyzer sends one fixed prompt per page and expects a JSON object with
//! three fields back. Malformed model output is absorbed here and replaced by
//! a fixed "Unable to analyze" summary; only transport-level problems reach
//! the caller as [`ToneError`].

mod ollama;
mod prompt;

pub use ollama::OllamaToneAnalyzer;
pub use prompt::{build_prompt, parse_tone_response, truncate_chars};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used when the model output cannot be interpreted
pub const UNABLE_TO_ANALYZE: &str = "Unable to analyze";

/// Three-part tone summary of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneSummary {
    /// Brief readability assessment
    pub readability: String,

    /// Brief tone description
    pub tone: String,

    /// Potential risks or issues
    pub risks: String,
}

impl ToneSummary {
    /// Summary substituted when the model answered with something unusable
    pub fn unable_to_analyze(reason: &str) -> Self {
        Self {
            readability: UNABLE_TO_ANALYZE.to_string(),
            tone: UNABLE_TO_ANALYZE.to_string(),
            risks: format!("Analysis failed - {}", reason),
        }
    }
}

/// Errors that prevent a tone analysis from producing any summary
#[derive(Debug, Error)]
pub enum ToneError {
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Model endpoint returned an undecodable envelope: {0}")]
    Decode(String),

    #[error("Invalid model endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Tone analysis seam used by the page pipeline
#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    /// Analyzes page text
    ///
    /// Implementations truncate oversized input themselves.
    async fn analyze(&self, text: &str) -> Result<ToneSummary, ToneError>;
}
