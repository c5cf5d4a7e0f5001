//! Content Auditor: SEO, accessibility and tone auditing for web pages
//!
//! This crate fetches a bounded list of pages, extracts their main text, scores
//! them with deterministic SEO and accessibility rules, optionally asks a local
//! language model for a tone summary under a hard call budget, and caches every
//! successful audit on disk so repeated runs skip finished work.

pub mod budget;
pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod tone;

use thiserror::Error;

/// Main error type for Content Auditor operations
///
/// Only run-level problems surface here: configuration, the input list, the
/// cache directory, report files and client setup. Per-page failures are
/// folded into [`pipeline::PageResult::error`] and never abort a run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Fetch client error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Tone analyzer error: {0}")]
    Tone(#[from] tone::ToneError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Content Auditor operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use budget::{BudgetManager, BudgetState};
pub use cache::{Cache, CacheKey};
pub use config::Config;
pub use pipeline::{BatchRunner, PagePipeline, PageResult, PageStage};
pub use rules::RuleBundle;
pub use tone::ToneSummary;
