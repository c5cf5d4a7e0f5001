//! Output module for audit reports and run summaries
//!
//! This module handles:
//! - Writing per-page results as JSON lines
//! - Writing the flat CSV summary
//! - Recording and printing run statistics and the most common issues

mod reports;
pub mod stats;

pub use reports::{write_jsonl, write_reports, write_summary_csv, ReportPaths};
pub use stats::{print_statistics, print_top_issues, top_issues, RunStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
