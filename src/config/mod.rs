//! Configuration module for Content Auditor
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults documented
//! on each field.
//!
//! # Example
//!
//! ```no_run
//! use content_auditor::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Auditing at most {} pages", config.audit.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuditConfig, BudgetConfig, Config, ExtractConfig, FetchConfig, OutputConfig, ToneConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
