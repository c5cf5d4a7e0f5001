//! Budget module for capping costly model calls
//!
//! A [`BudgetManager`] is constructed once per run and shared by reference with
//! every page audit. It is one of only two pieces of mutable shared state in a
//! run (the other is the [`crate::cache::Cache`]).
//!
//! # Components
//!
//! - `BudgetManager`: counts calls per type against a fixed ceiling
//! - `BudgetReservation`: an in-flight claim on one call slot
//! - `BudgetState`: a point-in-time snapshot for reporting

mod manager;

pub use manager::{BudgetManager, BudgetReservation, BudgetState};

/// Call type used when the caller does not care about per-type accounting
pub const DEFAULT_CALL_TYPE: &str = "default";

/// Call type recorded for each successful tone analysis
pub const TONE_ANALYSIS: &str = "tone_analysis";
