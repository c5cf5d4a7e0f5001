//! Page-processing pipeline
//!
//! This module contains the core audit logic:
//! - `PagePipeline`: cache check, fetch, extract, rules, budgeted tone
//!   analysis, assembly and cache write for one URL
//! - `BatchRunner`: drives a bounded, ordered list of URLs through the
//!   pipeline and stops early when the model budget runs out
//! - `PageResult`: the serialized outcome of one audit
//! - `PageStage`: the per-URL state machine

mod batch;
mod page;
mod result;
mod stage;

pub use batch::{BatchReport, BatchRunner, RunOptions};
pub use page::{PageFailure, PagePipeline, ProcessedPage};
pub use result::{PageResult, Scores};
pub use stage::PageStage;
