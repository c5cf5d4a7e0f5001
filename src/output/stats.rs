//! Run statistics and issue frequency summaries
//!
//! This module turns a finished [`BatchReport`] into the figures printed at
//! the end of a run.

use crate::budget::BudgetState;
use crate::cache::CacheStats;
use crate::pipeline::{BatchReport, PageResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Summary of one audit run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of URLs attempted
    pub pages_processed: usize,

    pub cache_hits: usize,
    pub failures: usize,
    pub audited: usize,

    /// Pages that carry a tone summary
    pub tone_analyzed: usize,

    pub elapsed_seconds: f64,

    /// True when the run stopped because the model budget ran out
    pub stopped_on_budget: bool,

    /// Budget snapshot, present only when LLM use was enabled
    pub budget: Option<BudgetState>,

    pub cache: CacheStats,
}

impl RunStatistics {
    /// Collects statistics for a run that started at `started_at` and ends now
    pub fn from_report(
        report: &BatchReport,
        started_at: DateTime<Utc>,
        budget: Option<BudgetState>,
        cache: CacheStats,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            pages_processed: report.processed(),
            cache_hits: report.cache_hits,
            failures: report.failures,
            audited: report.audited,
            tone_analyzed: report
                .results
                .iter()
                .filter(|r| r.has_tone_summary())
                .count(),
            elapsed_seconds: report.elapsed.as_secs_f64(),
            stopped_on_budget: report.stopped_on_budget,
            budget,
            cache,
        }
    }

    /// Average wall time per attempted page, zero when nothing ran
    pub fn average_seconds_per_page(&self) -> f64 {
        if self.pages_processed == 0 {
            0.0
        } else {
            self.elapsed_seconds / self.pages_processed as f64
        }
    }
}

/// Counts issue strings across pages, most common first
///
/// Ties keep the order in which the issue was first seen.
pub fn top_issues(results: &[PageResult], n: usize) -> Vec<(String, usize)> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for issue in results.iter().flat_map(|r| r.issues.iter()) {
        let count = counts.entry(issue.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(issue.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|issue| (issue.to_string(), counts[issue]))
        .collect();
    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Audit Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Elapsed: {:.1}s", stats.elapsed_seconds);
    println!(
        "  Average per page: {:.2}s",
        stats.average_seconds_per_page()
    );
    println!();

    println!("Pages:");
    println!("  Processed: {}", stats.pages_processed);
    println!("  Freshly audited: {}", stats.audited);
    println!("  From cache: {}", stats.cache_hits);
    println!("  Failed: {}", stats.failures);
    println!("  With tone analysis: {}", stats.tone_analyzed);
    println!();

    if let Some(budget) = &stats.budget {
        println!("LLM Budget:");
        println!(
            "  Calls: {} / {} ({:.1}% used, {} remaining)",
            budget.calls_made, budget.max_calls, budget.budget_used_percent, budget.remaining_calls
        );
        for (call_type, count) in &budget.calls_by_type {
            println!("  {}: {}", call_type, count);
        }
        println!();
    }

    println!("Cache:");
    println!("  Entries: {}", stats.cache.entry_count);
    println!("  Size: {:.2} MB", stats.cache.total_size_mb());
    println!();

    if stats.stopped_on_budget {
        println!("Stopped early: LLM budget exhausted before all URLs were audited.");
        println!();
    }
}

/// Prints the most common issues as a numbered list
pub fn print_top_issues(issues: &[(String, usize)]) {
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }

    println!("Top Issues:");
    for (rank, (issue, count)) in issues.iter().enumerate() {
        println!("  {}. {} ({} pages)", rank + 1, issue, count);
    }
}
