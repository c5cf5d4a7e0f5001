//! Batch runner - drives a bounded list of URLs through the page pipeline
//!
//! The runner owns the run's cache and budget so every page sees the same
//! context objects. Pages are dispatched in windows of `concurrency`; results
//! always come back in submission order.

use crate::budget::{BudgetManager, DEFAULT_CALL_TYPE};
use crate::cache::Cache;
use crate::config::Config;
use crate::pipeline::{PagePipeline, PageResult, PageStage};
use futures::future::join_all;
use std::time::{Duration, Instant};

/// Knobs for a single batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// URLs beyond this count are dropped before processing
    pub max_pages: usize,

    /// Whether the tone step may run at all
    pub use_llm: bool,

    /// Number of pages in flight at once
    pub concurrency: usize,

    /// Log a progress line every this many pages
    pub progress_interval: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_pages: 200,
            use_llm: true,
            concurrency: 1,
            progress_interval: 20,
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.audit.max_pages,
            use_llm: config.tone.enabled,
            concurrency: config.audit.concurrency,
            progress_interval: config.audit.batch_size,
        }
    }
}

/// Everything a finished batch produced
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One result per attempted URL, in input order
    pub results: Vec<PageResult>,

    /// True when the run ended early because the model budget ran out
    pub stopped_on_budget: bool,

    pub cache_hits: usize,
    pub failures: usize,

    /// Pages that went through a fresh fetch and were cached
    pub audited: usize,

    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of URLs that were attempted
    pub fn processed(&self) -> usize {
        self.results.len()
    }
}

/// Sequences URLs through a [`PagePipeline`] under a shared budget
pub struct BatchRunner {
    pipeline: PagePipeline,
    cache: Cache,
    budget: BudgetManager,
    options: RunOptions,
}

impl BatchRunner {
    pub fn new(
        pipeline: PagePipeline,
        cache: Cache,
        budget: BudgetManager,
        options: RunOptions,
    ) -> Self {
        Self {
            pipeline,
            cache,
            budget,
            options,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn budget(&self) -> &BudgetManager {
        &self.budget
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Audits `urls` in order and returns what was processed
    ///
    /// The list is truncated to `max_pages` up front. When LLM use is
    /// enabled and the budget has no room left after a window of pages, the
    /// remaining URLs are never attempted.
    pub async fn run(&self, urls: &[String]) -> BatchReport {
        let started = Instant::now();
        let urls = &urls[..urls.len().min(self.options.max_pages)];
        let total = urls.len();
        let window = self.options.concurrency.max(1);
        let progress_interval = self.options.progress_interval.max(1);

        tracing::info!(
            "Starting audit of {} URLs (concurrency {}, LLM {})",
            total,
            window,
            if self.options.use_llm { "enabled" } else { "disabled" }
        );

        let mut report = BatchReport {
            results: Vec::with_capacity(total),
            ..BatchReport::default()
        };

        for chunk in urls.chunks(window) {
            let pages = join_all(chunk.iter().map(|url| {
                self.pipeline
                    .process_detailed(url, &self.cache, &self.budget, self.options.use_llm)
            }))
            .await;

            for page in pages {
                match page.stage {
                    PageStage::Cached => report.cache_hits += 1,
                    PageStage::Done => report.audited += 1,
                    stage if stage.is_failure() => report.failures += 1,
                    _ => {}
                }
                report.results.push(page.result);

                let done = report.results.len();
                if done % progress_interval == 0 || done == total {
                    tracing::info!("Progress: {}/{} pages", done, total);
                }
            }

            let remaining = total - report.results.len();
            if self.options.use_llm
                && remaining > 0
                && !self.budget.can_make_call(DEFAULT_CALL_TYPE)
            {
                tracing::warn!(
                    "LLM budget exhausted, stopping with {} URLs not attempted",
                    remaining
                );
                report.stopped_on_budget = true;
                break;
            }
        }

        report.elapsed = started.elapsed();
        tracing::info!(
            "Audit finished: {} pages ({} cached, {} failed) in {:.1}s",
            report.processed(),
            report.cache_hits,
            report.failures,
            report.elapsed.as_secs_f64()
        );
        report
    }
}
