//! Integration tests for the page pipeline and batch runner
//!
//! These tests drive the pipeline with counting in-memory collaborators so
//! cache, budget and ordering behavior can be checked without a network.

use async_trait::async_trait;
use content_auditor::extract::{ExtractError, ReadabilityExtractor, TextExtractor};
use content_auditor::fetch::{FetchError, PageFetcher};
use content_auditor::pipeline::{BatchRunner, PagePipeline, PageStage, RunOptions};
use content_auditor::rules::{RuleBundle, RuleEvaluator, StandardRules};
use content_auditor::tone::{ToneAnalyzer, ToneError, ToneSummary};
use content_auditor::{BudgetManager, Cache};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Serves a fixed page for every URL except those marked as broken
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
    broken: HashSet<String>,
    /// Delay in milliseconds, taken from a `delay=N` query parameter
    honor_delays: bool,
}

impl CountingFetcher {
    fn broken(urls: &[&str]) -> Self {
        Self {
            broken: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.honor_delays {
            if let Some(ms) = url.split("delay=").nth(1).and_then(|v| v.parse().ok()) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }

        if self.broken.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }

        Ok(format!(
            "<html><head><title>Page at {url}</title></head>\
             <body><h1>Heading</h1><p>Some readable body text for {url}.</p></body></html>"
        ))
    }
}

#[derive(Default)]
struct CountingTone {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingTone {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToneAnalyzer for CountingTone {
    async fn analyze(&self, _text: &str) -> Result<ToneSummary, ToneError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ToneError::Status(500));
        }
        Ok(ToneSummary {
            readability: "Easy to read.".to_string(),
            tone: "Friendly.".to_string(),
            risks: "None.".to_string(),
        })
    }
}

/// Readability extraction that counts its invocations
#[derive(Default)]
struct CountingExtractor {
    calls: AtomicUsize,
    inner: ReadabilityExtractor,
}

impl TextExtractor for CountingExtractor {
    fn extract_text(&self, html: &str) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.extract_text(html)
    }
}

/// Standard rules that count SEO and accessibility evaluations
#[derive(Default)]
struct CountingRules {
    seo_calls: AtomicUsize,
    a11y_calls: AtomicUsize,
}

impl RuleEvaluator for CountingRules {
    fn check_seo(&self, html: &str, text: &str) -> RuleBundle {
        self.seo_calls.fetch_add(1, Ordering::SeqCst);
        StandardRules.check_seo(html, text)
    }

    fn check_a11y(&self, html: &str, text: &str) -> RuleBundle {
        self.a11y_calls.fetch_add(1, Ordering::SeqCst);
        StandardRules.check_a11y(html, text)
    }
}

fn pipeline(fetcher: &Arc<CountingFetcher>, tone: &Arc<CountingTone>) -> PagePipeline {
    PagePipeline::new(
        fetcher.clone(),
        Arc::new(ReadabilityExtractor::default()),
        Arc::new(StandardRules),
        tone.clone(),
    )
}

fn urls(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("https://site.example/page/{i}")).collect()
}

fn options(max_pages: usize, use_llm: bool, concurrency: usize) -> RunOptions {
    RunOptions {
        max_pages,
        use_llm,
        concurrency,
        progress_interval: 1,
    }
}

#[tokio::test]
async fn test_cache_hit_skips_every_collaborator() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let extractor = Arc::new(CountingExtractor::default());
    let rules = Arc::new(CountingRules::default());
    let tone = Arc::new(CountingTone::default());
    let cache = Cache::new(dir.path()).unwrap();
    let budget = BudgetManager::new(10);
    let pipeline = PagePipeline::new(
        fetcher.clone(),
        extractor.clone(),
        rules.clone(),
        tone.clone(),
    );
    let url = "https://site.example/";

    let first = pipeline.process_detailed(url, &cache, &budget, true).await;
    let second = pipeline.process_detailed(url, &cache, &budget, true).await;

    assert_eq!(first.stage, PageStage::Done);
    assert_eq!(second.stage, PageStage::Cached);
    assert_eq!(first.result, second.result);
    // Only the first, uncached call reached the collaborators
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(rules.seo_calls.load(Ordering::SeqCst), 1);
    assert_eq!(rules.a11y_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tone.calls(), 1);
    assert_eq!(budget.stats().calls_made, 1);
}

#[tokio::test]
async fn test_failed_urls_retried_on_next_run() {
    let dir = TempDir::new().unwrap();
    let bad = "https://site.example/page/1";
    let fetcher = Arc::new(CountingFetcher::broken(&[bad]));
    let tone = Arc::new(CountingTone::default());

    for _ in 0..2 {
        let runner = BatchRunner::new(
            pipeline(&fetcher, &tone),
            Cache::new(dir.path()).unwrap(),
            BudgetManager::new(10),
            options(10, false, 1),
        );
        let report = runner.run(&urls(3)).await;

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[1].url, bad);
        assert_eq!(report.results[1].error.as_deref(), Some("Failed to fetch page"));
        assert_eq!(report.failures, 1);
    }

    // Good pages fetched once, the broken one on both runs
    assert_eq!(fetcher.calls(), 4);
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let list = urls(3);

    let first = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(10),
        options(10, true, 1),
    )
    .run(&list)
    .await;
    let second = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(10),
        options(10, true, 1),
    )
    .run(&list)
    .await;

    assert_eq!(first.audited, 3);
    assert_eq!(second.cache_hits, 3);
    assert_eq!(second.audited, 0);
    assert_eq!(first.results, second.results);
    assert_eq!(fetcher.calls(), 3);
    assert_eq!(tone.calls(), 3);
}

#[tokio::test]
async fn test_budget_exhausted_mid_batch() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(2),
        options(10, true, 1),
    );

    let report = runner.run(&urls(5)).await;

    assert!(report.stopped_on_budget);
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.tone_summary.is_some()));
    assert_eq!(tone.calls(), 2);
    assert_eq!(runner.budget().stats().calls_made, 2);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_budget_ceiling_holds_under_concurrency() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(3),
        options(10, true, 4),
    );

    let report = runner.run(&urls(10)).await;

    let with_tone = report
        .results
        .iter()
        .filter(|r| r.tone_summary.is_some())
        .count();
    assert_eq!(with_tone, 3);
    assert_eq!(tone.calls(), 3);
    assert_eq!(runner.budget().stats().calls_made, 3);
    // The first window of four ran; the stop check fired after it
    assert_eq!(report.results.len(), 4);
    assert!(report.stopped_on_budget);
}

#[tokio::test]
async fn test_results_keep_input_order_with_concurrency() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher {
        honor_delays: true,
        ..CountingFetcher::default()
    });
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(0),
        options(10, false, 3),
    );
    // Earlier URLs finish last
    let list: Vec<String> = [60, 30, 0, 45, 15, 0]
        .iter()
        .enumerate()
        .map(|(i, ms)| format!("https://site.example/{i}?delay={ms}"))
        .collect();

    let report = runner.run(&list).await;

    let got: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    let want: Vec<&str> = list.iter().map(String::as_str).collect();
    assert_eq!(got, want);
}

#[tokio::test]
async fn test_failed_tone_call_does_not_consume_budget() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::failing());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(2),
        options(10, true, 1),
    );

    let report = runner.run(&urls(5)).await;

    assert!(!report.stopped_on_budget);
    assert_eq!(report.results.len(), 5);
    assert!(report
        .results
        .iter()
        .all(|r| r.error.is_none() && r.tone_summary.is_none()));
    assert_eq!(tone.calls(), 5);
    assert_eq!(runner.budget().stats().calls_made, 0);
    // Successful fetches are cached even without a tone summary
    assert_eq!(runner.cache().stats().entry_count, 5);
}

#[tokio::test]
async fn test_rules_run_without_budget() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let cache = Cache::new(dir.path()).unwrap();
    let budget = BudgetManager::new(0);

    let result = pipeline(&fetcher, &tone)
        .process("https://site.example/", &cache, &budget, true)
        .await;

    assert!(result.error.is_none());
    assert!(result.tone_summary.is_none());
    assert!(!result.seo_rules.scores.is_empty());
    assert!(!result.a11y_rules.scores.is_empty());
    assert_eq!(tone.calls(), 0);
}

#[tokio::test]
async fn test_zero_budget_stops_after_first_page() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(0),
        options(10, true, 1),
    );

    let report = runner.run(&urls(3)).await;

    assert!(report.stopped_on_budget);
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].error.is_none());
}

#[tokio::test]
async fn test_llm_disabled_ignores_budget() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(0),
        options(10, false, 1),
    );

    let report = runner.run(&urls(4)).await;

    assert!(!report.stopped_on_budget);
    assert_eq!(report.results.len(), 4);
    assert_eq!(tone.calls(), 0);
}

#[tokio::test]
async fn test_max_pages_truncates_input() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let runner = BatchRunner::new(
        pipeline(&fetcher, &tone),
        Cache::new(dir.path()).unwrap(),
        BudgetManager::new(10),
        options(2, false, 1),
    );

    let list = urls(5);
    let report = runner.run(&list).await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].url, list[0]);
    assert_eq!(report.results[1].url, list[1]);
    assert!(!report.stopped_on_budget);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_cached_result_without_tone_returned_as_is() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(CountingFetcher::default());
    let tone = Arc::new(CountingTone::default());
    let cache = Cache::new(dir.path()).unwrap();
    let budget = BudgetManager::new(10);
    let pipeline = pipeline(&fetcher, &tone);
    let url = "https://site.example/";

    pipeline.process(url, &cache, &budget, false).await;
    let again = pipeline.process(url, &cache, &budget, true).await;

    assert!(again.tone_summary.is_none());
    assert_eq!(tone.calls(), 0);
    assert_eq!(fetcher.calls(), 1);
}
