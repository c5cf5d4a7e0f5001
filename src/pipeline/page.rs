//! Single-URL audit orchestration
//!
//! ```text
//! START -> CACHE_CHECK -> CACHED
//!                      -> FETCH -> FETCH_FAILED
//!                               -> EXTRACT -> EXTRACT_FAILED
//!                                          -> RULES -> RULES_DONE -> TONE_SKIPPED | TONE_ATTEMPTED
//!                                                   -> ASSEMBLED -> CACHE_WRITE -> DONE
//! ```
//!
//! Only `DONE` results are written to the cache. Failed fetches and
//! extractions are returned but not remembered, so a later run retries them.

use crate::budget::{BudgetManager, TONE_ANALYSIS};
use crate::cache::Cache;
use crate::config::Config;
use crate::extract::{ExtractError, ReadabilityExtractor, TextExtractor};
use crate::fetch::{FetchError, HttpFetcher, PageFetcher};
use crate::pipeline::{PageResult, PageStage};
use crate::rules::{RuleEvaluator, StandardRules};
use crate::tone::{OllamaToneAnalyzer, ToneAnalyzer, ToneSummary};
use crate::AuditError;
use std::sync::Arc;
use thiserror::Error;

/// Why a URL ended with an error result
///
/// The display strings are the exact `error` values written into
/// [`PageResult`]; the wrapped error carries the detail for logs.
#[derive(Debug, Error)]
pub enum PageFailure {
    #[error("Failed to fetch page")]
    Fetch(#[source] FetchError),

    #[error("Failed to extract text")]
    Extract(#[source] ExtractError),
}

impl PageFailure {
    fn stage(&self) -> PageStage {
        match self {
            Self::Fetch(_) => PageStage::FetchFailed,
            Self::Extract(_) => PageStage::ExtractFailed,
        }
    }
}

/// A page result together with the terminal stage that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPage {
    pub result: PageResult,
    pub stage: PageStage,
}

/// Per-URL orchestrator over the external collaborators
///
/// Holds no run state of its own; the cache and budget are passed into every
/// call by whoever owns them.
#[derive(Clone)]
pub struct PagePipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn TextExtractor>,
    rules: Arc<dyn RuleEvaluator>,
    tone: Arc<dyn ToneAnalyzer>,
}

impl PagePipeline {
    /// Creates a pipeline from explicit collaborators
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn TextExtractor>,
        rules: Arc<dyn RuleEvaluator>,
        tone: Arc<dyn ToneAnalyzer>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            rules,
            tone,
        }
    }

    /// Creates the production pipeline: HTTP fetcher, readability extractor,
    /// standard rules and the local model tone analyzer
    pub fn from_config(config: &Config) -> Result<Self, AuditError> {
        Ok(Self::new(
            Arc::new(HttpFetcher::new(&config.fetch)?),
            Arc::new(ReadabilityExtractor::new(config.extract.max_text_length)),
            Arc::new(StandardRules),
            Arc::new(OllamaToneAnalyzer::new(&config.tone)?),
        ))
    }

    /// Audits one URL
    ///
    /// Never fails: every problem becomes a [`PageResult`] with `error` set.
    pub async fn process(
        &self,
        url: &str,
        cache: &Cache,
        budget: &BudgetManager,
        use_llm: bool,
    ) -> PageResult {
        self.process_detailed(url, cache, budget, use_llm)
            .await
            .result
    }

    /// Audits one URL and reports the terminal stage reached
    pub async fn process_detailed(
        &self,
        url: &str,
        cache: &Cache,
        budget: &BudgetManager,
        use_llm: bool,
    ) -> ProcessedPage {
        tracing::info!("Processing: {}", url);
        let mut stage = PageStage::Start;

        advance(url, &mut stage, PageStage::CacheCheck);
        // Cached entries are returned as-is, even if they lack a tone summary
        if let Some(cached) = cache.get(url) {
            tracing::info!("Using cached result for {}", url);
            advance(url, &mut stage, PageStage::Cached);
            return ProcessedPage {
                result: cached,
                stage,
            };
        }

        let (html, text) = match self.fetch_and_extract(url, &mut stage).await {
            Ok(content) => content,
            Err(failure) => {
                tracing::warn!("{} for {}: {}", failure, url, error_detail(&failure));
                advance(url, &mut stage, failure.stage());
                return ProcessedPage {
                    result: PageResult::failed(url, failure.to_string()),
                    stage,
                };
            }
        };

        advance(url, &mut stage, PageStage::Rules);
        let seo = self.rules.check_seo(&html, &text);
        let a11y = self.rules.check_a11y(&html, &text);
        advance(url, &mut stage, PageStage::RulesDone);

        let tone_summary = if use_llm {
            self.analyze_tone(url, &text, budget, &mut stage).await
        } else {
            advance(url, &mut stage, PageStage::ToneSkipped);
            None
        };

        let result = PageResult::assemble(url, seo, a11y, tone_summary);
        advance(url, &mut stage, PageStage::Assembled);

        advance(url, &mut stage, PageStage::CacheWrite);
        if let Err(e) = cache.set(url, &result) {
            tracing::warn!("Failed to cache result for {}: {}", url, e);
        }
        advance(url, &mut stage, PageStage::Done);

        ProcessedPage { result, stage }
    }

    async fn fetch_and_extract(
        &self,
        url: &str,
        stage: &mut PageStage,
    ) -> Result<(String, String), PageFailure> {
        advance(url, stage, PageStage::Fetch);
        let html = self.fetcher.fetch(url).await.map_err(PageFailure::Fetch)?;

        advance(url, stage, PageStage::Extract);
        let text = self
            .extractor
            .extract_text(&html)
            .map_err(PageFailure::Extract)?;

        Ok((html, text))
    }

    /// Runs the tone step if a budget slot is available
    ///
    /// The slot is claimed before the call and only committed when the
    /// analyzer returns a summary, so failed calls never consume budget and
    /// concurrent pages can never overshoot the ceiling.
    async fn analyze_tone(
        &self,
        url: &str,
        text: &str,
        budget: &BudgetManager,
        stage: &mut PageStage,
    ) -> Option<ToneSummary> {
        let Some(slot) = budget.try_reserve(TONE_ANALYSIS) else {
            tracing::debug!("Skipping tone analysis for {}: budget exhausted", url);
            advance(url, stage, PageStage::ToneSkipped);
            return None;
        };

        tracing::info!("Running tone analysis for {}", url);
        advance(url, stage, PageStage::ToneAttempted);
        match self.tone.analyze(text).await {
            Ok(summary) => {
                slot.commit();
                Some(summary)
            }
            Err(e) => {
                tracing::warn!("Tone analysis failed for {}: {}", url, e);
                None
            }
        }
    }
}

fn advance(url: &str, stage: &mut PageStage, next: PageStage) {
    debug_assert!(
        stage.can_transition_to(next),
        "invalid stage transition {} -> {}",
        stage,
        next
    );
    tracing::trace!("{}: {} -> {}", url, stage, next);
    *stage = next;
}

fn error_detail(failure: &PageFailure) -> String {
    match failure {
        PageFailure::Fetch(e) => e.to_string(),
        PageFailure::Extract(e) => e.to_string(),
    }
}
