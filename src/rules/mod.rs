//! Deterministic SEO and accessibility rules
//!
//! Every check is a pure function over the page HTML and its extracted text.
//! Checks never fail: unparseable markup simply yields whatever elements the
//! lenient HTML parser recovers.

mod a11y;
mod seo;

pub use a11y::check_a11y;
pub use seo::check_seo;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores, issues and metrics produced by one rule family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBundle {
    /// Sub-score per check, each in [0, 100]
    pub scores: BTreeMap<String, f64>,

    /// Human-readable problems, in check order
    pub issues: Vec<String>,

    /// Raw measurements backing the scores
    pub metrics: BTreeMap<String, u64>,

    /// Unweighted mean of `scores`, 0 when there are none
    pub overall_score: f64,
}

impl RuleBundle {
    /// Records the outcome of one check
    pub(crate) fn push_check(&mut self, name: &str, outcome: CheckOutcome) {
        self.scores.insert(name.to_string(), outcome.score);
        self.issues.extend(outcome.issues);
    }

    pub(crate) fn set_metric(&mut self, name: &str, value: usize) {
        self.metrics.insert(name.to_string(), value as u64);
    }

    /// Computes `overall_score` from the collected sub-scores
    pub(crate) fn finish(mut self) -> Self {
        self.overall_score = overall_score(&self.scores);
        self
    }
}

/// Score and issues of a single check
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckOutcome {
    pub score: f64,
    pub issues: Vec<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            score: 100.0,
            issues: Vec::new(),
        }
    }

    pub fn scored(score: f64, issue: impl Into<String>) -> Self {
        Self {
            score,
            issues: vec![issue.into()],
        }
    }

    pub fn score_only(score: f64) -> Self {
        Self {
            score,
            issues: Vec::new(),
        }
    }
}

/// Unweighted arithmetic mean of the sub-scores
pub fn overall_score(scores: &BTreeMap<String, f64>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().sum::<f64>() / scores.len() as f64
}

/// Parses a static CSS selector
///
/// All selectors in this module are literals, so a parse failure is a
/// programming error; it degrades to "no matches" rather than a panic.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Rule evaluation seam used by the page pipeline
pub trait RuleEvaluator: Send + Sync {
    /// Runs the SEO checks
    fn check_seo(&self, html: &str, text: &str) -> RuleBundle;

    /// Runs the accessibility checks
    fn check_a11y(&self, html: &str, text: &str) -> RuleBundle;
}

/// The built-in SEO and accessibility rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RuleEvaluator for StandardRules {
    fn check_seo(&self, html: &str, text: &str) -> RuleBundle {
        seo::check_seo(html, text)
    }

    fn check_a11y(&self, html: &str, text: &str) -> RuleBundle {
        a11y::check_a11y(html, text)
    }
}
