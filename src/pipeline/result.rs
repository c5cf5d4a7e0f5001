use crate::rules::RuleBundle;
use crate::tone::ToneSummary;
use serde::{Deserialize, Serialize};

/// Headline scores of a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub seo: f64,
    pub a11y: f64,
}

/// Full outcome of auditing one URL
///
/// Either every audit field is populated (`error` is `None`), or `error` is
/// set and the rule bundles, issues and scores are empty placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub seo_rules: RuleBundle,
    pub a11y_rules: RuleBundle,
    pub tone_summary: Option<ToneSummary>,
    pub issues: Vec<String>,
    pub scores: Scores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    /// Builds a successful result from both rule bundles
    ///
    /// SEO issues come first, then accessibility issues, each in check order.
    pub fn assemble(
        url: &str,
        seo_rules: RuleBundle,
        a11y_rules: RuleBundle,
        tone_summary: Option<ToneSummary>,
    ) -> Self {
        let issues = seo_rules
            .issues
            .iter()
            .chain(a11y_rules.issues.iter())
            .cloned()
            .collect();
        let scores = Scores {
            seo: seo_rules.overall_score,
            a11y: a11y_rules.overall_score,
        };

        Self {
            url: url.to_string(),
            seo_rules,
            a11y_rules,
            tone_summary,
            issues,
            scores,
            error: None,
        }
    }

    /// Builds an error result with empty placeholders
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            seo_rules: RuleBundle::default(),
            a11y_rules: RuleBundle::default(),
            tone_summary: None,
            issues: Vec::new(),
            scores: Scores::default(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_tone_summary(&self) -> bool {
        self.tone_summary.is_some()
    }
}
