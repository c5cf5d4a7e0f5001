//! SEO checks: title, meta description, H1, canonical link and word count

use crate::extract::PageMetadata;
use crate::rules::{CheckOutcome, RuleBundle};
use scraper::Html;

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const META_DESC_MIN: usize = 120;
const META_DESC_MAX: usize = 160;
const WORDS_LOW: usize = 300;
const WORDS_GOOD: usize = 600;

/// Runs all SEO checks on a page
///
/// # Arguments
///
/// * `html` - The raw page HTML
/// * `text` - The extracted main text, used for the word count
///
/// # Example
///
/// ```
/// use content_auditor::rules::check_seo;
///
/// let bundle = check_seo("<html><body><p>Short content</p></body></html>", "Short content");
/// assert!(bundle.issues.iter().any(|i| i.starts_with("Low word count")));
/// assert!(bundle.overall_score < 50.0);
/// ```
pub fn check_seo(html: &str, text: &str) -> RuleBundle {
    let document = Html::parse_document(html);
    let metadata = PageMetadata::from_document(&document);
    let mut bundle = RuleBundle::default();

    let (outcome, title_length) = check_title(metadata.title.as_deref());
    bundle.push_check("title", outcome);
    bundle.set_metric("title_length", title_length);

    let (outcome, desc_length) = check_meta_description(metadata.meta_description.as_deref());
    bundle.push_check("meta_description", outcome);
    bundle.set_metric("meta_desc_length", desc_length);

    let h1_count = metadata.h1_tags.len();
    bundle.push_check("h1", check_h1(h1_count));
    bundle.set_metric("h1_count", h1_count);

    bundle.push_check("canonical", check_canonical(metadata.canonical_url.as_deref()));

    let (outcome, word_count) = check_word_count(text);
    bundle.push_check("word_count", outcome);
    bundle.set_metric("word_count", word_count);

    bundle.finish()
}

fn check_title(title: Option<&str>) -> (CheckOutcome, usize) {
    let Some(title) = title else {
        return (CheckOutcome::scored(0.0, "Missing title tag"), 0);
    };

    let length = title.chars().count();
    let outcome = if length == 0 {
        CheckOutcome::scored(0.0, "Empty title tag")
    } else if length < TITLE_MIN {
        CheckOutcome::scored(
            50.0,
            format!(
                "Title too short ({} chars, recommended {}-{})",
                length, TITLE_MIN, TITLE_MAX
            ),
        )
    } else if length > TITLE_MAX {
        CheckOutcome::scored(
            75.0,
            format!(
                "Title too long ({} chars, recommended {}-{})",
                length, TITLE_MIN, TITLE_MAX
            ),
        )
    } else {
        CheckOutcome::pass()
    };

    (outcome, length)
}

/// Scores the meta description; an empty `content` counts as missing
fn check_meta_description(description: Option<&str>) -> (CheckOutcome, usize) {
    let Some(description) = description else {
        return (CheckOutcome::scored(0.0, "Missing meta description"), 0);
    };

    let length = description.chars().count();
    let outcome = if length < META_DESC_MIN {
        CheckOutcome::scored(
            50.0,
            format!(
                "Meta description too short ({} chars, recommended {}-{})",
                length, META_DESC_MIN, META_DESC_MAX
            ),
        )
    } else if length > META_DESC_MAX {
        CheckOutcome::scored(
            75.0,
            format!(
                "Meta description too long ({} chars, recommended {}-{})",
                length, META_DESC_MIN, META_DESC_MAX
            ),
        )
    } else {
        CheckOutcome::pass()
    };

    (outcome, length)
}

fn check_h1(count: usize) -> CheckOutcome {
    match count {
        0 => CheckOutcome::scored(0.0, "Missing H1 tag"),
        1 => CheckOutcome::pass(),
        n => CheckOutcome::scored(
            75.0,
            format!("Multiple H1 tags found ({}, recommended 1)", n),
        ),
    }
}

fn check_canonical(canonical_url: Option<&str>) -> CheckOutcome {
    match canonical_url {
        Some(_) => CheckOutcome::pass(),
        None => CheckOutcome::scored(0.0, "Missing canonical URL"),
    }
}

fn check_word_count(text: &str) -> (CheckOutcome, usize) {
    let count = text.split_whitespace().count();

    let outcome = if count < WORDS_LOW {
        CheckOutcome::scored(
            25.0,
            format!("Low word count ({}, recommended {}+)", count, WORDS_LOW),
        )
    } else if count < WORDS_GOOD {
        CheckOutcome::score_only(75.0)
    } else {
        CheckOutcome::pass()
    };

    (outcome, count)
}
