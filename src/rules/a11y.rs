//! Accessibility checks: image alt text, heading hierarchy and link text
//!
//! Absence is never penalized: a page without images, headings or links
//! scores 100 on the corresponding check.

use crate::extract::PageMetadata;
use crate::rules::{selector, CheckOutcome, RuleBundle};
use scraper::Html;

/// Link texts that say nothing about the link target
const GENERIC_LINK_PHRASES: &[&str] = &["click here", "read more", "here", "more", "link"];

/// Runs all accessibility checks on a page
///
/// `_text` is accepted for symmetry with [`crate::rules::check_seo`]; every
/// accessibility check works on the markup alone.
pub fn check_a11y(html: &str, _text: &str) -> RuleBundle {
    let document = Html::parse_document(html);
    let mut bundle = RuleBundle::default();

    let images = check_image_alts(&document);
    bundle.push_check("image_alts", images.outcome);
    bundle.set_metric("images_total", images.total);
    bundle.set_metric("images_with_alt", images.matching);

    bundle.push_check("heading_hierarchy", check_heading_hierarchy(&document));

    let links = check_link_text(&document);
    bundle.push_check("link_text", links.outcome);
    bundle.set_metric("links_total", links.total);
    bundle.set_metric("links_with_text", links.matching);

    bundle.finish()
}

/// Outcome of a check that counts elements meeting some condition
struct CoverageCheck {
    outcome: CheckOutcome,
    total: usize,
    matching: usize,
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

fn check_image_alts(document: &Html) -> CoverageCheck {
    let Some(img_sel) = selector("img") else {
        return CoverageCheck {
            outcome: CheckOutcome::pass(),
            total: 0,
            matching: 0,
        };
    };

    let images: Vec<_> = document.select(&img_sel).collect();
    let total = images.len();
    // An empty alt="" marks a decorative image and counts as present
    let with_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").is_some())
        .count();

    if total == 0 || with_alt == total {
        return CoverageCheck {
            outcome: CheckOutcome::pass(),
            total,
            matching: with_alt,
        };
    }

    let pct = percentage(with_alt, total);
    let score = if pct >= 80.0 {
        75.0
    } else if pct >= 50.0 {
        50.0
    } else {
        25.0
    };

    CoverageCheck {
        outcome: CheckOutcome::scored(
            score,
            format!(
                "{} images missing alt text ({:.1}% have alt)",
                total - with_alt,
                pct
            ),
        ),
        total,
        matching: with_alt,
    }
}

/// Flags the first heading level that is skipped
///
/// Levels are taken in ascending order (all H1s, then all H2s, ...), so the
/// check catches a level that is absent between two levels the page uses.
fn check_heading_hierarchy(document: &Html) -> CheckOutcome {
    let metadata = PageMetadata::from_document(document);
    let levels: Vec<usize> = (1..=6)
        .flat_map(|level| std::iter::repeat(level).take(metadata.heading_count(level)))
        .collect();

    for pair in levels.windows(2) {
        if pair[1] - pair[0] > 1 {
            return CheckOutcome::scored(
                50.0,
                format!(
                    "Heading hierarchy skips from H{} to H{}",
                    pair[0], pair[1]
                ),
            );
        }
    }

    CheckOutcome::pass()
}

fn check_link_text(document: &Html) -> CoverageCheck {
    let Some(a_sel) = selector("a") else {
        return CoverageCheck {
            outcome: CheckOutcome::pass(),
            total: 0,
            matching: 0,
        };
    };

    let mut total = 0;
    let mut with_text = 0;
    let mut generic = 0;

    for link in document.select(&a_sel) {
        total += 1;
        let text = link.text().collect::<String>().trim().to_lowercase();
        if !text.is_empty() {
            with_text += 1;
            if GENERIC_LINK_PHRASES.contains(&text.as_str()) {
                generic += 1;
            }
        }
    }

    if total == 0 {
        return CoverageCheck {
            outcome: CheckOutcome::pass(),
            total,
            matching: with_text,
        };
    }

    let pct = percentage(with_text, total);
    let outcome = if pct < 80.0 {
        CheckOutcome::scored(
            25.0,
            format!(
                "{} links without text ({:.1}% have text)",
                total - with_text,
                pct
            ),
        )
    } else if generic as f64 > total as f64 * 0.2 {
        CheckOutcome::scored(
            50.0,
            format!(
                "{} links use generic text (e.g., 'click here', 'read more')",
                generic
            ),
        )
    } else {
        CheckOutcome::pass()
    };

    CoverageCheck {
        outcome,
        total,
        matching: with_text,
    }
}
