//! Main-content text extraction
//!
//! Every `<article>`, `<main>` and `role="main"` element is a candidate
//! content root; the one holding the most text wins. Empty candidates and
//! teasers much smaller than the page body lose to `<body>`, and a document
//! without a body falls back to its root element. Text inside non-content
//! elements (scripts, styles, navigation chrome, forms) is dropped.

use crate::extract::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Candidate content roots, most specific first
const CONTENT_ROOTS: &[&str] = &["article", "main", r#"[role="main"]"#];

/// A candidate root must hold at least 1/N of the body text to beat `<body>`
const MIN_BODY_SHARE: usize = 4;

/// Elements whose text never counts as page content
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer", "aside", "form",
];

/// Extracts clean text content from HTML
///
/// # Arguments
///
/// * `html` - Raw HTML string
/// * `max_length` - Maximum number of characters to return
///
/// # Returns
///
/// * `Ok(String)` - Whitespace-normalized text, at most `max_length` chars
/// * `Err(ExtractError::Empty)` - The page has no readable text
///
/// # Example
///
/// ```
/// use content_auditor::extract::extract_text;
///
/// let html = "<html><body><nav>Menu</nav><p>Hello   <b>world</b></p></body></html>";
/// assert_eq!(extract_text(html, 100).unwrap(), "Hello world");
/// ```
pub fn extract_text(html: &str, max_length: usize) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);

    let mut text = main_text(&document);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }

    if let Some((cut, _)) = text.char_indices().nth(max_length) {
        text.truncate(cut);
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
        tracing::debug!("Text truncated to {} characters", max_length);
    }

    tracing::debug!("Extracted {} characters of text", text.chars().count());
    Ok(text)
}

/// Normalized text of the best content root
fn main_text(document: &Html) -> String {
    let body_text = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(normalized_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| normalized_text(document.root_element()));

    let mut best = String::new();
    for css in CONTENT_ROOTS {
        let Ok(sel) = Selector::parse(css) else {
            continue;
        };
        for candidate in document.select(&sel) {
            let text = normalized_text(candidate);
            // Strictly longer, so earlier candidates win ties
            if text.len() > best.len() {
                best = text;
            }
        }
    }

    if !best.is_empty() && best.len() * MIN_BODY_SHARE >= body_text.len() {
        best
    } else {
        body_text
    }
}

fn normalized_text(root: ElementRef<'_>) -> String {
    collect_text(root)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins every text node under `root` that is not inside a skipped element
fn collect_text(root: ElementRef<'_>) -> String {
    let root_id = root.id();
    let mut out = String::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root_id)
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| SKIPPED_ELEMENTS.contains(&element.name()));

        if !skipped {
            out.push_str(text);
            out.push(' ');
        }
    }

    out
}
