//! Page metadata extraction

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;

/// Head and heading metadata of a page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    /// Trimmed `<title>` text; `Some("")` for an empty title element
    pub title: Option<String>,

    /// Non-empty `content` of `<meta name="description">`
    pub meta_description: Option<String>,

    /// Non-empty `href` of the first `<link rel="canonical">`
    pub canonical_url: Option<String>,

    /// Trimmed text of every `<h1>`, in document order
    pub h1_tags: Vec<String>,

    /// Heading counts keyed `h1`..`h6`
    pub headings_count: BTreeMap<String, usize>,
}

impl PageMetadata {
    /// Reads metadata from an already parsed document
    pub fn from_document(document: &Html) -> Self {
        let title = first_match(document, "title")
            .map(|title| title.text().collect::<String>().trim().to_string());

        let meta_description = first_match(document, r#"meta[name="description"]"#)
            .and_then(|meta| meta.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(str::to_string);

        let canonical_url = first_match(document, r#"link[rel~="canonical"]"#)
            .and_then(|link| link.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        let h1_tags = Selector::parse("h1")
            .map(|sel| {
                document
                    .select(&sel)
                    .map(|h1| h1.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut headings_count = BTreeMap::new();
        for level in 1..=6 {
            let tag = format!("h{}", level);
            let count = Selector::parse(&tag)
                .map(|sel| document.select(&sel).count())
                .unwrap_or(0);
            headings_count.insert(tag, count);
        }

        Self {
            title,
            meta_description,
            canonical_url,
            h1_tags,
            headings_count,
        }
    }

    /// Number of headings at `level` (1-6)
    pub fn heading_count(&self, level: usize) -> usize {
        self.headings_count
            .get(&format!("h{}", level))
            .copied()
            .unwrap_or(0)
    }
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<scraper::ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    document.select(&sel).next()
}

/// Extracts metadata (title, meta tags, canonical link, headings) from HTML
///
/// # Example
///
/// ```
/// use content_auditor::extract::extract_metadata;
///
/// let meta = extract_metadata("<html><head><title> Docs </title></head><body><h1>A</h1></body></html>");
/// assert_eq!(meta.title.as_deref(), Some("Docs"));
/// assert_eq!(meta.h1_tags, vec!["A".to_string()]);
/// ```
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let metadata = PageMetadata::from_document(&document);
    tracing::trace!(
        "Extracted metadata: title={}",
        metadata.title.as_deref().unwrap_or("None")
    );
    metadata
}
