//! URL list loading from CSV

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header names accepted for the URL column, in lookup order
pub const URL_COLUMNS: [&str; 4] = ["url", "URL", "Url", "link"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No URL column in {path} (expected one of: {})", URL_COLUMNS.join(", "))]
    MissingUrlColumn { path: PathBuf },
}

/// Loads the audit URL list from a CSV file with a header row
///
/// Each row takes the first non-empty value among the URL columns present,
/// in [`URL_COLUMNS`] order. Values are trimmed and rows without any URL are
/// skipped. Duplicates are kept; the cache makes repeated URLs cheap.
pub fn load_urls(path: impl AsRef<Path>) -> Result<Vec<String>, InputError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers().map_err(csv_error)?.clone();

    // Columns present, in lookup order; each row takes the first non-empty one
    let columns: Vec<usize> = URL_COLUMNS
        .iter()
        .filter_map(|name| headers.iter().position(|h| h.trim() == *name))
        .collect();
    if columns.is_empty() {
        return Err(InputError::MissingUrlColumn {
            path: path.to_path_buf(),
        });
    }

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let url = columns
            .iter()
            .filter_map(|&column| record.get(column).map(str::trim))
            .find(|value| !value.is_empty());
        if let Some(url) = url {
            urls.push(url.to_string());
        }
    }

    tracing::info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
