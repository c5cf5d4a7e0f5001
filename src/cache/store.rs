//! Disk-backed cache store

use crate::cache::{CacheError, CacheKey, CacheResult};
use crate::pipeline::PageResult;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENTRY_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Entry count and on-disk size of the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
}

impl CacheStats {
    /// Total size in megabytes, rounded to two decimals
    pub fn total_size_mb(&self) -> f64 {
        (self.total_size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

/// One-file-per-URL cache of successful page audits
///
/// No internal locking: distinct URLs map to distinct files, and the batch
/// runner never processes the same URL twice at once.
#[derive(Debug, Clone)]
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Opens (creating if needed) the cache directory
    pub fn new(cache_dir: impl AsRef<Path>) -> CacheResult<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir).map_err(|source| io_error(&cache_dir, source))?;
        tracing::info!("Cache initialized at {}", cache_dir.display());
        Ok(Self { cache_dir })
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the entry for `url`
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(CacheKey::for_url(url).file_name())
    }

    /// Returns the stored result for `url`, or `None` on a miss
    ///
    /// Unreadable or corrupt entries are logged and reported as misses.
    pub fn get(&self, url: &str) -> Option<PageResult> {
        let path = self.entry_path(url);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Cache miss for {}", url);
                return None;
            }
            Err(e) => {
                tracing::warn!("Error reading cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(result) => {
                tracing::debug!("Cache hit for {}", url);
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Corrupt cache entry {} for {}: {}", path.display(), url, e);
                None
            }
        }
    }

    /// Stores `result` under `url`, replacing any previous entry
    ///
    /// The entry is written to a temporary file and renamed into place, so a
    /// reader never observes a partially written entry.
    pub fn set(&self, url: &str, result: &PageResult) -> CacheResult<()> {
        let path = self.entry_path(url);
        let temp_path = path.with_extension(TEMP_EXTENSION);

        let json = serde_json::to_vec_pretty(result).map_err(|source| {
            CacheError::Serialization {
                url: url.to_string(),
                source,
            }
        })?;

        fs::create_dir_all(&self.cache_dir).map_err(|source| io_error(&self.cache_dir, source))?;
        fs::write(&temp_path, json).map_err(|source| io_error(&temp_path, source))?;
        fs::rename(&temp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            io_error(&path, source)
        })?;

        tracing::debug!("Cached result for {}", url);
        Ok(())
    }

    /// Deletes every entry and returns how many were removed
    pub fn clear(&self) -> CacheResult<usize> {
        let mut count = 0;
        for path in self.files_with_extension(ENTRY_EXTENSION)? {
            fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
            count += 1;
        }
        // Leftovers from interrupted writes are not entries
        for path in self.files_with_extension(TEMP_EXTENSION)? {
            let _ = fs::remove_file(&path);
        }

        tracing::info!("Cleared {} cached entries", count);
        Ok(count)
    }

    /// Counts entries and their total size
    ///
    /// Walks the directory on every call; entries that vanish mid-walk are
    /// skipped.
    pub fn stats(&self) -> CacheStats {
        let files = match self.files_with_extension(ENTRY_EXTENSION) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Unable to read cache directory: {}", e);
                return CacheStats::default();
            }
        };

        files
            .iter()
            .filter_map(|path| fs::metadata(path).ok())
            .fold(CacheStats::default(), |stats, meta| CacheStats {
                entry_count: stats.entry_count + 1,
                total_size_bytes: stats.total_size_bytes + meta.len(),
            })
    }

    fn files_with_extension(&self, extension: &str) -> CacheResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&self.cache_dir, source)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| io_error(&self.cache_dir, source))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.display().to_string(),
        source,
    }
}
