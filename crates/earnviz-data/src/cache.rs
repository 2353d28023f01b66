//! On-disk cache for provider lookup tables.
//!
//! Only static reference data (such as the SEC ticker → CIK table) goes
//! here. Statements themselves are always fetched fresh.

use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// File-backed cache of raw response bodies.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
    max_age: Duration,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`. `None` disables caching.
    pub const fn new(dir: Option<PathBuf>, max_age: Duration) -> Self {
        Self { dir, max_age }
    }

    /// A cache that never stores anything.
    pub const fn disabled() -> Self {
        Self::new(None, Duration::ZERO)
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.as_ref().map(|dir| dir.join(name))
    }

    /// Read a fresh entry. Stale, missing or unreadable entries are misses.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key)?;
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > self.max_age {
            tracing::debug!(key, ?age, "cache entry is stale");
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(body) => {
                tracing::debug!(key, path = %path.display(), "cache hit");
                Some(body)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read cache entry");
                None
            }
        }
    }

    /// Store an entry. A disabled cache ignores the call.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or file cannot be written.
    pub fn put(&self, key: &str, body: &str) -> Result<()> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("partial");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, path = %path.display(), "cached response");
        Ok(())
    }
}
