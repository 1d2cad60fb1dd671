//! Content-addressed result cache.
//!
//! Entries live at `cache/<sha256-hex>.json` as `{ "result": ... }`. They are
//! never evicted or expired; whoever owns the directory prunes it.

use crate::store::layout::write_atomic;
use crate::utils::sha256_hex;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    result: String,
}

pub struct ContextCache {
    dir: PathBuf,
}

impl ContextCache {
    /// Open (creating if needed) the cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Key for `content`: SHA-256 hex of its exact bytes.
    pub fn key_for(content: &str) -> String {
        sha256_hex(content.as_bytes())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn put(&self, key: &str, result: &str) -> Result<()> {
        let entry = CacheEntry { result: result.to_string() };
        let json = serde_json::to_string(&entry)?;
        write_atomic(&self.entry_path(key), json.as_bytes())
    }

    /// Stored result for `key`, or `None` on a miss.
    ///
    /// An entry that cannot be parsed is treated as a miss.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading cache entry {}", path.display()))?;
        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) => Ok(Some(entry.result)),
            Err(err) => {
                tracing::warn!("Ignoring corrupt cache entry {}: {}", path.display(), err);
                Ok(None)
            }
        }
    }
}
