//! Namespaced key/value cache with per-entry TTL, used for the bearer token.
//!
//! Readers and writers do not coordinate; the last writer wins.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Key/value store whose entries stop being returned once their TTL elapses.
pub trait TokenCache {
    /// Live value for `key`, or `None` if missing or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: TokenCache + ?Sized> TokenCache for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: TokenCache + ?Sized> TokenCache for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: String,
    /// Unix time in milliseconds after which the entry is dead.
    expires_at_ms: u64,
}

impl CacheEntry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at_ms: now_ms().saturating_add(ttl.as_millis() as u64),
        }
    }

    fn is_live(&self) -> bool {
        now_ms() < self.expires_at_ms
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// In-process cache; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .get(key)
            .filter(|e| e.is_live())
            .map(|e| e.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries()
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Cache persisted as one JSON file per namespace.
///
/// An unreadable or corrupt file is treated as empty and overwritten on the
/// next `set`.
#[derive(Debug, Clone)]
pub struct DiskCache {
    path: PathBuf,
}

impl DiskCache {
    /// Cache for `namespace` under `$XDG_CACHE_HOME/gfy/`.
    pub fn open(namespace: &str) -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("gfy")
            .map_err(|e| Error::Cache(format!("locate cache directory: {}", e)))?;
        let path = xdg_dirs.place_cache_file(format!("{}.json", namespace))?;
        Ok(Self::at(path))
    }

    /// Cache backed by the file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, CacheEntry> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("ignoring corrupt cache {}: {}", self.path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("cannot read cache {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn store(&self, entries: &HashMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(format!(".{}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(entries)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::Cache(format!("replace {}: {}", self.path.display(), e))
        })
    }
}

impl TokenCache for DiskCache {
    fn get(&self, key: &str) -> Option<String> {
        self.load()
            .remove(key)
            .filter(|e| e.is_live())
            .map(|e| e.value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.load();
        entries.retain(|_, e| e.is_live());
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cache_returns_live_entries() {
        let cache = MemoryCache::new();
        assert!(cache.get("bearer_token").is_none());
        cache
            .set("bearer_token", "tok", Duration::from_secs(3600))
            .unwrap();
        assert_eq!(cache.get("bearer_token").as_deref(), Some("tok"));
        cache.remove("bearer_token").unwrap();
        assert!(cache.get("bearer_token").is_none());
    }

    #[test]
    fn memory_cache_zero_ttl_is_never_returned() {
        let cache = MemoryCache::new();
        cache.set("bearer_token", "tok", Duration::ZERO).unwrap();
        assert!(cache.get("bearer_token").is_none());
    }

    #[test]
    fn disk_cache_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfycat.json");
        DiskCache::at(&path)
            .set("bearer_token", "tok", Duration::from_secs(60))
            .unwrap();
        assert_eq!(
            DiskCache::at(&path).get("bearer_token").as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn disk_cache_expired_entry_is_pruned_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::at(dir.path().join("gfycat.json"));
        cache.set("old", "x", Duration::ZERO).unwrap();
        cache.set("new", "y", Duration::from_secs(60)).unwrap();
        assert!(cache.get("old").is_none());
        let raw = fs::read_to_string(cache.path()).unwrap();
        assert!(!raw.contains("\"old\""));
        assert!(raw.contains("\"new\""));
    }

    #[test]
    fn disk_cache_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfycat.json");
        fs::write(&path, b"{not json").unwrap();
        let cache = DiskCache::at(&path);
        assert!(cache.get("bearer_token").is_none());
        cache
            .set("bearer_token", "fresh", Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get("bearer_token").as_deref(), Some("fresh"));
    }

    #[test]
    fn disk_cache_missing_file_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::at(dir.path().join("nested").join("gfycat.json"));
        assert!(cache.get("bearer_token").is_none());
        cache.remove("bearer_token").unwrap();
        cache
            .set("bearer_token", "tok", Duration::from_secs(60))
            .unwrap();
        cache.remove("bearer_token").unwrap();
        assert!(cache.get("bearer_token").is_none());
    }
}
