// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Flat-file response cache
//!
//! API snapshots are cached as JSON files under the cache directory, one
//! file per named entry. Offline runs read these instead of the network.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WuiError};

/// Cache entry holding the user directory.
pub const USERS_CACHE: &str = "users";
/// Cache entry holding the page search results.
pub const PAGES_CACHE: &str = "pages";
/// Partial page snapshot written during long fetches.
pub const PAGES_CHECKPOINT_CACHE: &str = "pages_checkpoint";

/// One cached file, for `cache status` listings.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub name: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Load a cached entry, or `CacheMiss` when it has never been stored.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        if !path.is_file() {
            return Err(WuiError::CacheMiss(name.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn store<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(value)?;
        fs::write(self.path(name), json)?;
        log::debug!("cached {} ({} bytes)", name, self.path(name).metadata()?.len());
        Ok(())
    }

    /// Remove one entry. Returns whether anything was deleted.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path(name);
        if path.is_file() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove every cached entry. Returns the number of files deleted.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in self.entries()? {
            fs::remove_file(self.path(&entry.name))?;
            removed += 1;
        }
        Ok(removed)
    }

    /// List cached entries sorted by name.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        if !self.dir.is_dir() {
            return Ok(entries);
        }
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            let path = dirent.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let meta = dirent.metadata()?;
            entries.push(CacheEntry {
                name: stem.to_string(),
                size_bytes: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserInfo;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_users() -> BTreeMap<String, UserInfo> {
        let mut users = BTreeMap::new();
        users.insert(
            "u1".to_string(),
            UserInfo {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: Some("ada@example.com".to_string()),
                account_type: Some("person".to_string()),
            },
        );
        users
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.store(USERS_CACHE, &sample_users()).unwrap();

        let loaded: BTreeMap<String, UserInfo> = cache.load(USERS_CACHE).unwrap();
        assert_eq!(loaded, sample_users());
    }

    #[test]
    fn test_missing_entry_is_cache_miss() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path());
        let result: Result<BTreeMap<String, UserInfo>> = cache.load(PAGES_CACHE);
        assert!(matches!(result, Err(WuiError::CacheMiss(_))));
    }

    #[test]
    fn test_clear_removes_only_json_entries() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.store(USERS_CACHE, &sample_users()).unwrap();
        cache.store(PAGES_CACHE, &Vec::<String>::new()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(!cache.contains(USERS_CACHE));
        assert!(dir.path().join("notes.txt").is_file());
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.store("zebra", &1u32).unwrap();
        cache.store("alpha", &2u32).unwrap();

        let names: Vec<String> = cache.entries().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_status_on_missing_dir_is_empty() {
        let cache = SnapshotCache::new("/nonexistent/cache/dir");
        assert!(cache.entries().unwrap().is_empty());
    }
}
