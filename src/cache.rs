//! In-memory cache of remote reference lists and tree listings.
//!
//! Listing files and then downloading them queries the same
//! repository/reference pair several times in a row; the cache answers the
//! repeated lookups without going back to the remote.

use crate::http::redact_url;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct CacheMaps {
    /// Reference names, keyed by repository URL.
    refs: HashMap<String, Vec<String>>,
    /// Unfiltered tree paths, keyed by (repository URL, reference).
    trees: HashMap<TreeKey, Vec<String>>,
}

/// Concurrency-safe two-level cache owned by a provider instance.
///
/// Both maps sit behind a single lock which is only held for the map access
/// itself, never across a remote call. A disabled cache misses on every read
/// and ignores every write, so callers never special-case it.
///
/// # Examples
///
/// ```
/// use repofetch::cache::RepoCache;
///
/// let cache = RepoCache::new(true);
/// let url = "https://dev.azure.com/org/proj/_git/repo";
///
/// cache.set_refs(url, vec!["refs/heads/main".to_string()]);
/// cache.set_tree(url, "refs/heads/main", vec!["/a.yml".to_string()]);
/// assert!(cache.get_tree(url, "refs/heads/main").is_some());
///
/// cache.invalidate(url, "refs/heads/main");
/// assert!(cache.get_refs(url).is_none());
/// assert!(cache.get_tree(url, "refs/heads/main").is_none());
/// ```
#[derive(Debug)]
pub struct RepoCache {
    enabled: bool,
    maps: Mutex<CacheMaps>,
}

type TreeKey = (String, String);

fn tree_key(repository_url: &str, reference_name: &str) -> TreeKey {
    (repository_url.to_string(), reference_name.to_string())
}

impl RepoCache {
    /// Creates an empty cache. When `enabled` is `false` the cache is inert.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            maps: Mutex::new(CacheMaps::default()),
        }
    }

    /// Whether the cache stores anything at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn lock(&self) -> MutexGuard<'_, CacheMaps> {
        // The maps hold plain owned data, so a panic elsewhere cannot leave
        // them half-updated; recover from poisoning.
        self.maps.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the cached reference list of a repository.
    pub fn get_refs(&self, repository_url: &str) -> Option<Vec<String>> {
        if !self.enabled {
            return None;
        }
        self.lock().refs.get(repository_url).cloned()
    }

    /// Records the full reference list of a repository, replacing any previous one.
    pub fn set_refs(&self, repository_url: &str, refs: Vec<String>) {
        if !self.enabled {
            return;
        }
        self.lock().refs.insert(repository_url.to_string(), refs);
    }

    /// Returns the cached, unfiltered tree paths of a repository at a reference.
    pub fn get_tree(&self, repository_url: &str, reference_name: &str) -> Option<Vec<String>> {
        if !self.enabled {
            return None;
        }
        self.lock()
            .trees
            .get(&tree_key(repository_url, reference_name))
            .cloned()
    }

    /// Records the unfiltered tree paths of a repository at a reference.
    pub fn set_tree(&self, repository_url: &str, reference_name: &str, paths: Vec<String>) {
        if !self.enabled {
            return;
        }
        self.lock()
            .trees
            .insert(tree_key(repository_url, reference_name), paths);
    }

    /// Evicts the reference list of `repository_url` and its tree listing at
    /// `reference_name` in a single critical section.
    pub fn invalidate(&self, repository_url: &str, reference_name: &str) {
        let mut maps = self.lock();
        maps.refs.remove(repository_url);
        maps.trees.remove(&tree_key(repository_url, reference_name));
        log::debug!(
            "Evicted cached refs and tree for {} at '{}'",
            redact_url(repository_url),
            reference_name
        );
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        let mut maps = self.lock();
        maps.refs.clear();
        maps.trees.clear();
    }
}

impl Default for RepoCache {
    /// An enabled, empty cache.
    fn default() -> Self {
        Self::new(true)
    }
}
