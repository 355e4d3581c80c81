//! Request-keyed reuse cache.
//!
//! Maps the identity of a bundle request (the exact, un-deduplicated source
//! list) to the artifact name last produced for it. The cache is only an
//! acceleration: a hit is handed to the pipeline as the prior artifact name
//! and the pipeline still checks that the artifact exists on disk.
//!
//! All access goes through one mutex. Critical sections are a single map
//! lookup or update and never cover file I/O.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard},
};

use lru::LruCache;
use sha1::{Digest, Sha1};

/// How large the reuse cache may grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Keep every entry for the life of the process.
    #[default]
    Unbounded,
    /// Keep at most this many entries, evicting the least recently used.
    Lru(NonZeroUsize),
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct Inner {
    artifacts: LruCache<String, String>,
    stats: CacheStats,
}

/// Request key → last artifact name.
#[derive(Debug)]
pub struct ReuseCache {
    policy: CachePolicy,
    inner: Mutex<Inner>,
}

impl Default for ReuseCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ReuseCache {
    pub fn new(policy: CachePolicy) -> Self {
        let artifacts = match policy {
            CachePolicy::Unbounded => LruCache::unbounded(),
            CachePolicy::Lru(capacity) => LruCache::new(capacity),
        };
        Self {
            policy,
            inner: Mutex::new(Inner {
                artifacts,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Identity of a request: hex SHA-1 over the concatenated source paths,
    /// taken before deduplication.
    pub fn request_key<S: AsRef<str>>(sources: &[S]) -> String {
        let mut hasher = Sha1::new();
        for source in sources {
            hasher.update(source.as_ref().as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Artifact last recorded for `key`. A hit marks the entry most recently used.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut inner = self.lock();
        let found = inner.artifacts.get(key).cloned();
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    /// Records the artifact produced for `key`, replacing any previous one.
    pub fn record(&self, key: impl Into<String>, artifact: impl Into<String>) {
        let key = key.into();
        let mut inner = self.lock();
        // `push` hands back the replaced entry for a known key, or the evicted one.
        if let Some((displaced, _)) = inner.artifacts.push(key.clone(), artifact.into()) {
            if displaced != key {
                log::debug!("Evicted reuse cache entry {displaced}");
                inner.stats.evictions += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.artifacts.len(),
            ..inner.stats
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are plain strings written in one step; a panicked holder
        // cannot leave one half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
