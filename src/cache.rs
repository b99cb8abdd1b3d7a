//! A small TTL cache for spending snapshots with tag-based invalidation.
//!
//! The cache is an explicit object rather than a process-wide memoized
//! function so that its lifecycle is owned by whoever builds the services and
//! invalidation can be tested in isolation. The
//! [SpendingAggregator](crate::spending::SpendingAggregator) is its only
//! reader; writers of transaction data call [SpendingCache::invalidate] when
//! they change the underlying rows.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::{spending::SpendingSnapshot, user::UserID};

/// Invalidation tag covering every cached statistic.
pub const TAG_STATISTICS: &str = "statistics";

/// Invalidation tag covering cached spending breakdowns.
pub const TAG_SPENDING: &str = "spending";

/// How long a cached snapshot stays fresh unless invalidated first.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Identifies one cached result: which user it belongs to and which operation
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    user_id: UserID,
    operation: &'static str,
}

impl CacheKey {
    /// Create a cache key for `operation` computed for `user_id`.
    pub fn new(user_id: UserID, operation: &'static str) -> Self {
        Self { user_id, operation }
    }
}

#[derive(Debug)]
struct CacheEntry {
    snapshot: SpendingSnapshot,
    stored_at: Instant,
    tags: Vec<&'static str>,
}

/// Caches spending snapshots per user with a freshness window and tag-based
/// invalidation.
///
/// The cache is purely a performance optimization: entries may disappear at
/// any time and callers must be able to recompute.
#[derive(Debug)]
pub struct SpendingCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SpendingCache {
    /// Create a cache with the default freshness window of [DEFAULT_TTL].
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache whose entries stay fresh for `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached snapshot for `key`, if one exists and is still fresh.
    ///
    /// Expired entries are dropped on access.
    pub fn get(&self, key: &CacheKey) -> Option<SpendingSnapshot> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.snapshot.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `snapshot` under `key`, associated with `tags` for later
    /// invalidation. Replaces any existing entry for the key.
    pub fn put(&self, key: CacheKey, snapshot: SpendingSnapshot, tags: &[&'static str]) {
        let entry = CacheEntry {
            snapshot,
            stored_at: Instant::now(),
            tags: tags.to_vec(),
        };

        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Drop every entry associated with `tag`, regardless of remaining
    /// freshness.
    pub fn invalidate(&self, tag: &str) {
        self.entries
            .lock()
            .unwrap()
            .retain(|_, entry| !entry.tags.contains(&tag));
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Default for SpendingCache {
    fn default() -> Self {
        Self::new()
    }
}
