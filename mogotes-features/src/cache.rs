//! In-memory TTL cache of flag sets, keyed by scope.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::FlagSet;

#[derive(Clone)]
struct CacheEntry {
    flags: FlagSet,
    // None when the TTL runs past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Flag sets per scope, each valid for a fixed TTL.
///
/// Expired entries are swept on every insert.
pub struct FlagCache {
    ttl: Duration,
    entries: RwLock<HashMap<Option<String>, CacheEntry>>,
}

impl FlagCache {
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached flags for a scope, if still fresh.
    pub fn get(&self, scope: Option<&str>) -> Option<FlagSet> {
        self.get_at(scope, Instant::now())
    }

    /// Store flags for a scope.
    pub fn insert(&self, scope: Option<&str>, flags: FlagSet) {
        self.insert_at(scope, flags, Instant::now());
    }

    /// Drop the entry for a scope.
    pub fn forget(&self, scope: Option<&str>) {
        self.entries.write().remove(&scope.map(str::to_string));
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn get_at(&self, scope: Option<&str>, now: Instant) -> Option<FlagSet> {
        let entries = self.entries.read();
        entries
            .get(&scope.map(str::to_string))
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.flags.clone())
    }

    fn insert_at(&self, scope: Option<&str>, flags: FlagSet, now: Instant) {
        let entry = CacheEntry {
            flags,
            expires_at: now.checked_add(self.ttl),
        };
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(scope.map(str::to_string), entry);
    }
}

impl std::fmt::Debug for FlagCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
