//! In-memory TTL cache with per-entry expiry.
//!
//! Entries carry an absolute expiry instant and are hidden from readers
//! once that instant has passed. Eviction is lazy: `get`/`has` remove only
//! the entry being read, while `prune` sweeps every expired entry in one
//! pass. `len` counts expired-but-unread entries until one of those
//! operations removes them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use tokenlens_core::DEFAULT_CACHE_TTL;

/// Cache entry with an absolute expiry instant.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// An entry is live iff `now <= expires_at`.
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL in seconds, used whenever `set` omits an explicit TTL
    pub default_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

/// Generic in-memory cache with TTL-based expiration.
///
/// Keyed by opaque strings: no case or whitespace normalization is
/// performed. Thread-safe; share between consumers behind an `Arc`.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Creates a cache from a configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.default_ttl_seconds))
    }

    /// Returns the default TTL applied when `set` omits an explicit TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a value under `key` with the default TTL.
    ///
    /// Unconditionally overwrites any existing entry.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value under `key` with an explicit TTL.
    ///
    /// A zero TTL is accepted and yields an entry that is already expired
    /// on the next read.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Gets a value by key.
    ///
    /// Returns `None` if the key is missing or expired. Reading an expired
    /// entry removes it (lazy eviction); other expired entries are left in
    /// place until they are read or pruned.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(Instant::now()) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired under the read lock. Re-check under the write lock in
        // case a concurrent `set` replaced the entry in between.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.is_expired(Instant::now()) {
                entries.remove(key);
                return None;
            }
            return Some(entry.value.clone());
        }
        None
    }

    /// Checks whether `key` holds a live entry.
    ///
    /// Shares `get`'s eviction side effect on expired entries.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes an entry, expired or not.
    ///
    /// Returns whether something was removed. Idempotent.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Removes all entries unconditionally.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes every expired entry in one pass, leaving live entries
    /// untouched.
    pub fn prune(&self) {
        // One clock sample for the whole sweep keeps the expired set
        // consistent across entries.
        let now = Instant::now();
        self.entries.write().retain(|_, entry| !entry.is_expired(now));
    }

    /// Returns the number of entries, including expired-but-unread ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
