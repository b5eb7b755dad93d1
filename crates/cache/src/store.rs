use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;
use rustc_hash::FxBuildHasher;

/// Capacity-bounded, lock-striped key→value store with per-shard LRU
/// eviction.
///
/// Keys hash to one of a fixed number of independently-mutexed shards;
/// operations on different shards proceed fully concurrently, operations
/// on the same shard serialize. Every read-modify-write sequence on a key
/// must happen under the guard returned by [`ShardedStore::lock`], or
/// concurrent writers can lose updates.
pub struct ShardedStore<K: Hash + Eq, V> {
    shards: Vec<Mutex<Shard<K, V>>>,
    hasher: FxBuildHasher,
}

impl<K: Hash + Eq, V> ShardedStore<K, V> {
    /// `max_entries` is the total capacity; each of the `shard_count`
    /// shards holds `max_entries / shard_count` entries, at least one.
    pub fn new(max_entries: usize, shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let per_shard = (max_entries / shard_count).max(1);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(Shard::new(per_shard)))
            .collect();

        Self {
            shards,
            hasher: FxBuildHasher,
        }
    }

    /// Acquire the exclusive lock for the shard `key` hashes to. The
    /// shard unlocks when the guard is dropped.
    pub fn lock(&self, key: &K) -> MutexGuard<'_, Shard<K, V>> {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        self.shards[index]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total entries across all shards. Takes every shard lock in turn;
    /// diagnostic use only.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| {
                s.lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One lock's worth of entries. Only reachable through
/// [`ShardedStore::lock`], so every method already runs under the shard's
/// mutex.
pub struct Shard<K: Hash + Eq, V> {
    entries: LruCache<K, V, FxBuildHasher>,
}

impl<K: Hash + Eq, V> Shard<K, V> {
    fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            entries: LruCache::with_hasher(capacity, FxBuildHasher),
        }
    }

    /// Recency-promoting read.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Recency-promoting read with in-place mutation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Read without touching recency. Used right before an insert of the
    /// same key, where the insert promotes anyway.
    pub fn get_no_move(&self, key: &K) -> Option<&V> {
        self.entries.peek(key)
    }

    /// Insert or overwrite. When the shard is at capacity and `key` is
    /// new, the least-recently-used entry is dropped and returned so the
    /// caller can account for the eviction. Overwriting an existing key
    /// returns `None`.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        let inserted = key.clone();
        match self.entries.push(key, value) {
            Some((old_key, old_value)) if old_key != inserted => Some((old_key, old_value)),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
