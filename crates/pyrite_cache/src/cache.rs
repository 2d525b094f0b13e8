//! The compilation cache.
//!
//! [`CompilationCache`] is an unbounded map from [`CacheKey`] to a shared
//! artifact. Entries are never evicted or replaced: once a key has an
//! artifact, every later lookup returns that same `Arc`. The cache is safe to
//! share between threads; lookups take a read lock and inserts a write lock.
//! A poisoned lock is recovered rather than propagated, since the map is
//! never left half-updated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::key::CacheKey;

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an artifact.
    pub hits: u64,
    /// Lookups that had to build one.
    pub misses: u64,
    /// Number of stored artifacts.
    pub entries: usize,
}

/// Memoizes compiled artifacts by source identity and content.
#[derive(Debug)]
pub struct CompilationCache<A> {
    entries: RwLock<HashMap<CacheKey, Arc<A>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<A> CompilationCache<A> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Arc<A>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Arc<A>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached artifact for `key`, or builds and stores one.
    ///
    /// `build` runs without holding the lock. If two callers race on the same
    /// key, both may build, but only the first insert is kept and both get
    /// the stored artifact back. A failed build stores nothing.
    pub fn get_or_try_insert_with<E, F>(&self, key: &CacheKey, build: F) -> Result<Arc<A>, E>
    where
        F: FnOnce() -> Result<A, E>,
    {
        if let Some(found) = self.read().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%key, "compilation cache hit");
            return Ok(Arc::clone(found));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(%key, "compilation cache miss");
        let built = Arc::new(build()?);

        let mut entries = self.write();
        let stored = entries.entry(key.clone()).or_insert(built);
        Ok(Arc::clone(stored))
    }

    /// Returns the cached artifact for `key` without touching the counters.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<A>> {
        self.read().get(key).cloned()
    }

    /// Returns `true` if `key` has an artifact.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.read().contains_key(key)
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<A> Default for CompilationCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_common::Fingerprint;
    use std::cell::Cell;
    use std::thread;

    fn key(id: &str, text: &str) -> CacheKey {
        CacheKey::new(id, Fingerprint::of_text(text))
    }

    #[test]
    fn second_lookup_returns_same_arc_without_building() {
        let cache = CompilationCache::new();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok::<_, ()>(String::from("artifact"))
        };

        let first = cache.get_or_try_insert_with(&key("a.py", "x"), build).unwrap();
        let second = cache.get_or_try_insert_with(&key("a.py", "x"), build).unwrap();

        assert_eq!(builds.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn edited_text_gets_a_new_entry() {
        let cache = CompilationCache::new();
        let old = cache
            .get_or_try_insert_with(&key("a.py", "x = 1"), || Ok::<_, ()>(1))
            .unwrap();
        let new = cache
            .get_or_try_insert_with(&key("a.py", "x = 2"), || Ok::<_, ()>(2))
            .unwrap();

        assert_eq!((*old, *new), (1, 2));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a.py", "x = 1")).as_deref(), Some(&1));
    }

    #[test]
    fn same_text_under_another_identifier_is_separate() {
        let cache = CompilationCache::new();
        cache
            .get_or_try_insert_with(&key("a.py", "x"), || Ok::<_, ()>('a'))
            .unwrap();
        assert!(!cache.contains(&key("b.py", "x")));
    }

    #[test]
    fn failed_build_stores_nothing() {
        let cache: CompilationCache<u8> = CompilationCache::new();
        let err = cache
            .get_or_try_insert_with(&key("a.py", "x"), || Err("boom"))
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(cache.is_empty());

        let retried = cache
            .get_or_try_insert_with(&key("a.py", "x"), || Ok::<_, &str>(7))
            .unwrap();
        assert_eq!(*retried, 7);
    }

    #[test]
    fn first_insert_wins_across_threads() {
        let cache = Arc::new(CompilationCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache
                        .get_or_try_insert_with(&key("a.py", "x"), || Ok::<_, ()>(i))
                        .unwrap()
                })
            })
            .collect();
        let results: Vec<Arc<i32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = cache.get(&key("a.py", "x")).unwrap();
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &stored)));
        assert_eq!(cache.len(), 1);
    }
}
