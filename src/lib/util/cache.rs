//! Module implementing a thread-safe LRU cache.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use antidote::Mutex;
use lru_cache::LruCache;


/// A thread-safe cache of keys & cached values.
/// Actual values stored in the cache are `Arc<V>'`s.
///
/// This is a wrapper around `LruCache` that also counts cache hits & misses.
/// It backs both the font cache of the `Engine`
/// and the per-task memoization of text measurements.
pub struct ThreadSafeCache<K, V, S = RandomState>
    where K: Eq + Hash, S: BuildHasher
{
    inner: Mutex<LruCache<K, Arc<V>, S>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<K: Eq + Hash, V> ThreadSafeCache<K, V> {
    /// Create the cache with given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Create the cache with custom hasher and given capacity.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        ThreadSafeCache{
            inner: Mutex::new(LruCache::with_hasher(capacity, hasher)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }
}

impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Get the element corresponding to given key if it's present in the cache.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash
    {
        match self.inner.lock().get_mut(key) {
            Some(v) => { self.hit(); Some(v.clone()) }
            None => { self.miss(); None }
        }
    }

    /// Put an item into cache under given key.
    ///
    /// Returns the (`Arc`'d) value that ends up in the cache.
    pub fn put(&self, k: K, v: V) -> Arc<V> {
        let value = Arc::new(v);
        self.inner.lock().insert(k, value.clone());
        value
    }

    /// Get the element under given key,
    /// or compute it with given function and cache the result.
    pub fn get_or_insert_with<Q, F>(&self, key: &Q, f: F) -> Arc<V>
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash + ToOwned<Owned=K>,
              F: FnOnce() -> V
    {
        match self.get(key) {
            Some(v) => v,
            None => self.put(key.to_owned(), f()),
        }
    }

    /// Get the element under given key,
    /// or compute it with given (fallible) function and cache the result.
    ///
    /// The lock is *not* held while the value is being computed,
    /// so concurrent callers may end up computing it more than once.
    pub fn get_or_try_insert_with<Q, F, E>(&self, key: &Q, f: F) -> Result<Arc<V>, E>
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash + ToOwned<Owned=K>,
              F: FnOnce() -> Result<V, E>
    {
        if let Some(v) = self.get(key) {
            return Ok(v);
        }
        let value = f()?;
        Ok(self.put(key.to_owned(), value))
    }

    /// Cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Current size of the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Remove all elements from the cache.
    ///
    /// Statistics are left untouched.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

// Statistics.
impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats{hits: self.hits(), misses: self.misses()}
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

impl<K, V, S> fmt::Debug for ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("ThreadSafeCache");
        if let Ok(inner) = self.inner.try_lock() {
            ds.field("capacity", &inner.capacity());
            ds.field("len", &inner.len());
        }
        ds.field("hits", &self.hits());
        ds.field("misses", &self.misses());
        ds.finish()
    }
}


/// Hit & miss counts of a `ThreadSafeCache`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Total number of lookups.
    #[inline]
    pub fn lookups(&self) -> usize {
        self.hits + self.misses
    }

    /// Fraction of lookups that were hits, or `None` if there were no lookups.
    pub fn hit_ratio(&self) -> Option<f32> {
        match self.lookups() {
            0 => None,
            n => Some(self.hits as f32 / n as f32),
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} hit(s), {} miss(es)", self.hits, self.misses)
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::{CacheStats, ThreadSafeCache};

    #[test]
    fn counts_hits_and_misses() {
        let cache = ThreadSafeCache::<String, u32>::new(4);
        assert_that!(cache.get("foo")).is_none();
        cache.put("foo".into(), 42);
        assert_that!(cache.get("foo").map(|v| *v)).is_some().is_equal_to(42);
        assert_eq!(CacheStats{hits: 1, misses: 1}, cache.stats());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ThreadSafeCache::<String, u32>::new(2);
        cache.put("a".into(), 1);
        cache.put("b".into(), 2);
        cache.get("a");
        cache.put("c".into(), 3);
        assert_eq!(2, cache.len());
        assert_that!(cache.get("b")).is_none();
        assert_that!(cache.get("a")).is_some();
    }

    #[test]
    fn get_or_try_insert_with_computes_once() {
        let cache = ThreadSafeCache::<String, usize>::new(8);
        let mut calls = 0;
        for _ in 0..3 {
            let v: Result<_, ()> = cache.get_or_try_insert_with("four", || {
                calls += 1;
                Ok(4)
            });
            assert_eq!(4, *v.unwrap());
        }
        assert_eq!(1, calls);
        assert_eq!(2, cache.hits());
    }

    #[test]
    fn get_or_try_insert_with_error_is_not_cached() {
        let cache = ThreadSafeCache::<String, usize>::new(8);
        let r = cache.get_or_try_insert_with("x", || Err("nope"));
        assert_that!(r).is_err();
        assert!(cache.is_empty());
    }

    #[test]
    fn hit_ratio() {
        assert_that!(CacheStats::default().hit_ratio()).is_none();
        assert_that!(CacheStats{hits: 3, misses: 1}.hit_ratio())
            .is_some().is_equal_to(0.75);
    }
}
