//! Locator cache.
//!
//! Path computation over a remote document costs one round trip per ascent
//! level, so hosts that resolve the same nodes repeatedly keep an LRU of
//! computed locator strings. The builders themselves stay stateless; the
//! cache is a caller-owned layer keyed by whatever stable node key the
//! caller's document provides (arena id, remote id).
//!
//! The cache does not observe tree mutation - callers must `clear` when the
//! underlying document changes.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::error::PathError;

/// Which locator grammar a cached entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Css,
    XPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    node: u64,
    kind: PathKind,
    optimized: bool,
}

/// LRU cache of computed locator strings
pub struct LocatorCache {
    inner: LruCache<CacheKey, String>,
}

impl LocatorCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        LocatorCache {
            inner: LruCache::new(capacity),
        }
    }

    /// Look up a cached locator without computing
    pub fn get(&mut self, node: u64, kind: PathKind, optimized: bool) -> Option<&str> {
        self.inner
            .get(&CacheKey { node, kind, optimized })
            .map(String::as_str)
    }

    /// Return the cached locator for the key, computing and storing it on a
    /// miss. Failed computations are not cached.
    pub fn get_or_compute<F>(
        &mut self,
        node: u64,
        kind: PathKind,
        optimized: bool,
        compute: F,
    ) -> Result<String, PathError>
    where
        F: FnOnce() -> Result<String, PathError>,
    {
        let key = CacheKey { node, kind, optimized };
        if let Some(hit) = self.inner.get(&key) {
            return Ok(hit.clone());
        }
        let value = compute()?;
        self.inner.put(key, value.clone());
        Ok(value)
    }

    /// Drop every entry (call after the source document mutates)
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of cached locators
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
