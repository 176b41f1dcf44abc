//! Content-addressed cache of generated links
//!
//! Keyed by the BLAKE3 hash of the source, so repeated builds of an
//! unchanged editor buffer skip the parse.

use crate::generator::{generate, GeneratorResult};
use moka::sync::Cache;
use std::sync::Arc;

/// Default number of cached sources
pub const DEFAULT_CAPACITY: u64 = 256;

type SourceKey = [u8; 32];

/// Cache in front of [`generate`]
#[derive(Clone)]
pub struct LinkCache {
    inner: Cache<SourceKey, Arc<GeneratorResult>>,
}

impl LinkCache {
    /// Create cache holding at most `capacity` sources
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    /// Generate through the cache
    pub fn generate(&self, source: &str) -> Arc<GeneratorResult> {
        let key = *blake3::hash(source.as_bytes()).as_bytes();
        self.inner.get_with(key, || {
            tracing::trace!("link cache miss");
            Arc::new(generate(source))
        })
    }

    /// Whether a source is cached
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.inner
            .contains_key(blake3::hash(source.as_bytes()).as_bytes())
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for LinkCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for LinkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lookup_is_cached() {
        let cache = LinkCache::default();
        let first = cache.generate("alert( 1 )");
        assert!(cache.contains("alert( 1 )"));
        let second = cache.generate("alert( 1 )");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.bookmarklet, "javascript:alert(1)");
    }

    #[test]
    fn clear_evicts() {
        let cache = LinkCache::new(8);
        cache.generate("x()");
        cache.clear();
        assert!(!cache.contains("x()"));
    }
}
