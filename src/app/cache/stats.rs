//! Cache statistics
//!
//! Counters are updated lock-free by the cache; [`CacheStats`] is a snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the catalog cache state and counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of sources with a cached catalog
    pub cached_sources: usize,
    /// Total items across all cached catalogs
    pub cached_items: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to build the catalog
    pub misses: u64,
    /// Successful catalog builds
    pub builds: u64,
    /// Catalog builds that failed
    pub failed_builds: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, as a percentage
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            (self.hits as f64 / lookups as f64) * 100.0
        }
    }
}

/// Live counters owned by the cache
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failed_builds: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_build(&self, succeeded: bool) {
        if succeeded {
            self.builds.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_builds.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Fill the counter fields of a snapshot
    pub(crate) fn snapshot(&self, cached_sources: usize, cached_items: usize) -> CacheStats {
        CacheStats {
            cached_sources,
            cached_items,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            failed_builds: self.failed_builds.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);

        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 75.0);
    }

    #[test]
    fn test_counters_snapshot() {
        let counters = CacheCounters::default();
        counters.record_miss();
        counters.record_build(true);
        counters.record_hit();
        counters.record_hit();
        counters.record_build(false);

        let stats = counters.snapshot(1, 42);
        assert_eq!(stats.cached_sources, 1);
        assert_eq!(stats.cached_items, 42);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.builds, 1);
        assert_eq!(stats.failed_builds, 1);
    }
}
