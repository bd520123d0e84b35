//! Encoder pool metrics
//!
//! Counters for watching how well the buffer pool absorbs allocation under
//! load. The encoder never logs about itself, so these counters are the only
//! window into pool behaviour.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pool observability
///
/// # Example
///
/// ```
/// use logfmt_encoder::PoolMetrics;
///
/// let metrics = PoolMetrics::new();
/// metrics.record_allocation();
/// metrics.record_reuse();
///
/// assert_eq!(metrics.allocations(), 1);
/// assert_eq!(metrics.reuse_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct PoolMetrics {
    /// Buffers created because the pool was empty
    allocations: AtomicU64,

    /// Acquisitions served from an idle buffer
    reuses: AtomicU64,

    /// Buffers put back on the free list
    releases: AtomicU64,

    /// Released buffers dropped (pool full or buffer oversized)
    discards: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            reuses: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            discards: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reuses(&self) -> u64 {
        self.reuses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discards(&self) -> u64 {
        self.discards.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_allocation(&self) -> u64 {
        self.allocations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reuse(&self) -> u64 {
        self.reuses.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_release(&self) -> u64 {
        self.releases.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discard(&self) -> u64 {
        self.discards.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of acquisitions served from the pool, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been acquired yet.
    pub fn reuse_rate(&self) -> f64 {
        let reused = self.reuses() as f64;
        let total = self.allocations() as f64 + reused;
        if total == 0.0 {
            0.0
        } else {
            (reused / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.allocations.store(0, Ordering::Relaxed);
        self.reuses.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
        self.discards.store(0, Ordering::Relaxed);
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PoolMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            allocations: AtomicU64::new(self.allocations()),
            reuses: AtomicU64::new(self.reuses()),
            releases: AtomicU64::new(self.releases()),
            discards: AtomicU64::new(self.discards()),
        }
    }
}
