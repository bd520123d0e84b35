//! Thread-safe pool of reusable encoder buffers
//!
//! Buffers are pushed when an encoder is released and popped when one is
//! acquired, so recently used (and already grown) buffers are reused first.
//! Every acquisition truncates the buffer, so content never leaks from one
//! logical use into the next. The pool is best-effort: it keeps at most
//! `max_idle` buffers and drops anything that grew past
//! `max_retained_capacity`.

use super::error::{EncoderError, Result};
use super::logfmt::LogfmtEncoder;
use super::metrics::PoolMetrics;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Default capacity of a freshly allocated buffer
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Default number of idle buffers retained
pub const DEFAULT_MAX_IDLE: usize = 256;

/// Default ceiling on the capacity of a buffer returned to the pool
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Pool tuning knobs
///
/// # Examples
///
/// ```
/// use logfmt_encoder::PoolConfig;
///
/// let config = PoolConfig::new()
///     .with_initial_capacity(512)
///     .with_max_idle(32);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Capacity preallocated for new buffers
    pub initial_capacity: usize,
    /// Idle buffers kept on the free list
    pub max_idle: usize,
    /// Buffers larger than this are dropped instead of pooled
    pub max_retained_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_idle: DEFAULT_MAX_IDLE,
            max_retained_capacity: DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    #[must_use]
    pub fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(EncoderError::config(
                "PoolConfig",
                "initial_capacity must be greater than zero",
            ));
        }
        if self.max_retained_capacity < self.initial_capacity {
            return Err(EncoderError::config(
                "PoolConfig",
                format!(
                    "max_retained_capacity ({}) is smaller than initial_capacity ({})",
                    self.max_retained_capacity, self.initial_capacity
                ),
            ));
        }
        Ok(())
    }
}

/// A thread-safe free list of encoder buffers
#[derive(Debug)]
pub struct EncoderPool {
    idle: Mutex<Vec<Vec<u8>>>,
    config: PoolConfig,
    metrics: PoolMetrics,
}

impl EncoderPool {
    /// Create a pool with the default configuration
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::from_config(PoolConfig::default()))
    }

    /// Create a pool with a custom configuration
    pub fn with_config(config: PoolConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self::from_config(config)))
    }

    /// The process-wide pool used by [`LogfmtEncoder::new`]
    pub fn global() -> &'static Arc<EncoderPool> {
        static GLOBAL: OnceLock<Arc<EncoderPool>> = OnceLock::new();
        GLOBAL.get_or_init(EncoderPool::new)
    }

    fn from_config(config: PoolConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            config,
            metrics: PoolMetrics::new(),
        }
    }

    /// Acquire an empty encoder backed by a pooled buffer
    #[must_use]
    pub fn acquire(self: &Arc<Self>) -> LogfmtEncoder {
        LogfmtEncoder::from_parts(self.take_buffer(), Arc::clone(self))
    }

    pub(crate) fn take_buffer(&self) -> Vec<u8> {
        let pooled = self.idle.lock().pop();
        match pooled {
            Some(mut buffer) => {
                self.metrics.record_reuse();
                buffer.clear();
                buffer
            }
            None => {
                self.metrics.record_allocation();
                Vec::with_capacity(self.config.initial_capacity)
            }
        }
    }

    pub(crate) fn put_buffer(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > self.config.max_retained_capacity {
            self.metrics.record_discard();
            return;
        }
        buffer.clear();

        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_idle {
            idle.push(buffer);
            drop(idle);
            self.metrics.record_release();
        } else {
            drop(idle);
            self.metrics.record_discard();
        }
    }

    /// Number of buffers currently waiting on the free list
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Configuration this pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Acquire and release counters for this pool
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}
