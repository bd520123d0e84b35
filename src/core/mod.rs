//! Core encoder types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logfmt;
pub mod metrics;
pub mod pool;

pub use appender::Appender;
pub use encoder::{Encoder, LogMarshaler};
pub use error::{EncoderError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logfmt::LogfmtEncoder;
pub use metrics::PoolMetrics;
pub use pool::{
    EncoderPool, PoolConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_IDLE,
    DEFAULT_MAX_RETAINED_CAPACITY,
};
