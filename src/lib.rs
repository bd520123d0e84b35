//! # logfmt encoder
//!
//! Renders structured log fields into the `logfmt` wire format: one line of
//! space-separated `key=value` pairs, safe for line-oriented shippers and
//! grep-based tooling.
//!
//! ## Features
//!
//! - **Byte-exact output**: keys are sanitized, string values quoted and escaped
//! - **Pooled buffers**: encoders and line buffers are reused across entries
//! - **Single write per entry**: each line reaches the sink in one `write` call
//! - **Marshaler hook**: user types log themselves through [`LogMarshaler`]
//!
//! ```
//! use logfmt_encoder::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let mut enc = LogfmtEncoder::new();
//! enc.add_string("path", "/health");
//! enc.add_i64("status", 200);
//!
//! let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
//! let mut out = Vec::new();
//! enc.write_entry(&mut out, "served", LogLevel::INFO, &ts).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "level=info msg=\"served\" ts=2025-01-08T10:30:45Z ts=\"2025-01-08T10:30:45Z\" \
//!      path=\"/health\" status=200\n"
//! );
//! ```

pub mod appenders;
pub mod core;

pub mod prelude {
    pub use crate::appenders::LogfmtAppender;
    pub use crate::core::{
        Appender, Encoder, EncoderError, EncoderPool, FieldValue, LogContext, LogEntry,
        LogLevel, LogMarshaler, LogfmtEncoder, PoolConfig, PoolMetrics, Result,
    };
}

pub use appenders::LogfmtAppender;
pub use core::{
    Appender, Encoder, EncoderError, EncoderPool, FieldValue, LogContext, LogEntry, LogLevel,
    LogMarshaler, LogfmtEncoder, PoolConfig, PoolMetrics, Result,
};
