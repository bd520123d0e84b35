//! Appender implementations

pub mod logfmt;

pub use logfmt::LogfmtAppender;

// Re-export trait for convenience
pub use crate::core::Appender;
