//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A destination that turns [`LogEntry`] values into output
pub trait Appender: Send + Sync {
    /// Render and write one entry
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;

    /// Append entries in order, stopping at the first failure
    fn append_all(&mut self, entries: &[LogEntry]) -> Result<()> {
        for entry in entries {
            self.append(entry)?;
        }
        Ok(())
    }
}
