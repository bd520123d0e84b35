//! logfmt appender
//!
//! Writes each entry as one logfmt line:
//! `level=info msg="..." ts=... ts="..." <context fields>`.

use crate::core::{Appender, Encoder, EncoderPool, LogEntry, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Appender that renders entries with a pooled [`LogfmtEncoder`]
///
/// [`LogfmtEncoder`]: crate::core::LogfmtEncoder
///
/// # Example
///
/// ```
/// use logfmt_encoder::prelude::*;
///
/// let mut appender = LogfmtAppender::new(Vec::new());
/// let entry = LogEntry::new(LogLevel::INFO, "ready")
///     .with_context(LogContext::new().with_field("port", 8080));
///
/// appender.append(&entry).unwrap();
/// let line = String::from_utf8(appender.get_ref().clone()).unwrap();
/// assert!(line.starts_with("level=info msg=\"ready\" ts="));
/// assert!(line.ends_with(" port=8080\n"));
/// ```
pub struct LogfmtAppender<W: Write + Send + Sync> {
    writer: W,
    pool: Arc<EncoderPool>,
}

impl<W: Write + Send + Sync> LogfmtAppender<W> {
    /// Wrap a writer, drawing encoders from the global pool
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pool: Arc::clone(EncoderPool::global()),
        }
    }

    /// Draw encoders from a dedicated pool instead of the global one
    #[must_use]
    pub fn with_pool(mut self, pool: Arc<EncoderPool>) -> Self {
        self.pool = pool;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl LogfmtAppender<BufWriter<File>> {
    /// Append to the file at `path`, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send + Sync> Appender for LogfmtAppender<W> {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut enc = self.pool.acquire();
        if let Some(ref context) = entry.context {
            enc.add_marshaler("context", context)?;
        }
        enc.write_entry(
            &mut self.writer,
            &entry.message,
            entry.level,
            &entry.timestamp,
        )
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "logfmt"
    }
}

impl<W: Write + Send + Sync> Drop for LogfmtAppender<W> {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the sink
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EncoderError, LogContext, LogLevel};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use std::io;
    use tempfile::tempdir;

    fn entry(message: &str) -> LogEntry {
        let ts = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        LogEntry::new(LogLevel::INFO, message).with_timestamp(ts)
    }

    #[test]
    fn test_logfmt_appender_line() -> Result<()> {
        let mut appender = LogfmtAppender::new(Vec::new());
        let context = LogContext::new()
            .with_field("user_id", 123)
            .with_field("action", "login");

        appender.append(&entry("User logged in").with_context(context))?;

        assert_eq!(
            String::from_utf8_lossy(appender.get_ref()),
            "level=info msg=\"User logged in\" ts=2025-01-08T10:30:45Z \
             ts=\"2025-01-08T10:30:45Z\" user_id=123 action=\"login\"\n"
        );
        Ok(())
    }

    #[test]
    fn test_logfmt_appender_multiple_entries() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.log");

        {
            let mut appender = LogfmtAppender::file(&log_path)?;
            let entries: Vec<LogEntry> = (0..5)
                .map(|i| {
                    entry(&format!("Iteration {}\ninjected", i))
                        .with_context(LogContext::new().with_field("iteration", i))
                })
                .collect();
            appender.append_all(&entries)?;
            appender.flush()?;
        }

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5, "newlines in messages must stay escaped");
        for (i, line) in lines.iter().enumerate() {
            assert!(line.contains(&format!(r#"msg="Iteration {}\ninjected""#, i)));
            assert!(line.ends_with(&format!("iteration={}", i)));
        }
        Ok(())
    }

    #[test]
    fn test_logfmt_appender_uses_given_pool() -> Result<()> {
        let pool = EncoderPool::new();
        let mut appender = LogfmtAppender::new(Vec::new()).with_pool(Arc::clone(&pool));

        appender.append(&entry("one"))?;
        appender.append(&entry("two"))?;

        // Field encoder and line buffer are both back on the free list
        assert_eq!(pool.idle(), 2);
        assert!(pool.metrics().reuses() >= 2);
        Ok(())
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logfmt_appender_propagates_sink_error() {
        let mut appender = LogfmtAppender::new(ClosedSink);
        let result = appender.append(&entry("lost"));
        assert!(matches!(result, Err(EncoderError::Io(_))));
        assert_eq!(appender.name(), "logfmt");
    }
}
