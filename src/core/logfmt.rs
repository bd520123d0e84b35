//! logfmt encoder
//!
//! Renders fields as a single line of space-separated `key=value` pairs.
//! Grammar accepted by logfmt readers:
//!
//! ```text
//! ident_byte  = any byte greater than ' ', excluding '=' and '"'
//! string_byte = any byte excluding '"' and '\'
//! garbage     = !ident_byte
//! ident       = ident_byte, { ident_byte }
//! key         = ident
//! value       = ident | '"', { string_byte | '\', '"' }, '"'
//! pair        = key, '=', value | key, '=' | key
//! message     = { garbage, pair }, garbage
//! ```
//!
//! Keys are sanitized rather than rejected: every character outside
//! `ident_byte` becomes the six-byte text `\ufffd`. String values are always
//! quoted and escaped. The accumulated buffer never carries a leading or
//! trailing space, so it can be spliced into a larger line verbatim.

use super::encoder::{Encoder, LogMarshaler};
use super::error::{EncoderError, Result};
use super::log_level::LogLevel;
use super::pool::EncoderPool;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Literal text written in place of disqualified key characters and
/// undecodable string bytes
const REPLACEMENT: &[u8] = br"\ufffd";

/// Pooled logfmt field encoder
///
/// An encoder owns one growable buffer borrowed from an [`EncoderPool`]. The
/// buffer goes back to the pool when the encoder is freed or dropped.
///
/// # Example
///
/// ```
/// use logfmt_encoder::{Encoder, LogfmtEncoder};
///
/// let mut enc = LogfmtEncoder::new();
/// enc.add_string("user", "alice");
/// enc.add_i64("attempt", 3);
/// enc.add_bool("admin", false);
/// assert_eq!(enc.as_bytes(), br#"user="alice" attempt=3 admin=false"#);
/// ```
pub struct LogfmtEncoder {
    buf: Vec<u8>,
    pool: Arc<EncoderPool>,
}

impl LogfmtEncoder {
    /// Acquire an empty encoder from the process-wide pool
    #[must_use]
    pub fn new() -> Self {
        EncoderPool::global().acquire()
    }

    pub(crate) fn from_parts(buf: Vec<u8>, pool: Arc<EncoderPool>) -> Self {
        Self { buf, pool }
    }

    /// Return this encoder's buffer to its pool
    pub fn free(self) {
        drop(self);
    }

    /// The logfmt fragment accumulated so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Length of the accumulated fragment in bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no field has been added yet
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The pool this encoder returns to
    pub fn pool(&self) -> &Arc<EncoderPool> {
        &self.pool
    }

    fn spacing(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push(b' ');
        }
    }

    fn add_key(&mut self, key: &str) {
        for c in key.chars() {
            if c > ' ' && c != '=' && c != '"' {
                let mut utf8 = [0u8; 4];
                self.buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            } else {
                self.buf.extend_from_slice(REPLACEMENT);
            }
        }
    }

    /// Escape text that is already known to be valid UTF-8
    fn escape_str(&mut self, value: &str) {
        for &b in value.as_bytes() {
            match b {
                b'\\' | b'"' => self.buf.extend_from_slice(&[b'\\', b]),
                b'\n' => self.buf.extend_from_slice(br"\n"),
                b'\r' => self.buf.extend_from_slice(br"\r"),
                b'\t' => self.buf.extend_from_slice(br"\t"),
                // Remaining ASCII and the bytes of valid multi-byte
                // sequences pass through untouched.
                _ => self.buf.push(b),
            }
        }
    }

    /// Escape bytes of unknown validity, resynchronising one byte at a time
    fn escape_bytes(&mut self, value: &[u8]) {
        for chunk in value.utf8_chunks() {
            self.escape_str(chunk.valid());
            // An invalid chunk never contains the start of a valid sequence,
            // so one marker per byte is the same as retrying at each byte.
            for _ in chunk.invalid() {
                self.buf.extend_from_slice(REPLACEMENT);
            }
        }
    }

    fn add_quoted(&mut self, key: &str, escape: impl FnOnce(&mut Self)) {
        self.spacing();
        self.add_key(key);
        self.buf.extend_from_slice(b"=\"");
        escape(self);
        self.buf.push(b'"');
    }

    fn add_level(&mut self, level: LogLevel) {
        self.spacing();
        self.add_key("level");
        self.buf.push(b'=');
        match level.as_str() {
            Some(name) => self.buf.extend_from_slice(name.as_bytes()),
            None => {
                // Writing into a Vec<u8> cannot fail
                let _ = write!(self.buf, "{}", level.as_i8());
            }
        }
    }

    fn add_time(&mut self, rfc3339: &str) {
        self.spacing();
        self.add_key("ts");
        self.buf.push(b'=');
        self.buf.extend_from_slice(rfc3339.as_bytes());
    }
}

impl Encoder for LogfmtEncoder {
    /// A true flag is written as a bare key
    fn add_bool(&mut self, key: &str, value: bool) {
        self.spacing();
        self.add_key(key);
        if !value {
            self.buf.extend_from_slice(b"=false");
        }
    }

    fn add_i64(&mut self, key: &str, value: i64) {
        self.spacing();
        self.add_key(key);
        let _ = write!(self.buf, "={}", value);
    }

    fn add_u64(&mut self, key: &str, value: u64) {
        self.spacing();
        self.add_key(key);
        let _ = write!(self.buf, "={}", value);
    }

    fn add_uintptr(&mut self, key: &str, value: usize) {
        self.spacing();
        self.add_key(key);
        let _ = write!(self.buf, "=0x{:x}", value);
    }

    fn add_f64(&mut self, key: &str, value: f64) {
        self.spacing();
        self.add_key(key);
        self.buf.push(b'=');
        if value.is_nan() {
            self.buf.extend_from_slice(b"NaN");
        } else if value == f64::INFINITY {
            self.buf.extend_from_slice(b"+Inf");
        } else if value == f64::NEG_INFINITY {
            self.buf.extend_from_slice(b"-Inf");
        } else {
            // Display is the shortest round-trip form and never uses an exponent
            let _ = write!(self.buf, "{}", value);
        }
    }

    fn add_string(&mut self, key: &str, value: &str) {
        self.add_quoted(key, |enc| enc.escape_str(value));
    }

    fn add_byte_string(&mut self, key: &str, value: &[u8]) {
        self.add_quoted(key, |enc| enc.escape_bytes(value));
    }

    /// logfmt has no nesting, so `key` is unused and the marshaler writes
    /// its fields directly into this line
    fn add_marshaler(&mut self, _key: &str, value: &dyn LogMarshaler) -> Result<()> {
        value.marshal_log(self)
    }

    /// Lossy fallback: the `Debug` rendering, quoted like any string
    fn add_object(&mut self, key: &str, value: &dyn fmt::Debug) -> Result<()> {
        let rendered = format!("{:?}", value);
        self.add_string(key, &rendered);
        Ok(())
    }

    /// Writes `level`, `msg`, `ts` and then the accumulated fields as one
    /// line, in a single `write` call.
    ///
    /// The line is composed in a second pooled buffer, so this never touches
    /// the encoder's own fields. Independent callers may run it concurrently;
    /// it must not race with field additions on the same encoder.
    fn write_entry(
        &self,
        sink: &mut dyn Write,
        message: &str,
        level: LogLevel,
        timestamp: &DateTime<Utc>,
    ) -> Result<()> {
        let ts = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut line = self.pool.acquire();
        line.add_level(level);
        line.add_string("msg", message);
        line.add_time(&ts);
        line.add_string("ts", &ts);
        if !self.buf.is_empty() {
            line.spacing();
            line.buf.extend_from_slice(&self.buf);
        }
        line.buf.push(b'\n');

        let expected = line.buf.len();
        let written = sink.write(&line.buf);
        line.free();

        let written = written?;
        if written < expected {
            return Err(EncoderError::short_write(written, expected));
        }
        Ok(())
    }
}

impl Clone for LogfmtEncoder {
    /// Copies the accumulated fields into a fresh encoder from the same pool
    fn clone(&self) -> Self {
        let mut clone = self.pool.acquire();
        clone.buf.extend_from_slice(&self.buf);
        clone
    }
}

impl Default for LogfmtEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogfmtEncoder {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.put_buffer(buf);
    }
}

impl fmt::Debug for LogfmtEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogfmtEncoder")
            .field("buf", &String::from_utf8_lossy(&self.buf))
            .finish()
    }
}
