//! Encoder and marshaler capability traits
//!
//! `Encoder` is the field-writing surface shared by every output format and
//! handed to user types through `LogMarshaler`. `LogfmtEncoder` is the
//! implementation in this crate.

use super::error::{EncoderError, Result};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Write;

/// A field sink that renders typed values into some wire format
pub trait Encoder {
    fn add_bool(&mut self, key: &str, value: bool);

    fn add_i64(&mut self, key: &str, value: i64);

    fn add_u64(&mut self, key: &str, value: u64);

    /// Pointer-sized values, rendered as an address
    fn add_uintptr(&mut self, key: &str, value: usize);

    fn add_f64(&mut self, key: &str, value: f64);

    fn add_string(&mut self, key: &str, value: &str);

    /// Raw bytes that are expected, but not guaranteed, to be UTF-8
    fn add_byte_string(&mut self, key: &str, value: &[u8]);

    /// Let `value` write its own fields into this encoder
    fn add_marshaler(&mut self, key: &str, value: &dyn LogMarshaler) -> Result<()>;

    /// Encode a value with no marshal capability.
    ///
    /// Encoders without a lossy fallback reject this with
    /// [`EncoderError::AddObjectNotImplemented`].
    fn add_object(&mut self, key: &str, value: &dyn fmt::Debug) -> Result<()> {
        let _ = (key, value);
        Err(EncoderError::AddObjectNotImplemented)
    }

    /// Write a complete entry (envelope plus accumulated fields) to `sink`
    fn write_entry(
        &self,
        sink: &mut dyn Write,
        message: &str,
        level: LogLevel,
        timestamp: &DateTime<Utc>,
    ) -> Result<()>;

    fn add_int(&mut self, key: &str, value: isize) {
        self.add_i64(key, value as i64);
    }

    fn add_uint(&mut self, key: &str, value: usize) {
        self.add_u64(key, value as u64);
    }

    fn add_f32(&mut self, key: &str, value: f32) {
        self.add_f64(key, f64::from(value));
    }
}

/// Implemented by user types that know how to log themselves.
///
/// # Example
///
/// ```
/// use logfmt_encoder::{Encoder, LogMarshaler, LogfmtEncoder, Result};
///
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// impl LogMarshaler for User {
///     fn marshal_log(&self, enc: &mut dyn Encoder) -> Result<()> {
///         enc.add_u64("user_id", self.id);
///         enc.add_string("user_name", &self.name);
///         Ok(())
///     }
/// }
///
/// let mut enc = LogfmtEncoder::new();
/// let user = User { id: 7, name: "ada".into() };
/// enc.add_marshaler("user", &user).unwrap();
/// assert_eq!(enc.as_bytes(), br#"user_id=7 user_name="ada""#);
/// ```
pub trait LogMarshaler {
    fn marshal_log(&self, enc: &mut dyn Encoder) -> Result<()>;
}

impl<T: LogMarshaler + ?Sized> LogMarshaler for &T {
    fn marshal_log(&self, enc: &mut dyn Encoder) -> Result<()> {
        (**self).marshal_log(enc)
    }
}
