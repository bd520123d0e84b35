//! Structured fields carried alongside a log entry
//!
//! `LogContext` keeps fields in insertion order and does not deduplicate
//! keys; logfmt lines are flat and order-preserving, and so is this.

use super::encoder::{Encoder, LogMarshaler};
use super::error::Result;
use super::logfmt::LogfmtEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for structured logging fields
///
/// Serialized externally tagged (`{"uint": 5}`), so every variant survives a
/// round trip. Non-finite floats are written as `"NaN"`, `"+Inf"` or `"-Inf"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(#[serde(with = "serde_float")] f64),
    String(String),
}

impl FieldValue {
    /// Write this value under `key` using the encoder's rule for its type
    pub fn encode(&self, key: &str, enc: &mut dyn Encoder) {
        match self {
            FieldValue::Bool(b) => enc.add_bool(key, *b),
            FieldValue::Int(i) => enc.add_i64(key, *i),
            FieldValue::Uint(u) => enc.add_u64(key, *u),
            FieldValue::Float(f) => enc.add_f64(key, *f),
            FieldValue::String(s) => enc.add_string(key, s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

mod serde_float {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FloatHelper {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value == f64::INFINITY {
            serializer.serialize_str("+Inf")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-Inf")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FloatHelper::deserialize(deserializer)? {
            FloatHelper::Number(value) => Ok(value),
            FloatHelper::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "+Inf" => Ok(f64::INFINITY),
                "-Inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float value: {other}"))),
            },
        }
    }
}

/// Ordered key-value fields for one log entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogContext {
    fields: Vec<(String, FieldValue)>,
}

impl LogContext {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Append a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.push((key.into(), value.into()));
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// First value recorded under `key`
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Render the fields as a logfmt fragment
    pub fn format_fields(&self) -> String {
        let mut enc = LogfmtEncoder::new();
        for (key, value) in &self.fields {
            value.encode(key, &mut enc);
        }
        String::from_utf8_lossy(enc.as_bytes()).into_owned()
    }
}

impl LogMarshaler for LogContext {
    fn marshal_log(&self, enc: &mut dyn Encoder) -> Result<()> {
        for (key, value) in &self.fields {
            value.encode(key, enc);
        }
        Ok(())
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_creation() {
        let ctx = LogContext::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.format_fields(), "");
    }

    #[test]
    fn test_log_context_preserves_insertion_order() {
        let ctx = LogContext::new()
            .with_field("zeta", 1)
            .with_field("alpha", "a")
            .with_field("mid", true);

        let keys: Vec<&str> = ctx.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(ctx.format_fields(), r#"zeta=1 alpha="a" mid"#);
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let mut ctx = LogContext::new();
        ctx.add_field("attempt", 1);
        ctx.add_field("attempt", 2);

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("attempt"), Some(&FieldValue::Int(1)));
        assert_eq!(ctx.to_string(), "attempt=1 attempt=2");
    }

    #[test]
    fn test_field_value_types() {
        let ctx = LogContext::new()
            .with_field("s", "hi there")
            .with_field("i", -5i64)
            .with_field("u", u64::MAX)
            .with_field("f", 2.5)
            .with_field("off", false);

        assert_eq!(
            ctx.format_fields(),
            r#"s="hi there" i=-5 u=18446744073709551615 f=2.5 off=false"#
        );
    }

    #[test]
    fn test_context_as_marshaler() {
        let ctx = LogContext::new().with_field("request_id", "abc-123");
        let mut enc = LogfmtEncoder::new();
        enc.add_bool("cached", true);

        enc.add_marshaler("ctx", &ctx).expect("marshal context");

        assert_eq!(enc.as_bytes(), br#"cached request_id="abc-123""#);
    }

    #[test]
    fn test_field_value_serde() {
        let ctx = LogContext::new()
            .with_field("n", 3)
            .with_field("u", 5u64)
            .with_field("big", u64::MAX)
            .with_field("f", 2.0)
            .with_field("inf", f64::INFINITY)
            .with_field("ninf", f64::NEG_INFINITY)
            .with_field("on", true)
            .with_field("s", "x");
        let json = serde_json::to_string(&ctx).expect("serialize");
        let back: LogContext = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, ctx);
        assert_eq!(back.get("u"), Some(&FieldValue::Uint(5)));
        assert_eq!(back.get("f"), Some(&FieldValue::Float(2.0)));
    }

    #[test]
    fn test_field_value_serde_nan() {
        let ctx = LogContext::new().with_field("ratio", f64::NAN);
        let json = serde_json::to_string(&ctx).expect("serialize");
        assert_eq!(json, r#"{"fields":[["ratio",{"float":"NaN"}]]}"#);

        let back: LogContext = serde_json::from_str(&json).expect("deserialize");
        assert!(matches!(back.get("ratio"), Some(FieldValue::Float(v)) if v.is_nan()));
    }

    #[test]
    fn test_field_value_serde_rejects_unknown_float_text() {
        let result = serde_json::from_str::<FieldValue>(r#"{"float":"lots"}"#);
        assert!(result.is_err());
    }
}
