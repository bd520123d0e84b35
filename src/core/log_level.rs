//! Log level definitions
//!
//! Levels are an ordered integer space. The six named levels have a canonical
//! lowercase name; any other value is carried through and rendered as its
//! raw integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defaults to [`LogLevel::INFO`], the zero value
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogLevel(i8);

impl LogLevel {
    pub const DEBUG: LogLevel = LogLevel(-1);
    pub const INFO: LogLevel = LogLevel(0);
    pub const WARN: LogLevel = LogLevel(1);
    pub const ERROR: LogLevel = LogLevel(2);
    pub const PANIC: LogLevel = LogLevel(3);
    pub const FATAL: LogLevel = LogLevel(4);

    /// Wrap an arbitrary level value, named or not
    pub const fn from_i8(value: i8) -> Self {
        LogLevel(value)
    }

    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// Canonical lowercase name, or `None` for unrecognized values
    pub fn as_str(&self) -> Option<&'static str> {
        match *self {
            LogLevel::DEBUG => Some("debug"),
            LogLevel::INFO => Some("info"),
            LogLevel::WARN => Some("warn"),
            LogLevel::ERROR => Some("error"),
            LogLevel::PANIC => Some("panic"),
            LogLevel::FATAL => Some("fatal"),
            _ => None,
        }
    }

    pub fn is_named(&self) -> bool {
        self.as_str().is_some()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i8> for LogLevel {
    fn from(value: i8) -> Self {
        LogLevel(value)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::DEBUG),
            "info" => Ok(LogLevel::INFO),
            "warn" | "warning" => Ok(LogLevel::WARN),
            "error" => Ok(LogLevel::ERROR),
            "panic" => Ok(LogLevel::PANIC),
            "fatal" => Ok(LogLevel::FATAL),
            other => other
                .parse::<i8>()
                .map(LogLevel)
                .map_err(|_| format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_levels_are_ordered() {
        assert!(LogLevel::DEBUG < LogLevel::INFO);
        assert!(LogLevel::INFO < LogLevel::WARN);
        assert!(LogLevel::WARN < LogLevel::ERROR);
        assert!(LogLevel::ERROR < LogLevel::PANIC);
        assert!(LogLevel::PANIC < LogLevel::FATAL);
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::INFO);
        assert_eq!(LogLevel::default().as_i8(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(LogLevel::DEBUG.to_string(), "debug");
        assert_eq!(LogLevel::FATAL.to_string(), "fatal");
        assert_eq!(LogLevel::from_i8(42).to_string(), "42");
        assert_eq!(LogLevel::from_i8(-7).to_string(), "-7");
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::WARN));
        assert_eq!("Error".parse::<LogLevel>(), Ok(LogLevel::ERROR));
        assert_eq!("9".parse::<LogLevel>(), Ok(LogLevel::from_i8(9)));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_as_integer() {
        let json = serde_json::to_string(&LogLevel::WARN).expect("serialize");
        assert_eq!(json, "1");

        let level: LogLevel = serde_json::from_str("-1").expect("deserialize");
        assert_eq!(level, LogLevel::DEBUG);
    }
}
