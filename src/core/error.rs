//! Error types for the logfmt encoder

pub type Result<T> = std::result::Result<T, EncoderError>;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    /// Opaque nested objects cannot be encoded; route them through `LogMarshaler`
    #[error("add_object is not implemented for this encoder; implement LogMarshaler instead")]
    AddObjectNotImplemented,

    /// A user-supplied `LogMarshaler` reported failure
    #[error("marshal error: {message}")]
    Marshal { message: String },

    /// The sink rejected the write
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The sink accepted fewer bytes than the composed line
    #[error("incomplete write: only wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl EncoderError {
    /// Create a marshal failure, for use inside `LogMarshaler` implementations
    pub fn marshal(message: impl Into<String>) -> Self {
        EncoderError::Marshal {
            message: message.into(),
        }
    }

    /// Create a short write error
    pub fn short_write(written: usize, expected: usize) -> Self {
        EncoderError::ShortWrite { written, expected }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        EncoderError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EncoderError::short_write(3, 10);
        assert!(matches!(err, EncoderError::ShortWrite { written: 3, expected: 10 }));

        let err = EncoderError::config("PoolConfig", "initial_capacity must be non-zero");
        assert!(matches!(err, EncoderError::InvalidConfiguration { .. }));

        let err = EncoderError::marshal("bad user");
        assert!(matches!(err, EncoderError::Marshal { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = EncoderError::short_write(3, 10);
        assert_eq!(err.to_string(), "incomplete write: only wrote 3 of 10 bytes");

        let err = EncoderError::config("PoolConfig", "max_idle too small");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for PoolConfig: max_idle too small"
        );

        assert_eq!(
            EncoderError::AddObjectNotImplemented.to_string(),
            "add_object is not implemented for this encoder; implement LogMarshaler instead"
        );
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = EncoderError::from(io_err);

        assert_eq!(err.to_string(), "pipe closed");
        match err {
            EncoderError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
