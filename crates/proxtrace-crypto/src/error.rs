//! Error types for key derivation and encoding

use thiserror::Error;

/// Errors from key derivation and key encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The KDF or MAC primitive reported a failure or produced the wrong
    /// amount of output
    #[error("derivation failed: {reason}")]
    Derivation {
        /// Reason reported by the primitive
        reason: String,
    },

    /// Input was not valid base64
    #[error("malformed base64 {what}: {reason}")]
    Format {
        /// What was being decoded
        what: &'static str,
        /// Reason decoding failed
        reason: String,
    },

    /// Decoded or encoded material has the wrong length
    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// What was being checked
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Caller-supplied output buffer cannot hold the result
    #[error("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes available
        capacity: usize,
    },

    /// Interval index outside `0..=143`
    #[error("interval index {interval} out of range (max {max})")]
    IntervalOutOfRange {
        /// Rejected interval
        interval: u8,
        /// Largest valid interval
        max: u8,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Derivation failures mean the primitive itself is broken. Everything
    /// else rejects a single input and the caller may retry with a corrected
    /// one.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Derivation { .. } => true,

            Self::Format { .. }
            | Self::InvalidLength { .. }
            | Self::BufferTooSmall { .. }
            | Self::IntervalOutOfRange { .. } => false,
        }
    }

    /// Returns true for errors caused by malformed input or output sizing
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::InvalidLength { .. } | Self::BufferTooSmall { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_fatal() {
        let err = CryptoError::Derivation { reason: "invalid length".to_string() };
        assert!(err.is_fatal());
        assert!(!err.is_format());
    }

    #[test]
    fn length_mismatch_is_format_error() {
        let err = CryptoError::InvalidLength { what: "device secret", expected: 32, actual: 31 };
        assert!(!err.is_fatal());
        assert!(err.is_format());
    }

    #[test]
    fn interval_out_of_range_is_neither() {
        let err = CryptoError::IntervalOutOfRange { interval: 200, max: 143 };
        assert!(!err.is_fatal());
        assert!(!err.is_format());
    }

    #[test]
    fn error_display() {
        let err = CryptoError::BufferTooSmall { needed: 25, capacity: 10 };
        assert_eq!(err.to_string(), "buffer too small: need 25 bytes, have 10");
    }
}
