//! Error types for the tracing state machine.

use proxtrace_crypto::CryptoError;
use thiserror::Error;

use crate::{env::EntropyError, state::StateKind};

/// Errors from [`crate::TracingState`] operations.
///
/// Every failing operation leaves the state exactly as it was before the
/// call, so callers may retry or abort without losing valid keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracingError {
    /// Secret generation could not draw random bytes
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Derivation or encoding failure from the key chain
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Operation requires a later state
    #[error("cannot {operation} in state {state:?}")]
    InvalidState {
        /// Current state when the call was rejected
        state: StateKind,
        /// Operation that was attempted
        operation: &'static str,
    },
}

/// Coarse classification of a [`TracingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// RNG unavailable
    Entropy,
    /// KDF or MAC failure
    Derivation,
    /// Malformed input or size invariant violation
    Format,
    /// Caller invoked an operation out of order or with an out-of-range index
    Usage,
}

impl TracingError {
    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Entropy(_) => ErrorCategory::Entropy,
            Self::Crypto(CryptoError::Derivation { .. }) => ErrorCategory::Derivation,
            Self::Crypto(err) if err.is_format() => ErrorCategory::Format,
            Self::Crypto(_) | Self::InvalidState { .. } => ErrorCategory::Usage,
        }
    }

    /// Returns true if the failing operation cannot succeed on retry with the
    /// same inputs.
    ///
    /// Entropy failures are fatal to the call but the caller may retry once
    /// the platform RNG recovers, so they are not classified as fatal here.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Crypto(err) => err.is_fatal(),
            Self::Entropy(_) | Self::InvalidState { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let entropy = TracingError::from(EntropyError { reason: "closed".to_string() });
        assert_eq!(entropy.category(), ErrorCategory::Entropy);

        let derivation =
            TracingError::from(CryptoError::Derivation { reason: "bad length".to_string() });
        assert_eq!(derivation.category(), ErrorCategory::Derivation);
        assert!(derivation.is_fatal());

        let format = TracingError::from(CryptoError::InvalidLength {
            what: "device secret",
            expected: 44,
            actual: 12,
        });
        assert_eq!(format.category(), ErrorCategory::Format);
        assert!(!format.is_fatal());

        let range = TracingError::from(CryptoError::IntervalOutOfRange { interval: 150, max: 143 });
        assert_eq!(range.category(), ErrorCategory::Usage);
    }

    #[test]
    fn invalid_state_display() {
        let err = TracingError::InvalidState { state: StateKind::Empty, operation: "set day" };
        assert_eq!(err.to_string(), "cannot set day in state Empty");
    }

    #[test]
    fn transparent_display() {
        let err = TracingError::from(EntropyError { reason: "device closed".to_string() });
        assert_eq!(err.to_string(), "entropy source unavailable: device closed");
    }
}
