//! Environment abstraction for deterministic testing.
//!
//! Decouples the tracing state machine from system resources (wall-clock time,
//! randomness). Tests drive a virtual clock and a seeded RNG; the binary uses
//! the OS clock and the OS CSPRNG.

use thiserror::Error;

/// The entropy source could not supply bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source unavailable: {reason}")]
pub struct EntropyError {
    /// Reason reported by the source
    pub reason: String,
}

/// Abstract environment providing wall-clock time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `random_bytes()` either fills the whole buffer or returns an error
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes
    /// - On error the buffer contents are unspecified and must not be used
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Seconds since the Unix epoch.
    ///
    /// Only used to compute day and interval indices, so it need not be
    /// monotonic.
    fn wall_clock_secs(&self) -> u64;
}
