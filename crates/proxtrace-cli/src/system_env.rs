//! Production Environment implementation using the system clock and OS RNG.
//!
//! `SystemEnv` reads wall-clock time from `SystemTime` and draws randomness
//! from getrandom (`/dev/urandom`, `getrandom(2)`, `BCryptGenRandom`, ...).
//! Nothing about it is reproducible; tests use a seeded environment instead.

use proxtrace_core::{EntropyError, Environment};

/// Production environment using the system clock and cryptographic RNG.
///
/// # Security
///
/// Randomness comes straight from the OS CSPRNG and is suitable for device
/// secrets. An RNG failure is reported as [`EntropyError`]; the caller must
/// not fall back to a weaker source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| EntropyError { reason: e.to_string() })
    }

    /// Clocks set before 1970 read as the epoch itself.
    #[allow(clippy::disallowed_methods)]
    fn wall_clock_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1).unwrap();
        env.random_bytes(&mut bytes2).unwrap();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_clock_is_after_2020() {
        let env = SystemEnv::new();
        assert!(env.wall_clock_secs() > 1_577_836_800);
    }
}
