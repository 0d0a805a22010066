//! Tracing key state machine.
//!
//! Holds the device secret and the two keys derived from it, and regenerates
//! them as the day and interval move on. No I/O: randomness and wall-clock
//! time come from the injected [`Environment`].
//!
//! # State Machine
//!
//! ```text
//! ┌───────┐ generate/set ┌───────────┐  set_day  ┌──────────┐ set_interval ┌─────────────┐
//! │ Empty │─────secret──>│ SecretSet │──────────>│ DailySet │─────────────>│ IntervalSet │
//! └───────┘              └───────────┘           └──────────┘              └─────────────┘
//!                              ^
//!                              └──── generate/set secret, from any state
//! ```
//!
//! Replacing the secret discards both derived keys. `set_day` and
//! `set_interval` never move the state backwards, and a failed derivation
//! leaves the previously derived key in place.

use proxtrace_crypto::{DailyKey, DeviceSecret, RollingIdentifier, SECRET_SIZE, TimeIndex};
use zeroize::Zeroizing;

use crate::{env::Environment, error::TracingError};

/// Position of a [`TracingState`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKind {
    /// No device secret
    Empty,
    /// Device secret present, no daily key
    SecretSet,
    /// Daily key derived, no rolling identifier
    DailySet,
    /// Rolling identifier derived; fully initialised
    IntervalSet,
}

/// What [`TracingState::sync_to`] recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Schedule position the state was synced to
    pub now: TimeIndex,
    /// True if a new device secret was generated
    pub secret_generated: bool,
    /// True if the daily key was re-derived
    pub day_changed: bool,
    /// True if the rolling identifier was re-derived
    pub interval_changed: bool,
}

/// Per-device key chain: secret, current daily key, current identifier.
///
/// Owns all three values exclusively; they are zeroized when replaced or when
/// the state is dropped.
pub struct TracingState<E: Environment> {
    env: E,
    secret: Option<DeviceSecret>,
    daily_key: Option<DailyKey>,
    identifier: Option<RollingIdentifier>,
    /// Day of the daily key `identifier` was derived under
    identifier_day: Option<u32>,
}

impl<E: Environment> TracingState<E> {
    /// Create an empty state drawing time and randomness from `env`.
    pub fn new(env: E) -> Self {
        Self { env, secret: None, daily_key: None, identifier: None, identifier_day: None }
    }

    /// Current lifecycle position.
    pub fn state(&self) -> StateKind {
        match (&self.secret, &self.daily_key, &self.identifier) {
            (None, _, _) => StateKind::Empty,
            (Some(_), None, _) => StateKind::SecretSet,
            (Some(_), Some(_), None) => StateKind::DailySet,
            (Some(_), Some(_), Some(_)) => StateKind::IntervalSet,
        }
    }

    /// True once secret, daily key and identifier have all been set.
    pub fn is_initialised(&self) -> bool {
        self.state() == StateKind::IntervalSet
    }

    /// Draw a fresh 32-byte device secret from the environment.
    ///
    /// On entropy failure the state is unchanged.
    pub fn generate_secret(&mut self) -> Result<(), TracingError> {
        let mut bytes = Zeroizing::new([0u8; SECRET_SIZE]);
        if let Err(err) = self.env.random_bytes(&mut *bytes) {
            tracing::error!(error = %err, "failed to generate device secret");
            return Err(err.into());
        }

        self.install_secret(DeviceSecret::from_bytes(*bytes));
        tracing::debug!("generated device secret");
        Ok(())
    }

    /// Install a device secret restored from storage.
    pub fn set_secret(&mut self, secret: DeviceSecret) {
        self.install_secret(secret);
        tracing::debug!("device secret restored");
    }

    /// Install a device secret from its 44-character base64 form.
    ///
    /// On malformed input the state is unchanged.
    pub fn set_secret_base64(&mut self, text: &str) -> Result<(), TracingError> {
        let secret = DeviceSecret::from_base64(text)
            .inspect_err(|err| tracing::warn!(error = %err, "rejected base64 device secret"))?;
        self.set_secret(secret);
        Ok(())
    }

    /// Derive the daily key for `day_index`.
    ///
    /// Requires a device secret. The current identifier is kept, so a fully
    /// initialised state stays fully initialised, but that identifier still
    /// belongs to the previous daily key until [`Self::set_interval`] runs.
    /// [`Self::sync_to`] detects this and re-derives it.
    pub fn set_day(&mut self, day_index: u32) -> Result<(), TracingError> {
        let Some(secret) = &self.secret else {
            return Err(TracingError::InvalidState { state: self.state(), operation: "set day" });
        };

        let daily_key = DailyKey::derive(secret, day_index).inspect_err(|err| {
            tracing::error!(day_index, error = %err, "daily key derivation failed");
        })?;

        self.daily_key = Some(daily_key);
        tracing::debug!(day_index, "daily key rotated");
        Ok(())
    }

    /// Derive the rolling identifier for `interval_index` under the current
    /// daily key.
    ///
    /// Requires a daily key. Intervals past 143 are rejected.
    pub fn set_interval(&mut self, interval_index: u8) -> Result<(), TracingError> {
        let Some(daily_key) = &self.daily_key else {
            return Err(TracingError::InvalidState {
                state: self.state(),
                operation: "set interval",
            });
        };

        let identifier = RollingIdentifier::derive(daily_key, interval_index).inspect_err(|err| {
            tracing::error!(interval_index, error = %err, "rolling identifier derivation failed");
        })?;

        self.identifier = Some(identifier);
        self.identifier_day = Some(daily_key.day_index());
        tracing::debug!(day_index = daily_key.day_index(), interval_index, "identifier rotated");
        Ok(())
    }

    /// Bring the keys up to date with the environment's wall clock.
    ///
    /// See [`Self::sync_to`].
    pub fn sync_to_now(&mut self) -> Result<SyncOutcome, TracingError> {
        let now = self.env.wall_clock_secs();
        self.sync_to(now)
    }

    /// Bring the keys up to date with `epoch_secs`.
    ///
    /// Generates a secret if none is set, then re-derives the daily key only
    /// if the day changed (or none was set) and the identifier only if the
    /// day or interval changed (or none was set). Calling this repeatedly
    /// within one interval derives nothing.
    pub fn sync_to(&mut self, epoch_secs: u64) -> Result<SyncOutcome, TracingError> {
        let now = TimeIndex::from_epoch_secs(epoch_secs);

        let secret_generated = self.secret.is_none();
        if secret_generated {
            self.generate_secret()?;
        }

        let stored_day = self.daily_key.as_ref().map(DailyKey::day_index);
        let day_changed = stored_day != Some(now.day);
        if day_changed {
            self.set_day(now.day)?;
        }

        let stored_interval = self.identifier.as_ref().map(RollingIdentifier::interval_index);
        let stale = self.identifier_day != Some(now.day);
        let interval_changed = day_changed || stale || stored_interval != Some(now.interval);
        if interval_changed {
            self.set_interval(now.interval)?;
        }

        Ok(SyncOutcome { now, secret_generated, day_changed, interval_changed })
    }

    /// Device secret, if set.
    pub fn secret(&self) -> Option<&DeviceSecret> {
        self.secret.as_ref()
    }

    /// Current daily key, if derived.
    pub fn daily_key(&self) -> Option<&DailyKey> {
        self.daily_key.as_ref()
    }

    /// Current rolling identifier, if derived.
    pub fn identifier(&self) -> Option<&RollingIdentifier> {
        self.identifier.as_ref()
    }

    /// Day index of the current daily key.
    pub fn day_index(&self) -> Option<u32> {
        self.daily_key.as_ref().map(DailyKey::day_index)
    }

    /// Interval index of the current identifier.
    pub fn interval_index(&self) -> Option<u8> {
        self.identifier.as_ref().map(RollingIdentifier::interval_index)
    }

    /// 44-character base64 export of the device secret.
    pub fn secret_base64(&self) -> Result<String, TracingError> {
        let secret = self.secret.as_ref().ok_or_else(|| TracingError::InvalidState {
            state: self.state(),
            operation: "export secret",
        })?;
        Ok(secret.to_base64()?)
    }

    /// 24-character base64 form of the current daily key.
    pub fn daily_key_base64(&self) -> Result<String, TracingError> {
        let daily_key = self.daily_key.as_ref().ok_or_else(|| TracingError::InvalidState {
            state: self.state(),
            operation: "export daily key",
        })?;
        Ok(daily_key.to_base64()?)
    }

    /// 24-character base64 form of the current identifier.
    pub fn identifier_base64(&self) -> Result<String, TracingError> {
        let identifier = self.identifier.as_ref().ok_or_else(|| TracingError::InvalidState {
            state: self.state(),
            operation: "export identifier",
        })?;
        Ok(identifier.to_base64()?)
    }

    /// Owned copy of the current daily key, for disclosure after a positive
    /// report.
    pub fn disclose(&self) -> Result<DailyKey, TracingError> {
        let daily_key = self.daily_key.as_ref().ok_or_else(|| TracingError::InvalidState {
            state: self.state(),
            operation: "disclose daily key",
        })?;
        tracing::info!(day_index = daily_key.day_index(), "daily key disclosed");
        Ok(daily_key.clone())
    }

    fn install_secret(&mut self, secret: DeviceSecret) {
        self.identifier = None;
        self.identifier_day = None;
        self.daily_key = None;
        self.secret = Some(secret);
    }
}

impl<E: Environment> std::fmt::Debug for TracingState<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingState")
            .field("state", &self.state())
            .field("day_index", &self.day_index())
            .field("interval_index", &self.interval_index())
            .finish_non_exhaustive()
    }
}
