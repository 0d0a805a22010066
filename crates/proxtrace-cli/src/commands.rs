//! Command implementations.
//!
//! Each command writes its result to the supplied writer and logs through
//! `tracing`; `main` wires them to stdout and the subscriber.

use std::{io::Write, path::Path};

use proxtrace_core::{Environment, MatchList, TracingState, find_matches};
use proxtrace_crypto::{DailyKey, DeviceSecret, derive_day_identifiers};

use crate::{error::CliError, keyfile};

/// Which point on the key schedule `keys` should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// The environment's current time
    Now,
    /// A Unix timestamp
    At(u64),
    /// An explicit day and interval
    Explicit {
        /// Day index
        day: u32,
        /// Interval index
        interval: u8,
    },
}

/// Print a freshly generated device secret.
pub fn generate<E: Environment>(env: E, out: &mut impl Write) -> Result<(), CliError> {
    let mut state = TracingState::new(env);
    state.generate_secret()?;

    writeln!(out, "{}", state.secret_base64()?)?;
    Ok(())
}

/// Print the daily key and rolling identifier of `secret` at `schedule`.
pub fn keys<E: Environment>(
    env: E,
    secret: &str,
    schedule: Schedule,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut state = TracingState::new(env);
    state.set_secret_base64(secret)?;

    match schedule {
        Schedule::Now => {
            state.sync_to_now()?;
        },
        Schedule::At(epoch_secs) => {
            state.sync_to(epoch_secs)?;
        },
        Schedule::Explicit { day, interval } => {
            state.set_day(day)?;
            state.set_interval(interval)?;
        },
    }

    let day = state.day_index().unwrap_or_default();
    let interval = state.interval_index().unwrap_or_default();
    writeln!(out, "day:        {day}")?;
    writeln!(out, "interval:   {interval}")?;
    writeln!(out, "daily key:  {}", state.daily_key_base64()?)?;
    writeln!(out, "identifier: {}", state.identifier_base64()?)?;
    Ok(())
}

/// Print all 144 identifiers `secret` broadcasts on `day`, one per line as
/// `<interval> <base64>`.
pub fn identifiers(secret: &str, day: u32, out: &mut impl Write) -> Result<(), CliError> {
    let secret = DeviceSecret::from_base64(secret)?;
    let daily_key = DailyKey::derive(&secret, day)?;

    for id in derive_day_identifiers(&daily_key)? {
        writeln!(out, "{} {}", id.interval_index(), id.to_base64()?)?;
    }
    Ok(())
}

/// Match observed identifiers against disclosed keys and print one
/// `<day> <interval>` line per match.
///
/// Returns the number of matches.
pub fn run_match(
    observed_path: &Path,
    disclosed_path: &Path,
    out: &mut impl Write,
) -> Result<usize, CliError> {
    let observed = keyfile::read_observed(observed_path)?;
    let disclosed = keyfile::read_disclosed(disclosed_path)?;

    let mut matches = MatchList::new();
    let summary = find_matches(&mut matches, &observed, &disclosed)?;

    for record in &matches {
        writeln!(out, "{} {}", record.day_index, record.interval_index)?;
    }

    if summary.interval_mismatches > 0 {
        tracing::warn!(
            count = summary.interval_mismatches,
            "identifiers matched at an interval other than their capture interval"
        );
    }
    tracing::info!(
        observed = observed.len(),
        disclosed = disclosed.len(),
        matches = summary.matched,
        "exposure check complete"
    );

    Ok(summary.matched)
}
