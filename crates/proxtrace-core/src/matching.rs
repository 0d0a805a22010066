//! Exposure matching.
//!
//! Regenerates every identifier each disclosed key could have produced and
//! compares it against every observed identifier. The work is
//! `disclosed × 144 × observed` HMAC comparisons; both inputs are bounded by
//! the two-week retention window, so no index is built.

use proxtrace_crypto::{CryptoError, derive_day_identifiers};

use crate::container::{DisclosedKeys, MatchList, MatchRecord, ObservedIdentifiers};

/// Counters from one [`find_matches`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Disclosed keys whose identifiers were regenerated
    pub keys_scanned: usize,
    /// Records appended to the match list
    pub matched: usize,
    /// Byte-identical identifiers rejected because the capture interval did
    /// not agree with the derivation interval
    pub interval_mismatches: usize,
}

/// Append a [`MatchRecord`] for every observed identifier that a disclosed
/// key produces at the interval it was captured in.
///
/// Disclosed keys are visited in container order, intervals in ascending
/// order, observations in container order; records are appended in that
/// order. `matches` is never cleared, so repeated runs accumulate.
///
/// # Errors
///
/// Propagates a derivation failure. Records found for earlier keys stay in
/// `matches`.
pub fn find_matches(
    matches: &mut MatchList,
    observed: &ObservedIdentifiers,
    disclosed: &DisclosedKeys,
) -> Result<MatchSummary, CryptoError> {
    let mut summary = MatchSummary::default();

    for daily_key in disclosed {
        let generated = derive_day_identifiers(daily_key)?;
        summary.keys_scanned += 1;

        for candidate in &generated {
            for beacon in observed {
                if candidate != beacon {
                    continue;
                }

                if candidate.interval_index() != beacon.interval_index() {
                    summary.interval_mismatches += 1;
                    tracing::debug!(
                        day_index = daily_key.day_index(),
                        derived_interval = candidate.interval_index(),
                        captured_interval = beacon.interval_index(),
                        "identifier matched at a different interval"
                    );
                    continue;
                }

                matches.push(MatchRecord {
                    day_index: daily_key.day_index(),
                    interval_index: candidate.interval_index(),
                });
                summary.matched += 1;
            }
        }
    }

    tracing::debug!(
        keys = summary.keys_scanned,
        observed = observed.len(),
        matched = summary.matched,
        mismatched = summary.interval_mismatches,
        "exposure matching finished"
    );

    Ok(summary)
}
