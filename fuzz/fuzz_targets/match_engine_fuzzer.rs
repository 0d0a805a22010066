//! Fuzz target for exposure matching
//!
//! Builds disclosed keys and observations from arbitrary input, planting some
//! observations that genuinely derive from a disclosed key.
//!
//! # Invariants
//!
//! - Matching never panics and never fails on valid containers
//! - Every planted observation is reported
//! - Every record names a disclosed day and a valid interval
//! - `matched` equals the number of records appended
//! - A second run over the same inputs appends the same records again

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use proxtrace_core::{find_matches, DisclosedKeys, MatchList, ObservedIdentifiers};
use proxtrace_crypto::{DailyKey, RollingIdentifier, MAX_INTERVAL};

#[derive(Debug, Clone, Arbitrary)]
struct MatchScenario {
    /// Disclosed keys (truncated to keep runs fast)
    disclosed: Vec<([u8; 16], u32)>,
    /// Random observations
    noise: Vec<([u8; 16], u8)>,
    /// Observations derived from disclosed keys: (key slot, interval)
    planted: Vec<(u8, u8)>,
}

fuzz_target!(|scenario: MatchScenario| {
    let mut disclosed = DisclosedKeys::new();
    for &(key, day) in scenario.disclosed.iter().take(4) {
        disclosed.add_disclosure(key, day);
    }

    let mut observed = ObservedIdentifiers::new();
    for &(id, interval) in scenario.noise.iter().take(16) {
        let _ = observed.add_observation(id, interval);
    }

    let mut planted = Vec::new();
    if !disclosed.is_empty() {
        for &(slot, interval) in scenario.planted.iter().take(8) {
            let key = disclosed.iter().nth(usize::from(slot) % disclosed.len());
            let Some(key) = key else { continue };
            let interval = interval % (MAX_INTERVAL + 1);
            let id = RollingIdentifier::derive(key, interval).expect("valid interval");
            observed.push(id);
            planted.push((key.day_index(), interval));
        }
    }

    let mut matches = MatchList::new();
    let summary = find_matches(&mut matches, &observed, &disclosed).expect("derivation");

    assert_eq!(summary.matched, matches.count());
    assert_eq!(summary.keys_scanned, disclosed.len());

    let days: Vec<u32> = disclosed.iter().map(DailyKey::day_index).collect();
    for record in &matches {
        assert!(days.contains(&record.day_index));
        assert!(record.interval_index <= MAX_INTERVAL);
    }
    for planted in &planted {
        assert!(
            matches.iter().any(|r| (r.day_index, r.interval_index) == *planted),
            "planted observation {planted:?} not matched"
        );
    }

    let first = matches.as_slice().to_vec();
    let again = find_matches(&mut matches, &observed, &disclosed).expect("derivation");
    assert_eq!(again, summary);
    assert_eq!(&matches.as_slice()[first.len()..], first.as_slice());
});
