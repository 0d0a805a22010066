//! End-to-end exposure matching: one device broadcasts, another observes,
//! the first discloses a subset of its daily keys.

use proxtrace_core::{
    DisclosedKeys, MatchList, MatchRecord, ObservedIdentifiers, find_matches,
};
use proxtrace_crypto::{DailyKey, DeviceSecret, RollingIdentifier};

const SECRET: &str = "3UmKrtcQ2tfLE8UPSXHb4PtgRfE0E2xdSs+PGVIS8cc=";

const OBSERVED_AT: [(u32, u8); 8] =
    [(55, 1), (12, 15), (0, 5), (8787, 101), (1175, 142), (1175, 67), (187, 51), (12, 93)];

fn observations(secret: &DeviceSecret) -> ObservedIdentifiers {
    let mut observed = ObservedIdentifiers::new();
    for (day, interval) in OBSERVED_AT {
        let daily_key = DailyKey::derive(secret, day).unwrap();
        let id = RollingIdentifier::derive(&daily_key, interval).unwrap();
        observed.add_observation(*id.id(), interval).unwrap();
    }
    observed
}

fn disclosures(secret: &DeviceSecret, days: &[u32]) -> DisclosedKeys {
    let mut disclosed = DisclosedKeys::new();
    for &day in days {
        let daily_key = DailyKey::derive(secret, day).unwrap();
        disclosed.add_disclosure(*daily_key.key(), daily_key.day_index());
    }
    disclosed
}

#[test]
fn finds_exactly_the_disclosed_days() {
    let secret = DeviceSecret::from_base64(SECRET).unwrap();
    let observed = observations(&secret);
    let disclosed = disclosures(&secret, &[1175, 12]);

    let mut matches = MatchList::new();
    let summary = find_matches(&mut matches, &observed, &disclosed).unwrap();

    assert_eq!(summary.keys_scanned, 2);
    assert_eq!(summary.matched, 4);
    assert_eq!(summary.interval_mismatches, 0);

    let mut found: Vec<MatchRecord> = matches.iter().copied().collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            MatchRecord { day_index: 12, interval_index: 15 },
            MatchRecord { day_index: 12, interval_index: 93 },
            MatchRecord { day_index: 1175, interval_index: 67 },
            MatchRecord { day_index: 1175, interval_index: 142 },
        ]
    );
}

#[test]
fn records_follow_key_then_interval_order() {
    let secret = DeviceSecret::from_base64(SECRET).unwrap();
    let observed = observations(&secret);
    let disclosed = disclosures(&secret, &[1175, 12]);

    let mut matches = MatchList::new();
    find_matches(&mut matches, &observed, &disclosed).unwrap();

    let order: Vec<(u32, u8)> =
        matches.iter().map(|record| (record.day_index, record.interval_index)).collect();
    assert_eq!(order, vec![(1175, 67), (1175, 142), (12, 15), (12, 93)]);
}

#[test]
fn other_device_disclosures_never_match() {
    let secret = DeviceSecret::from_base64(SECRET).unwrap();
    let observed = observations(&secret);

    let stranger = DeviceSecret::from_bytes([0x5A; 32]);
    let disclosed = disclosures(&stranger, &[55, 12, 0, 8787, 1175, 187]);

    let mut matches = MatchList::new();
    let summary = find_matches(&mut matches, &observed, &disclosed).unwrap();

    assert!(matches.is_empty());
    assert_eq!(summary.keys_scanned, 6);
}

#[test]
fn observation_with_wrong_capture_interval_is_rejected() {
    let secret = DeviceSecret::from_base64(SECRET).unwrap();
    let daily_key = DailyKey::derive(&secret, 12).unwrap();
    let id = RollingIdentifier::derive(&daily_key, 15).unwrap();

    let mut observed = ObservedIdentifiers::new();
    observed.add_observation(*id.id(), 16).unwrap();
    let disclosed = disclosures(&secret, &[12]);

    let mut matches = MatchList::new();
    let summary = find_matches(&mut matches, &observed, &disclosed).unwrap();

    assert!(matches.is_empty());
    assert_eq!(summary.interval_mismatches, 1);
}

#[test]
fn base64_round_trip_through_containers() {
    let secret = DeviceSecret::from_base64(SECRET).unwrap();
    let daily_key = DailyKey::derive(&secret, 9).unwrap();

    let mut observed = ObservedIdentifiers::new();
    observed.add_observation_base64("GrqeroryZQ+Uvhx10zfKWw==", 82).unwrap();

    let mut disclosed = DisclosedKeys::new();
    disclosed.add_disclosure_base64(&daily_key.to_base64().unwrap(), 9).unwrap();

    let mut matches = MatchList::new();
    find_matches(&mut matches, &observed, &disclosed).unwrap();
    assert_eq!(matches.as_slice(), &[MatchRecord { day_index: 9, interval_index: 82 }]);
}
