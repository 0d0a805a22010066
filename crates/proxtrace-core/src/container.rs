//! Ordered, append-only key collections.
//!
//! Disclosed daily keys and observed identifiers are only ever appended and
//! iterated first to last. Match results additionally support `clear`, since
//! [`crate::find_matches`] accumulates into its output.

use std::slice;

use proxtrace_crypto::{CryptoError, DAILY_KEY_SIZE, DailyKey, IDENTIFIER_SIZE, RollingIdentifier};

/// Insertion-ordered, append-only sequence of owned items.
#[derive(Debug, Clone)]
pub struct KeyContainer<T> {
    items: Vec<T>,
}

/// Daily keys disclosed by reporting parties.
pub type DisclosedKeys = KeyContainer<DailyKey>;

/// Identifiers captured from nearby devices, each tagged with its capture
/// interval.
pub type ObservedIdentifiers = KeyContainer<RollingIdentifier>;

impl<T> KeyContainer<T> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item; the container takes ownership.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Iterate first to last.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyContainer<DailyKey> {
    /// Append a disclosed key built from raw bytes and the disclosed day.
    pub fn add_disclosure(&mut self, key: [u8; DAILY_KEY_SIZE], day_index: u32) {
        self.push(DailyKey::from_bytes(key, day_index));
    }

    /// Append a disclosed key from its base64 form.
    ///
    /// Nothing is appended if the text is malformed.
    pub fn add_disclosure_base64(&mut self, text: &str, day_index: u32) -> Result<(), CryptoError> {
        self.push(DailyKey::from_base64(text, day_index)?);
        Ok(())
    }
}

impl KeyContainer<RollingIdentifier> {
    /// Append a captured identifier built from raw bytes and the capture
    /// interval.
    pub fn add_observation(
        &mut self,
        id: [u8; IDENTIFIER_SIZE],
        interval_index: u8,
    ) -> Result<(), CryptoError> {
        self.push(RollingIdentifier::from_bytes(id, interval_index)?);
        Ok(())
    }

    /// Append a captured identifier from its base64 form.
    ///
    /// Nothing is appended if the text is malformed or the interval is out of
    /// range.
    pub fn add_observation_base64(
        &mut self,
        text: &str,
        interval_index: u8,
    ) -> Result<(), CryptoError> {
        self.push(RollingIdentifier::from_base64(text, interval_index)?);
        Ok(())
    }
}

impl<T> Default for KeyContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for KeyContainer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for KeyContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<'a, T> IntoIterator for &'a KeyContainer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An observed identifier is consistent with a disclosed key at this
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchRecord {
    /// Day index of the disclosed key
    pub day_index: u32,
    /// Interval at which the identifier was produced and observed
    pub interval_index: u8,
}

/// Accumulated match results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchList {
    records: Vec<MatchRecord>,
}

impl MatchList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True if there are no matches.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate matches in the order they were found.
    pub fn iter(&self) -> slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    /// Matches as a slice.
    pub fn as_slice(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Remove all matches.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn push(&mut self, record: MatchRecord) {
        self.records.push(record);
    }
}

impl<'a> IntoIterator for &'a MatchList {
    type Item = &'a MatchRecord;
    type IntoIter = slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut disclosed = DisclosedKeys::new();
        disclosed.add_disclosure([1u8; DAILY_KEY_SIZE], 30);
        disclosed.add_disclosure([2u8; DAILY_KEY_SIZE], 10);
        disclosed.add_disclosure([3u8; DAILY_KEY_SIZE], 20);

        let days: Vec<u32> = disclosed.iter().map(DailyKey::day_index).collect();
        assert_eq!(days, vec![30, 10, 20]);
        assert_eq!(disclosed.len(), 3);
    }

    #[test]
    fn new_container_is_empty() {
        let observed = ObservedIdentifiers::default();
        assert!(observed.is_empty());
        assert_eq!(observed.iter().count(), 0);
    }

    #[test]
    fn rejected_observation_is_not_appended() {
        let mut observed = ObservedIdentifiers::new();
        observed.add_observation([0u8; IDENTIFIER_SIZE], 12).unwrap();

        assert!(observed.add_observation([0u8; IDENTIFIER_SIZE], 144).is_err());
        assert!(observed.add_observation_base64("short", 5).is_err());
        assert_eq!(observed.len(), 1);
    }

    #[test]
    fn disclosure_from_base64() {
        let mut disclosed = DisclosedKeys::new();
        disclosed.add_disclosure_base64("AzZ389DsGecAjZqby1sLNQ==", 12).unwrap();
        assert!(disclosed.add_disclosure_base64("AzZ389DsGecAjZqby1sLNQ=", 12).is_err());

        assert_eq!(disclosed.len(), 1);
        let first = disclosed.iter().next().unwrap();
        assert_eq!(first.day_index(), 12);
        assert_eq!(first.to_base64().unwrap(), "AzZ389DsGecAjZqby1sLNQ==");
    }

    #[test]
    fn collect_into_container() {
        let observed: ObservedIdentifiers = (0..5u8)
            .map(|i| RollingIdentifier::from_bytes([i; IDENTIFIER_SIZE], i).unwrap())
            .collect();

        let intervals: Vec<u8> = observed.iter().map(RollingIdentifier::interval_index).collect();
        assert_eq!(intervals, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn match_list_clear() {
        let mut matches = MatchList::new();
        matches.push(MatchRecord { day_index: 1, interval_index: 2 });
        matches.push(MatchRecord { day_index: 3, interval_index: 4 });
        assert_eq!(matches.count(), 2);

        matches.clear();
        assert!(matches.is_empty());
        assert_eq!(matches.count(), 0);
    }
}
