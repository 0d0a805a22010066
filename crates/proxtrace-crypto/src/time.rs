//! Wall-clock time to day and interval indices

/// Seconds in one day index.
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// Seconds in one interval index.
pub const SECONDS_PER_INTERVAL: u64 = 60 * 10;

/// Number of intervals in a day.
pub const INTERVALS_PER_DAY: u8 = 144;

/// Largest valid interval index.
pub const MAX_INTERVAL: u8 = INTERVALS_PER_DAY - 1;

/// Day index for a Unix timestamp.
///
/// Days past `u32::MAX` wrap; that is roughly eleven million years out.
pub fn day_index(epoch_secs: u64) -> u32 {
    (epoch_secs / SECONDS_PER_DAY) as u32
}

/// Ten-minute interval index within the day, clamped to `0..=143`.
pub fn interval_index(epoch_secs: u64) -> u8 {
    let seconds_into_day = epoch_secs % SECONDS_PER_DAY;
    let interval = seconds_into_day / SECONDS_PER_INTERVAL;

    interval.min(u64::from(MAX_INTERVAL)) as u8
}

/// A (day, interval) position on the key schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeIndex {
    /// Day index since the Unix epoch
    pub day: u32,
    /// Interval index within the day
    pub interval: u8,
}

impl TimeIndex {
    /// Schedule position of a Unix timestamp.
    pub fn from_epoch_secs(epoch_secs: u64) -> Self {
        Self { day: day_index(epoch_secs), interval: interval_index(epoch_secs) }
    }
}
