//! Rolling identifier derivation using HMAC
//!
//! # Security Properties
//!
//! - Unlinkability: identifiers from different intervals of the same day are
//!   unrelated without the daily key
//! - Determinism: the holder of a disclosed daily key can regenerate every
//!   identifier broadcast under it
//! - Comparison runs in constant time over the 16 identifier bytes

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{
    codec,
    daily_key::DailyKey,
    error::CryptoError,
    time::{INTERVALS_PER_DAY, MAX_INTERVAL},
};

type HmacSha256 = Hmac<Sha256>;

/// Rolling identifier size in bytes
pub const IDENTIFIER_SIZE: usize = 16;

/// Base64 length of a rolling identifier
pub const IDENTIFIER_SIZE_BASE64: usize = 24;

/// HMAC message prefix, NUL terminator included
const IDENTIFIER_LABEL: &[u8] = b"CT-RPI\0";

/// A 16-byte identifier broadcast during one ten-minute interval.
///
/// Equality compares the identifier bytes only. The interval index is
/// provenance: for a derived identifier it is the interval it was derived
/// for, for an observed one the interval it was captured in.
#[derive(Clone)]
pub struct RollingIdentifier {
    id: [u8; IDENTIFIER_SIZE],
    interval_index: u8,
}

impl RollingIdentifier {
    /// Derive the identifier for `interval_index` from a daily key.
    ///
    /// `Truncate16(HMAC-SHA256(daily_key, "CT-RPI\0" || interval_le16))`
    pub fn derive(daily_key: &DailyKey, interval_index: u8) -> Result<Self, CryptoError> {
        check_interval(interval_index)?;

        let mut mac = HmacSha256::new_from_slice(daily_key.key())
            .map_err(|e| CryptoError::Derivation { reason: e.to_string() })?;
        mac.update(IDENTIFIER_LABEL);
        mac.update(&u16::from(interval_index).to_le_bytes());
        let mut digest = mac.finalize().into_bytes();

        let mut id = [0u8; IDENTIFIER_SIZE];
        id.copy_from_slice(&digest[..IDENTIFIER_SIZE]);
        digest.as_mut_slice().zeroize();

        Ok(Self { id, interval_index })
    }

    /// Rebuild an identifier from captured bytes and the capture interval.
    pub fn from_bytes(id: [u8; IDENTIFIER_SIZE], interval_index: u8) -> Result<Self, CryptoError> {
        check_interval(interval_index)?;
        Ok(Self { id, interval_index })
    }

    /// Rebuild an identifier from its 24-character base64 form.
    pub fn from_base64(text: &str, interval_index: u8) -> Result<Self, CryptoError> {
        let id = codec::decode_exact::<IDENTIFIER_SIZE>(text, "rolling identifier")?;
        Self::from_bytes(id, interval_index)
    }

    /// Raw identifier bytes.
    pub fn id(&self) -> &[u8; IDENTIFIER_SIZE] {
        &self.id
    }

    /// Interval index this identifier belongs to.
    pub fn interval_index(&self) -> u8 {
        self.interval_index
    }

    /// 24-character base64 form of the identifier bytes.
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        codec::encode_exact(&self.id, IDENTIFIER_SIZE_BASE64, "rolling identifier")
    }
}

/// Derive all 144 identifiers of a day, in interval order.
pub fn derive_day_identifiers(
    daily_key: &DailyKey,
) -> Result<Vec<RollingIdentifier>, CryptoError> {
    (0..INTERVALS_PER_DAY).map(|interval| RollingIdentifier::derive(daily_key, interval)).collect()
}

fn check_interval(interval: u8) -> Result<(), CryptoError> {
    if interval > MAX_INTERVAL {
        return Err(CryptoError::IntervalOutOfRange { interval, max: MAX_INTERVAL });
    }
    Ok(())
}

impl PartialEq for RollingIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.id.ct_eq(&other.id).into()
    }
}

impl Eq for RollingIdentifier {}

impl fmt::Debug for RollingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingIdentifier")
            .field("interval_index", &self.interval_index)
            .finish_non_exhaustive()
    }
}

impl Drop for RollingIdentifier {
    fn drop(&mut self) {
        self.id.zeroize();
    }
}
