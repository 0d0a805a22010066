//! Daily key derivation using HKDF

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{codec, error::CryptoError, secret::DeviceSecret};

/// Daily key size in bytes
pub const DAILY_KEY_SIZE: usize = 16;

/// Base64 length of a daily key
pub const DAILY_KEY_SIZE_BASE64: usize = 24;

/// HKDF info prefix, NUL terminator included
const DAILY_KEY_LABEL: &[u8] = b"CT-DTK\0";

/// HKDF salt
const DAILY_KEY_SALT: [u8; 4] = [0u8; 4];

/// A 16-byte key bound to one day index.
///
/// Produced locally by [`DailyKey::derive`], or rebuilt from a disclosure with
/// [`DailyKey::from_bytes`]. In the latter case the day index is whatever the
/// reporting party claimed; it is not recomputed.
#[derive(Clone)]
pub struct DailyKey {
    key: [u8; DAILY_KEY_SIZE],
    day_index: u32,
}

impl DailyKey {
    /// Derive the daily key for `day_index` from the device secret.
    ///
    /// `HKDF-SHA256(salt = 0^4, ikm = secret, info = "CT-DTK\0" || day_le32, L = 16)`
    pub fn derive(secret: &DeviceSecret, day_index: u32) -> Result<Self, CryptoError> {
        let hkdf = Hkdf::<Sha256>::new(Some(&DAILY_KEY_SALT), secret.as_bytes());

        // Capacity: 7 (label) + 4 (day_index) = 11
        let mut info = [0u8; DAILY_KEY_LABEL.len() + 4];
        info[..DAILY_KEY_LABEL.len()].copy_from_slice(DAILY_KEY_LABEL);
        info[DAILY_KEY_LABEL.len()..].copy_from_slice(&day_index.to_le_bytes());

        let mut key = [0u8; DAILY_KEY_SIZE];
        hkdf.expand(&info, &mut key)
            .map_err(|e| CryptoError::Derivation { reason: e.to_string() })?;

        tracing::trace!(day_index, "derived daily key");

        Ok(Self { key, day_index })
    }

    /// Rebuild a daily key from disclosed bytes.
    pub fn from_bytes(key: [u8; DAILY_KEY_SIZE], day_index: u32) -> Self {
        Self { key, day_index }
    }

    /// Rebuild a daily key from its 24-character base64 form.
    pub fn from_base64(text: &str, day_index: u32) -> Result<Self, CryptoError> {
        codec::decode_exact::<DAILY_KEY_SIZE>(text, "daily key")
            .map(|key| Self::from_bytes(key, day_index))
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; DAILY_KEY_SIZE] {
        &self.key
    }

    /// Day index this key belongs to.
    pub fn day_index(&self) -> u32 {
        self.day_index
    }

    /// 24-character base64 form of the key bytes.
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        codec::encode_exact(&self.key, DAILY_KEY_SIZE_BASE64, "daily key")
    }
}

impl PartialEq for DailyKey {
    fn eq(&self, other: &Self) -> bool {
        self.day_index == other.day_index && bool::from(self.key.ct_eq(&other.key))
    }
}

impl Eq for DailyKey {}

impl fmt::Debug for DailyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyKey").field("day_index", &self.day_index).finish_non_exhaustive()
    }
}

impl Drop for DailyKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> DeviceSecret {
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        DeviceSecret::from_bytes(bytes)
    }

    #[test]
    fn derive_is_deterministic() {
        let secret = test_secret();

        let key1 = DailyKey::derive(&secret, 42).unwrap();
        let key2 = DailyKey::derive(&secret, 42).unwrap();

        assert_eq!(key1, key2, "same inputs must produce same output");
    }

    #[test]
    fn different_days_produce_different_keys() {
        let secret = test_secret();

        let day_0 = DailyKey::derive(&secret, 0).unwrap();
        let day_1 = DailyKey::derive(&secret, 1).unwrap();

        assert_ne!(day_0.key(), day_1.key(), "different days must produce different keys");
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let secret_a = DeviceSecret::from_bytes([0xAA; 32]);
        let secret_b = DeviceSecret::from_bytes([0xBB; 32]);

        let key_a = DailyKey::derive(&secret_a, 7).unwrap();
        let key_b = DailyKey::derive(&secret_b, 7).unwrap();

        assert_ne!(key_a.key(), key_b.key());
    }

    #[test]
    fn derive_records_day_index() {
        let key = DailyKey::derive(&test_secret(), u32::MAX).unwrap();
        assert_eq!(key.day_index(), u32::MAX);
    }

    #[test]
    fn known_vector() {
        let secret =
            DeviceSecret::from_base64("3UmKrtcQ2tfLE8UPSXHb4PtgRfE0E2xdSs+PGVIS8cc=").unwrap();
        let key = DailyKey::derive(&secret, 12).unwrap();
        assert_eq!(key.to_base64().unwrap(), "AzZ389DsGecAjZqby1sLNQ==");
    }

    #[test]
    fn equality_includes_day_index() {
        let a = DailyKey::from_bytes([1u8; DAILY_KEY_SIZE], 3);
        let b = DailyKey::from_bytes([1u8; DAILY_KEY_SIZE], 4);
        assert_ne!(a, b);
    }

    #[test]
    fn base64_roundtrip_keeps_day_index() {
        let key = DailyKey::derive(&test_secret(), 100).unwrap();
        let text = key.to_base64().unwrap();

        let restored = DailyKey::from_base64(&text, 100).unwrap();
        assert_eq!(restored, key);
    }

    #[test]
    fn debug_redacts_key() {
        let key = DailyKey::from_bytes([0xCD; DAILY_KEY_SIZE], 9);
        let printed = format!("{key:?}");
        assert!(printed.contains("day_index: 9"));
        assert!(!printed.contains("205"));
    }
}
