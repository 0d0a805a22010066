//! Device secret: root of the key chain

use std::fmt;

use zeroize::Zeroize;

use crate::{codec, error::CryptoError};

/// Device secret size in bytes
pub const SECRET_SIZE: usize = 32;

/// Base64 length of a device secret
pub const SECRET_SIZE_BASE64: usize = 44;

/// The 32-byte per-device root key.
///
/// Every daily key is derived from this value, so it never leaves the device
/// except as an explicit base64 export for backup. Zeroized on drop.
pub struct DeviceSecret {
    bytes: [u8; SECRET_SIZE],
}

impl DeviceSecret {
    /// Wrap raw secret bytes.
    pub fn from_bytes(bytes: [u8; SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Restore a secret from its 44-character base64 form.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        codec::decode_exact::<SECRET_SIZE>(text, "device secret").map(Self::from_bytes)
    }

    /// Raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_SIZE] {
        &self.bytes
    }

    /// 44-character base64 export.
    pub fn to_base64(&self) -> Result<String, CryptoError> {
        codec::encode_exact(&self.bytes, SECRET_SIZE_BASE64, "device secret")
    }
}

impl fmt::Debug for DeviceSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSecret").finish_non_exhaustive()
    }
}

impl Drop for DeviceSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
