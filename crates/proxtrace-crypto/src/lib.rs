//! Proxtrace Cryptographic Primitives
//!
//! The key chain of the proximity tracing protocol and the fixed-size codecs
//! that bind it to its text form. Pure functions with deterministic outputs;
//! randomness for the device secret is supplied by the caller.
//!
//! # Key Lifecycle
//!
//! ```text
//! Device Secret (32 bytes, CSPRNG)
//!        │
//!        ▼ HKDF-SHA256, info = "CT-DTK\0" || day
//! Daily Key (16 bytes, one per day)
//!        │
//!        ▼ HMAC-SHA256 truncated, msg = "CT-RPI\0" || interval
//! Rolling Identifier (16 bytes, one per 10-minute interval)
//! ```
//!
//! A device broadcasts its rolling identifiers and keeps its daily keys. When
//! it reports an exposure it discloses daily keys; anyone holding a disclosed
//! key can regenerate all 144 identifiers of that day and compare them with
//! what they observed.
//!
//! # Security
//!
//! - The device secret never leaves the device, only daily keys are disclosed
//! - A disclosed daily key reveals nothing about other days
//! - All key material is zeroized on drop and redacted from `Debug` output
//! - Identifier comparison is constant-time

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod daily_key;
pub mod error;
pub mod identifier;
pub mod secret;
pub mod time;

pub use daily_key::{DAILY_KEY_SIZE, DAILY_KEY_SIZE_BASE64, DailyKey};
pub use error::CryptoError;
pub use identifier::{
    IDENTIFIER_SIZE, IDENTIFIER_SIZE_BASE64, RollingIdentifier, derive_day_identifiers,
};
pub use secret::{DeviceSecret, SECRET_SIZE, SECRET_SIZE_BASE64};
pub use time::{INTERVALS_PER_DAY, MAX_INTERVAL, TimeIndex, day_index, interval_index};
