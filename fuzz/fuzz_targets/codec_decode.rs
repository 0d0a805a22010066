//! Fuzz target for base64 key decoding
//!
//! Feeds arbitrary text to every decoder that accepts untrusted input:
//! - `decode` and `decode_into` with a buffer sized by `decoded_size`
//! - Typed decoders for secrets, daily keys and identifiers
//!
//! Decoding should NEVER panic and never write past the reported length.

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxtrace_crypto::{
    codec, DailyKey, DeviceSecret, RollingIdentifier, DAILY_KEY_SIZE, IDENTIFIER_SIZE,
    SECRET_SIZE,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let decoded = codec::decode(text);

    let mut buffer = vec![0u8; codec::decoded_size(text.len())];
    match codec::decode_into(text, &mut buffer) {
        Ok(written) => {
            assert!(written < buffer.len(), "sized buffer must leave room");
            let Ok(ref owned) = decoded else {
                panic!("decode_into accepted text that decode rejected");
            };
            assert_eq!(&buffer[..written], owned.as_slice());

            let again = codec::decode(&codec::encode(owned));
            assert_eq!(again.ok().as_ref(), Some(owned), "re-encoded bytes must decode");
        },
        Err(_) => assert!(decoded.is_err(), "decode accepted text that decode_into rejected"),
    }

    if let Ok(secret) = DeviceSecret::from_base64(text) {
        assert_eq!(secret.as_bytes().len(), SECRET_SIZE);
    }
    if let Ok(key) = DailyKey::from_base64(text, 0) {
        assert_eq!(key.key().len(), DAILY_KEY_SIZE);
    }
    if let Ok(id) = RollingIdentifier::from_base64(text, 0) {
        assert_eq!(id.id().len(), IDENTIFIER_SIZE);
    }
});
