//! Base64 text form of keys and identifiers
//!
//! Standard RFC 4648 alphabet with `=` padding. Size calculators return
//! upper bounds that include one terminator slot, so a buffer sized with
//! [`encoded_size`] always holds the text form of `n` bytes.
//!
//! The `_into` variants never truncate: an undersized output buffer is
//! reported as [`CryptoError::BufferTooSmall`] and nothing is written.

use base64::{DecodeSliceError, Engine, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Upper bound on the base64 length of `binary_len` bytes, plus a terminator
/// slot.
pub const fn encoded_size(binary_len: usize) -> usize {
    binary_len.div_ceil(3) * 4 + 1
}

/// Upper bound on the decoded length of `base64_len` characters, plus a
/// terminator slot.
pub const fn decoded_size(base64_len: usize) -> usize {
    base64_len.div_ceil(4) * 3 + 1
}

/// Encode bytes as padded base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode padded base64 into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::Format { what: "base64", reason: e.to_string() })
}

/// Encode `bytes` into `output`, returning the number of characters written.
///
/// `output` must hold at least `encoded_size(bytes.len()) - 1` bytes.
pub fn encode_into(bytes: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
    let needed = encoded_size(bytes.len()) - 1;
    if output.len() < needed {
        return Err(CryptoError::BufferTooSmall { needed, capacity: output.len() });
    }

    STANDARD
        .encode_slice(bytes, output)
        .map_err(|_| CryptoError::BufferTooSmall { needed, capacity: output.len() })
}

/// Decode `text` into `output`, returning the number of bytes written.
///
/// `output` must hold at least `decoded_size(text.len()) - 1` bytes.
pub fn decode_into(text: &str, output: &mut [u8]) -> Result<usize, CryptoError> {
    let needed = decoded_size(text.len()) - 1;
    if output.len() < needed {
        return Err(CryptoError::BufferTooSmall { needed, capacity: output.len() });
    }

    STANDARD.decode_slice(text, output).map_err(|e| match e {
        DecodeSliceError::DecodeError(e) => {
            CryptoError::Format { what: "base64", reason: e.to_string() }
        },
        DecodeSliceError::OutputSliceTooSmall => {
            CryptoError::BufferTooSmall { needed, capacity: output.len() }
        },
    })
}

/// Decode base64 that must yield exactly `N` bytes.
///
/// The intermediate buffer is zeroized, so this is safe to use on secrets.
pub fn decode_exact<const N: usize>(
    text: &str,
    what: &'static str,
) -> Result<[u8; N], CryptoError> {
    let expected_text_len = encoded_size(N) - 1;
    if text.len() != expected_text_len {
        return Err(CryptoError::InvalidLength {
            what,
            expected: expected_text_len,
            actual: text.len(),
        });
    }

    let mut buffer = Zeroizing::new(vec![0u8; decoded_size(text.len())]);
    let written = decode_into(text, &mut buffer).map_err(|e| match e {
        CryptoError::Format { reason, .. } => CryptoError::Format { what, reason },
        other => other,
    })?;
    if written != N {
        return Err(CryptoError::InvalidLength { what, expected: N, actual: written });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&buffer[..N]);
    Ok(out)
}

/// Encode fixed-size key material and check the text length.
///
/// The text length of a fixed-size key is a protocol constant; any deviation
/// means the encoder misbehaved and the result must not be used.
pub fn encode_exact(
    bytes: &[u8],
    expected_len: usize,
    what: &'static str,
) -> Result<String, CryptoError> {
    let mut buffer = vec![0u8; encoded_size(bytes.len())];
    let written = encode_into(bytes, &mut buffer)?;
    if written != expected_len {
        return Err(CryptoError::InvalidLength { what, expected: expected_len, actual: written });
    }
    buffer.truncate(written);

    String::from_utf8(buffer).map_err(|e| CryptoError::Format { what, reason: e.to_string() })
}
