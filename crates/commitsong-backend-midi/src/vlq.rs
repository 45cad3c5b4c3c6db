//! Variable-length quantities for event delta times.
//!
//! A quantity is split into 7-bit groups, most significant first. Every group
//! but the last carries a continuation bit (0x80). Standard MIDI caps a
//! quantity at four bytes, i.e. values up to [`MAX_VLQ`].
//!
//! Two decoders are provided:
//! - [`decode`] is total: it stops after the fourth byte even if the
//!   continuation bit is still set, and returns whatever it accumulated.
//! - [`decode_strict`] reports truncated and oversized input as errors.

use thiserror::Error;

/// Largest value representable in four VLQ bytes (2^28 - 1).
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Maximum encoded length in bytes.
pub const MAX_VLQ_BYTES: usize = 4;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u32 = 0x7F;

/// Errors from [`decode_strict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VlqError {
    /// Input ended before a byte with a clear continuation bit.
    #[error("variable-length quantity ends after {consumed} bytes without a terminating byte")]
    UnexpectedEnd { consumed: usize },

    /// The fourth byte still had its continuation bit set.
    #[error("variable-length quantity longer than {} bytes", MAX_VLQ_BYTES)]
    Overflow,
}

/// Encode `value` as a variable-length quantity.
///
/// Values above [`MAX_VLQ`] saturate to [`MAX_VLQ`], so the result is always
/// between one and four bytes long.
pub fn encode(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VLQ_BYTES);
    encode_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: u32, out: &mut Vec<u8>) {
    let value = value.min(MAX_VLQ);

    // Groups above the lowest, most significant first, skipping leading zeros.
    for shift in [21u32, 14, 7] {
        if value >> shift != 0 {
            out.push(((value >> shift) & GROUP_MASK) as u8 | CONTINUATION);
        }
    }
    out.push((value & GROUP_MASK) as u8);
}

/// Number of bytes [`encode`] produces for `value`.
pub fn encoded_len(value: u32) -> usize {
    match value.min(MAX_VLQ) {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

/// Decode a quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Reading stops at the
/// first byte with a clear continuation bit or after four bytes, whichever
/// comes first. Empty input yields `(0, 0)`.
pub fn decode(bytes: &[u8]) -> (u32, usize) {
    let mut value = 0u32;
    let mut consumed = 0usize;

    for &byte in bytes.iter().take(MAX_VLQ_BYTES) {
        consumed += 1;
        value = (value << 7) | (byte as u32 & GROUP_MASK);
        if byte & CONTINUATION == 0 {
            break;
        }
    }

    (value, consumed)
}

/// Decode a quantity, rejecting truncated or oversized input.
pub fn decode_strict(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let (value, consumed) = decode(bytes);

    match bytes.get(consumed.wrapping_sub(1)) {
        Some(last) if last & CONTINUATION == 0 => Ok((value, consumed)),
        Some(_) if consumed == MAX_VLQ_BYTES => Err(VlqError::Overflow),
        _ => Err(VlqError::UnexpectedEnd { consumed }),
    }
}
