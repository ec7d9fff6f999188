//! Fixed-width base-61 codec between `u64` values and minid strings.

use crate::alphabet::{ALPHABET, BASE, PAD, index_of};
use crate::error::{MinidError, Result};

/// Longest string that can still encode a 64-bit value: `ceil(log_61(2^64))`.
pub const MAX_DECODE_LEN: usize = {
    let limit = 1_u128 << 64;
    let mut pow = 1_u128;
    let mut n = 0;
    while pow < limit {
        pow *= BASE as u128;
        n += 1;
    }
    n
};

/// Encode `value` as exactly `width` symbols, big-endian, left-padded with
/// the pad symbol.
///
/// Fails with [`MinidError::RangeExceeded`] when `value > max_value` or when
/// the value needs more than `width` symbols.
pub fn encode_diff(value: u64, max_value: u64, width: usize) -> Result<String> {
    let range_exceeded = MinidError::RangeExceeded {
        value,
        max: max_value,
        width,
    };
    if value > max_value {
        return Err(range_exceeded);
    }

    // little-endian first, reversed below
    let mut digits = Vec::with_capacity(width.max(MAX_DECODE_LEN));
    let mut rest = value;
    while rest > 0 {
        digits.push(ALPHABET[(rest % BASE) as usize]);
        rest /= BASE;
    }
    if digits.len() > width {
        return Err(range_exceeded);
    }
    digits.resize(width, PAD);
    digits.reverse();

    // every byte comes from ALPHABET, which is ASCII
    Ok(digits.into_iter().map(char::from).collect())
}

/// Decode a minid string back into its numeric value.
///
/// Characters outside the alphabet count as the pad symbol. Strings longer than
/// [`MAX_DECODE_LEN`] fail with [`MinidError::InputTooLong`]; strings whose
/// value does not fit in 64 bits fail with [`MinidError::NumericOverflow`].
pub fn decode_diff(s: &str) -> Result<u64> {
    let len = s.chars().count();
    if len > MAX_DECODE_LEN {
        return Err(MinidError::InputTooLong {
            len,
            max: MAX_DECODE_LEN,
        });
    }

    let mut acc = 0_u64;
    for c in s.chars() {
        let idx = u64::from(u8::try_from(c).ok().and_then(index_of).unwrap_or(0));
        if acc > (u64::MAX - idx) / BASE {
            return Err(MinidError::NumericOverflow(s.to_string()));
        }
        acc = acc * BASE + idx;
    }
    Ok(acc)
}
