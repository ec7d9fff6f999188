//! Dense binary form of a minid: 6 bits per symbol, most significant first.
//!
//! `n` symbols pack into `ceil(n * 6 / 8)` bytes. Byte counts divisible by 3
//! are ambiguous between `4k` symbols (no slack) and `4k - 1` symbols (6 bits
//! of slack). The slack case fills the spare bits with ones; since no symbol
//! index reaches `0x3F`, a final byte whose low 6 bits are all set can only be
//! padding.

use crate::alphabet::{index_of, symbol};
use crate::error::{MinidError, Result};

const BITS_PER_SYMBOL: usize = 6;
const SYMBOL_MASK: u32 = 0x3F;
const PAD_SENTINEL: u8 = 0x3F;

/// Packed byte length for `symbols` symbols.
#[inline]
pub const fn packed_len(symbols: usize) -> usize {
    (symbols * BITS_PER_SYMBOL).div_ceil(8)
}

/// Pack `s` into its binary form.
///
/// Characters outside the alphabet are packed as the pad symbol, one symbol
/// per character.
pub fn pack(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed_len(s.chars().count()));
    let mut acc = 0_u32;
    let mut bits = 0;

    for c in s.chars() {
        let idx = u8::try_from(c).ok().and_then(index_of).unwrap_or(0);
        acc = (acc << BITS_PER_SYMBOL) | u32::from(idx);
        bits += BITS_PER_SYMBOL;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }

    if bits > 0 {
        let mut last = (acc << (8 - bits)) as u8;
        if (out.len() + 1) % 3 == 0 {
            last |= (1_u8 << (8 - bits)) - 1;
        }
        out.push(last);
    }

    out
}

/// Unpack bytes produced by [`pack`].
///
/// Fails with [`MinidError::InvalidSymbol`] if a 6-bit group has no
/// alphabet mapping.
pub fn unpack(bytes: &[u8]) -> Result<String> {
    let mut symbols = bytes.len() * 8 / BITS_PER_SYMBOL;
    let last = bytes.last().copied().unwrap_or(0);
    if bytes.len() % 3 == 0 && last & PAD_SENTINEL == PAD_SENTINEL {
        symbols -= 1;
    }

    let mut out = String::with_capacity(symbols);
    let mut acc = 0_u32;
    let mut bits = 0;

    for &byte in bytes {
        if out.len() == symbols {
            break;
        }
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= BITS_PER_SYMBOL && out.len() < symbols {
            bits -= BITS_PER_SYMBOL;
            let idx = ((acc >> bits) & SYMBOL_MASK) as u8;
            let sym = symbol(idx as usize).ok_or(MinidError::InvalidSymbol { index: idx })?;
            out.push(char::from(sym));
        }
        acc &= (1 << bits) - 1;
    }

    Ok(out)
}

/// Unpack bytes that must hold exactly `symbols` symbols.
///
/// Fails with [`MinidError::InvalidLength`] before decoding when the byte
/// count does not match, and after decoding when the padding marker implies a
/// different symbol count.
pub fn unpack_exact(bytes: &[u8], symbols: usize) -> Result<String> {
    let expected = packed_len(symbols);
    if bytes.len() != expected {
        return Err(MinidError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }
    let s = unpack(bytes)?;
    if s.len() != symbols {
        return Err(MinidError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(s)
}
