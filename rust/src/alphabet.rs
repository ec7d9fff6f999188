//! The 61-symbol minid alphabet.
//!
//! Symbols are in ascending ASCII order, so comparing two equal-length
//! encodings byte by byte is the same as comparing the numbers they encode.
//! `0` is left out to keep it from being mistaken for the pad symbol `1`.

/// Ordered symbol table. Index 0 doubles as the pad/zero symbol.
pub const ALPHABET: &[u8; 61] = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Radix of the numeric codec.
pub const BASE: u64 = ALPHABET.len() as u64;

/// Pad symbol, also the encoding of digit zero.
pub const PAD: u8 = ALPHABET[0];

/// Alphabet index of `'9'`; anything above it is a letter.
pub const LAST_DIGIT_INDEX: u8 = 8;

const NO_VALUE: u8 = 255;

/// Reverse lookup from ASCII byte to alphabet index.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Alphabet index of `byte`, or `None` if it is not a minid symbol.
#[inline]
pub fn index_of(byte: u8) -> Option<u8> {
    match LOOKUP[byte as usize] {
        NO_VALUE => None,
        idx => Some(idx),
    }
}

/// Symbol at `index`, or `None` past the end of the table.
#[inline]
pub fn symbol(index: usize) -> Option<u8> {
    ALPHABET.get(index).copied()
}

/// True when every byte of `s` belongs to the alphabet.
pub fn is_valid(s: &str) -> bool {
    s.bytes().all(|b| index_of(b).is_some())
}

/// True when `s` holds at least one symbol past `'9'`.
pub fn has_letter(s: &str) -> bool {
    s.bytes().any(|b| index_of(b).is_some_and(|i| i > LAST_DIGIT_INDEX))
}
