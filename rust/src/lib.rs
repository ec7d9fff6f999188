//! minid: compact, lexicographically sortable identifiers.
//!
//! A minid is an optional base-61 timestamp prefix followed by a random
//! suffix. The alphabet is ordered so that comparing two ids as strings
//! compares their timestamps first.
//!
//! # Format
//!
//! ```text
//! MINID ::= [ PREFIX ] SUFFIX
//! PREFIX ::= 6 | 8 | 9 | 11 symbols   (s | ms | us | ns since 2025-01-01T00:00:00Z)
//! SUFFIX ::= N symbols, at least one of them a letter
//! ```
//!
//! # Example
//!
//! ```
//! use minid::{MinidGen, Mode};
//!
//! let mut minid_gen = MinidGen::new(Mode::Milliseconds, 3).expect("valid generator params");
//! let id = minid_gen.next_minid().expect("clock after epoch");
//! println!("{}", id); // e.g., "3Rk1v9QaB7x"
//! assert_eq!(minid::Minid::from_bytes(&id.to_bytes()).unwrap(), id);
//! ```

mod alphabet;
mod async_api;
mod codec;
mod error;
mod lock;
mod minid;
mod packed;
mod suffix;
mod time;

pub use alphabet::{ALPHABET, BASE, PAD};
pub use async_api::{async_minid_stream, async_next_minid};
pub use codec::{MAX_DECODE_LEN, decode_diff, encode_diff};
pub use error::{MinidError, Result};
pub use lock::LockMinidGen;
pub use minid::{
    DEFAULT_SUFFIX_LEN, Minid, MinidGen, Minids, Mode, ParsedMinid, generate, parse_minid,
    validate_minid,
};
pub use packed::{pack, packed_len, unpack, unpack_exact};
pub use suffix::{MAX_RETRIES, RandSource, SuffixGenerator, ThreadRandom};
pub use time::{EPOCH, EPOCH_UNIX_SECS, Resolution, SystemClock, TimeSource};
