//! Minid generation, parsing and validation.
//!
//! Format: `[PREFIX]SUFFIX`, where `PREFIX` is the base-61 time since the
//! epoch at the mode's resolution and `SUFFIX` is random.
//!
//! The generator implements `Iterator<Item = Result<Minid>>`.
//! Use `next_minid()` for the explicit domain API.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::alphabet;
use crate::codec::{decode_diff, encode_diff};
use crate::error::{MinidError, Result};
use crate::packed::{pack, unpack};
use crate::suffix::{RandSource, SuffixGenerator, ThreadRandom};
use crate::time::{Resolution, SystemClock, TimeSource};

/// Suffix length used when none is given.
pub const DEFAULT_SUFFIX_LEN: usize = 4;

/// Which prefix, if any, a minid carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Random,
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl Mode {
    pub const ALL: [Self; 5] = [
        Self::Random,
        Self::Seconds,
        Self::Milliseconds,
        Self::Microseconds,
        Self::Nanoseconds,
    ];

    pub fn as_str(self) -> &'static str {
        match self.resolution() {
            Some(res) => res.as_str(),
            None => "r",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "r" => Some(Self::Random),
            _ => Resolution::parse(s).map(Self::from),
        }
    }

    /// Timestamp resolution of the prefix; `None` in pure random mode.
    pub fn resolution(self) -> Option<Resolution> {
        match self {
            Self::Random => None,
            Self::Seconds => Some(Resolution::Seconds),
            Self::Milliseconds => Some(Resolution::Milliseconds),
            Self::Microseconds => Some(Resolution::Microseconds),
            Self::Nanoseconds => Some(Resolution::Nanoseconds),
        }
    }

    pub fn prefix_width(self) -> usize {
        self.resolution().map_or(0, Resolution::width)
    }

    /// Suffix length the CLI picks when not overridden.
    ///
    /// Timestamped ids already vary with time, so they get a shorter suffix.
    pub fn default_suffix_len(self) -> usize {
        match self {
            Self::Random => DEFAULT_SUFFIX_LEN,
            _ => 3,
        }
    }
}

impl From<Resolution> for Mode {
    fn from(res: Resolution) -> Self {
        match res {
            Resolution::Seconds => Self::Seconds,
            Resolution::Milliseconds => Self::Milliseconds,
            Resolution::Microseconds => Self::Microseconds,
            Resolution::Nanoseconds => Self::Nanoseconds,
        }
    }
}

impl FromStr for Mode {
    type Err = MinidError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| MinidError::InvalidMode(s.to_string()))
    }
}

/// A single minid. Orders by its raw string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Minid(String);

impl Minid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Packed binary form, 6 bits per symbol.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack(&self.0)
    }

    /// Rebuild a minid from its packed binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        unpack(bytes).map(Self)
    }
}

impl fmt::Display for Minid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Minid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Minid {
    type Error = MinidError;

    fn try_from(s: String) -> Result<Self> {
        if alphabet::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(MinidError::InvalidFormat(s))
        }
    }
}

impl FromStr for Minid {
    type Err = MinidError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s.to_string())
    }
}

impl From<Minid> for String {
    fn from(id: Minid) -> Self {
        id.0
    }
}

/// An ordered batch of minids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Minids(Vec<Minid>);

impl Minids {
    /// Sort lexicographically, which is also creation order for timestamped ids.
    pub fn sort(&mut self) {
        self.0.sort();
    }

    pub fn string_slice(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn into_inner(self) -> Vec<Minid> {
        self.0
    }
}

impl Deref for Minids {
    type Target = [Minid];

    fn deref(&self) -> &[Minid] {
        &self.0
    }
}

impl FromIterator<Minid> for Minids {
    fn from_iter<I: IntoIterator<Item = Minid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Minids {
    type Item = Minid;
    type IntoIter = std::vec::IntoIter<Minid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Parsed minid components.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMinid {
    pub raw: String,
    pub mode: Mode,
    pub diff: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub suffix: String,
}

static MINID_PATTERN_R4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^()([1-9A-Za-z]{4})$").expect("static minid pattern"));

fn build_pattern(prefix_width: usize, suffix_len: usize) -> Result<Regex> {
    let pattern = format!(
        r"^([1-9A-Za-z]{{{}}})([1-9A-Za-z]{{{}}})$",
        prefix_width, suffix_len
    );
    Regex::new(&pattern).map_err(|e| MinidError::InvalidFormat(e.to_string()))
}

/// Parse a minid generated in `mode` with a `suffix_len`-symbol suffix.
///
/// A suffix made only of `'1'..='9'` is rejected with
/// [`MinidError::InvalidFormat`], since the generator never emits one.
pub fn parse_minid(id: &str, mode: Mode, suffix_len: usize) -> Result<ParsedMinid> {
    if suffix_len == 0 {
        return Err(MinidError::InvalidSuffixLength);
    }

    let built;
    let pattern = if mode == Mode::Random && suffix_len == DEFAULT_SUFFIX_LEN {
        &*MINID_PATTERN_R4
    } else {
        built = build_pattern(mode.prefix_width(), suffix_len)?;
        &built
    };

    let caps = pattern
        .captures(id)
        .ok_or_else(|| MinidError::InvalidFormat(id.to_string()))?;
    let prefix = &caps[1];
    let suffix = caps[2].to_string();
    if !alphabet::has_letter(&suffix) {
        return Err(MinidError::InvalidFormat(id.to_string()));
    }

    let (diff, timestamp) = match mode.resolution() {
        Some(res) => {
            let diff = decode_diff(prefix)?;
            (Some(diff), Some(res.instant_at(diff)?))
        }
        None => (None, None),
    };

    Ok(ParsedMinid {
        raw: id.to_string(),
        mode,
        diff,
        timestamp,
        suffix,
    })
}

/// Validate a minid string for a mode and suffix length.
///
/// Same rules as [`parse_minid`], including the letter in the suffix.
pub fn validate_minid(id: &str, mode: Mode, suffix_len: usize) -> bool {
    parse_minid(id, mode, suffix_len).is_ok()
}

/// Minid generator owning its clock, randomness and duplicate registry.
pub struct MinidGen<C = SystemClock, R = ThreadRandom> {
    mode: Mode,
    suffix_len: usize,
    clock: C,
    suffixes: SuffixGenerator<R>,
}

impl MinidGen {
    /// Create a generator backed by the system clock and thread RNG.
    pub fn new(mode: Mode, suffix_len: usize) -> Result<Self> {
        Self::with_sources(mode, suffix_len, SystemClock, ThreadRandom)
    }

    /// Create a generator with default parameters (random mode, 4 symbols).
    pub fn default_params() -> Self {
        Self {
            mode: Mode::Random,
            suffix_len: DEFAULT_SUFFIX_LEN,
            clock: SystemClock,
            suffixes: SuffixGenerator::new(),
        }
    }
}

impl<C: TimeSource, R: RandSource> MinidGen<C, R> {
    /// Create a generator with injected clock and randomness.
    pub fn with_sources(mode: Mode, suffix_len: usize, clock: C, rng: R) -> Result<Self> {
        if suffix_len == 0 {
            return Err(MinidError::InvalidSuffixLength);
        }

        Ok(Self {
            mode,
            suffix_len,
            clock,
            suffixes: SuffixGenerator::with_rng(rng),
        })
    }

    /// Generate the next minid (domain API).
    pub fn next_minid(&mut self) -> Result<Minid> {
        let mut id = String::with_capacity(self.mode.prefix_width() + self.suffix_len);

        if let Some(res) = self.mode.resolution() {
            let diff = res.current_diff(&self.clock)?;
            let prefix = encode_diff(diff, res.max_diff(), res.width()).inspect_err(|err| {
                tracing::error!(%err, resolution = res.as_str(), "cannot encode time prefix");
            })?;
            id.push_str(&prefix);
        }

        id.push_str(&self.suffixes.generate(self.suffix_len)?);
        Ok(Minid(id))
    }

    /// Generate `n` minids, stopping at the first failure.
    pub fn next_n(&mut self, n: usize) -> Result<Minids> {
        self.take(n).collect()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }
}

impl<C: TimeSource, R: RandSource> Iterator for MinidGen<C, R> {
    type Item = Result<Minid>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_minid())
    }
}

/// Generate `count` minids with a fresh default generator.
pub fn generate(mode: Mode, count: usize, suffix_len: usize) -> Result<Minids> {
    MinidGen::new(mode, suffix_len)?.next_n(count)
}
