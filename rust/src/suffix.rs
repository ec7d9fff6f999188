//! Random suffix generation with process-local duplicate avoidance.

use std::collections::{HashMap, HashSet};

use crate::alphabet::{ALPHABET, LAST_DIGIT_INDEX};
use crate::error::{MinidError, Result};

/// Retries allowed after the first draw, shared by duplicate and all-digit
/// rejections.
pub const MAX_RETRIES: usize = 100;

/// A source of uniformly distributed indices.
///
/// Swap in a scripted source to make suffix generation deterministic.
pub trait RandSource {
    /// Returns a value in `0..upper`.
    fn rand_below(&mut self, upper: usize) -> usize;
}

/// A `RandSource` backed by the thread-local RNG.
///
/// Holds no state, so it is free to clone and to move across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand_below(&mut self, upper: usize) -> usize {
        rand::random_range(0..upper)
    }
}

/// Generates fixed-length random suffixes.
///
/// Every suffix drawn is remembered per length for the lifetime of the
/// generator, and a returned suffix is never purely decimal digits. Drawn
/// all-digit candidates stay registered even though they are never returned.
#[derive(Debug, Default)]
pub struct SuffixGenerator<R = ThreadRandom> {
    rng: R,
    seen: HashMap<usize, HashSet<String>>,
}

impl SuffixGenerator<ThreadRandom> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RandSource> SuffixGenerator<R> {
    /// Create a generator drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            seen: HashMap::new(),
        }
    }

    /// Draw a new suffix of `length` symbols.
    pub fn generate(&mut self, length: usize) -> Result<String> {
        for attempt in 0..=MAX_RETRIES {
            let (candidate, has_letter) = self.draw(length);

            let seen = self.seen.entry(length).or_default();
            if seen.contains(&candidate) {
                tracing::debug!(attempt, length, "duplicate suffix, retrying");
                continue;
            }
            seen.insert(candidate.clone());

            if !has_letter {
                tracing::debug!(attempt, length, "all-digit suffix, retrying");
                continue;
            }

            return Ok(candidate);
        }

        tracing::warn!(length, attempts = MAX_RETRIES + 1, "suffix retries exhausted");
        Err(MinidError::RetryExhausted {
            length,
            attempts: MAX_RETRIES + 1,
        })
    }

    /// Number of suffixes of `length` registered so far.
    pub fn seen_count(&self, length: usize) -> usize {
        self.seen.get(&length).map_or(0, HashSet::len)
    }

    /// Whether `suffix` has already been registered.
    pub fn is_seen(&self, suffix: &str) -> bool {
        self.seen
            .get(&suffix.len())
            .is_some_and(|set| set.contains(suffix))
    }

    fn draw(&mut self, length: usize) -> (String, bool) {
        let mut has_letter = false;
        let candidate = (0..length)
            .map(|_| {
                let idx = self.rng.rand_below(ALPHABET.len()) % ALPHABET.len();
                if idx > LAST_DIGIT_INDEX as usize {
                    has_letter = true;
                }
                char::from(ALPHABET[idx])
            })
            .collect();
        (candidate, has_letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::has_letter;

    /// Replays a fixed index sequence, cycling when it runs out.
    struct ScriptedRand {
        script: Vec<usize>,
        pos: usize,
    }

    impl ScriptedRand {
        fn new(script: &[usize]) -> Self {
            Self {
                script: script.to_vec(),
                pos: 0,
            }
        }
    }

    impl RandSource for ScriptedRand {
        fn rand_below(&mut self, _upper: usize) -> usize {
            let v = self.script[self.pos % self.script.len()];
            self.pos += 1;
            v
        }
    }

    #[test]
    fn test_suffixes_unique_and_not_numeric() {
        let mut generator = SuffixGenerator::new();
        let mut returned = HashSet::new();
        for _ in 0..1_000 {
            let s = generator.generate(4).unwrap();
            assert_eq!(s.len(), 4);
            assert!(has_letter(&s));
            assert!(returned.insert(s));
        }
        assert!(generator.seen_count(4) >= 1_000);
    }

    #[test]
    fn test_all_digit_candidate_is_registered_but_not_returned() {
        let rng = ScriptedRand::new(&[0, 0, 0, 0, 9, 9, 9, 9]);
        let mut generator = SuffixGenerator::with_rng(rng);
        assert_eq!(generator.generate(4).unwrap(), "AAAA");
        assert!(generator.is_seen("1111"));
        assert!(generator.is_seen("AAAA"));
        assert_eq!(generator.seen_count(4), 2);
    }

    #[test]
    fn test_duplicate_exhausts_retries() {
        let mut generator = SuffixGenerator::with_rng(ScriptedRand::new(&[9]));
        assert_eq!(generator.generate(2).unwrap(), "AA");
        assert_eq!(
            generator.generate(2),
            Err(MinidError::RetryExhausted {
                length: 2,
                attempts: MAX_RETRIES + 1
            })
        );
        // other lengths are tracked separately
        assert_eq!(generator.generate(3).unwrap(), "AAA");
    }

    #[test]
    fn test_numeric_only_source_exhausts_retries() {
        let rng = ScriptedRand::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let mut generator = SuffixGenerator::with_rng(rng);
        assert!(matches!(
            generator.generate(3),
            Err(MinidError::RetryExhausted { length: 3, .. })
        ));
        assert!(generator.seen_count(3) > 0);
    }

    #[test]
    fn test_zero_length_never_succeeds() {
        let mut generator = SuffixGenerator::new();
        assert!(matches!(
            generator.generate(0),
            Err(MinidError::RetryExhausted { length: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_range_source_is_wrapped() {
        let mut generator = SuffixGenerator::with_rng(ScriptedRand::new(&[61 + 9]));
        assert_eq!(generator.generate(1).unwrap(), "A");
    }
}
