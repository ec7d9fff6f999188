//! Error taxonomy shared by every minid operation.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = MinidError> = core::result::Result<T, E>;

/// Errors that can occur during minid operations.
///
/// `ClockBeforeEpoch`, `RangeExceeded` and `RetryExhausted` point at a broken
/// environment or configuration and should be treated as terminal by callers.
/// The decoding variants are raised on foreign input and are safe to recover
/// from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinidError {
    #[error("System clock is before the minid epoch")]
    ClockBeforeEpoch,
    #[error("Value {value} exceeds the maximum {max} encodable in {width} symbols")]
    RangeExceeded { value: u64, max: u64, width: usize },
    #[error("Input of {len} symbols exceeds the maximum of {max} for a 64-bit value")]
    InputTooLong { len: usize, max: usize },
    #[error("Input {0:?} overflows a 64-bit value")]
    NumericOverflow(String),
    #[error("Could not produce a unique suffix of length {length} after {attempts} attempts")]
    RetryExhausted { length: usize, attempts: usize },
    #[error("Invalid symbol index {index} in packed data")]
    InvalidSymbol { index: u8 },
    #[error("Invalid packed length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Invalid suffix length: must be > 0")]
    InvalidSuffixLength,
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    #[error("Invalid minid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid timestamp in minid")]
    InvalidTimestamp,
    #[error("Generator lock poisoned")]
    LockPoisoned,
}

impl<T> From<std::sync::PoisonError<T>> for MinidError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_context() {
        let err = MinidError::RangeExceeded {
            value: 10,
            max: 5,
            width: 6,
        };
        assert_eq!(
            err.to_string(),
            "Value 10 exceeds the maximum 5 encodable in 6 symbols"
        );
        assert_eq!(
            MinidError::InvalidLength {
                expected: 3,
                actual: 4
            }
            .to_string(),
            "Invalid packed length: expected 3 bytes, got 4"
        );
    }
}
