//! Time resolutions and the clock seam used for minid prefixes.

use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;

use crate::error::{MinidError, Result};

/// Minid epoch as Unix seconds: Wednesday, January 1, 2025 00:00:00 UTC.
pub const EPOCH_UNIX_SECS: i64 = 1_735_689_600;

/// Minid epoch as a calendar instant.
pub static EPOCH: Lazy<DateTime<Utc>> =
    Lazy::new(|| DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(EPOCH_UNIX_SECS));

/// A source of wall-clock time.
///
/// Plug in a fixed or scripted source in tests.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use minid::{EPOCH, Resolution, TimeSource};
///
/// struct AtEpoch;
/// impl TimeSource for AtEpoch {
///     fn now(&self) -> DateTime<Utc> {
///         *EPOCH
///     }
/// }
///
/// assert_eq!(Resolution::Seconds.current_diff(&AtEpoch).unwrap(), 0);
/// ```
pub trait TimeSource {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Timestamp precision of a minid prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl Resolution {
    pub const ALL: [Self; 4] = [
        Self::Seconds,
        Self::Milliseconds,
        Self::Microseconds,
        Self::Nanoseconds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
            Self::Nanoseconds => "ns",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "s" => Some(Self::Seconds),
            "ms" => Some(Self::Milliseconds),
            "us" => Some(Self::Microseconds),
            "ns" => Some(Self::Nanoseconds),
            _ => None,
        }
    }

    /// Number of symbols in the encoded prefix.
    pub fn width(self) -> usize {
        match self {
            Self::Seconds => 6,
            Self::Milliseconds => 8,
            Self::Microseconds => 9,
            Self::Nanoseconds => 11,
        }
    }

    /// Largest diff accepted for this resolution.
    pub fn max_diff(self) -> u64 {
        match self {
            Self::Seconds => 61_u64.pow(6) - 1,
            Self::Milliseconds => 61_u64.pow(8),
            Self::Microseconds => 61_u64.pow(9),
            Self::Nanoseconds => u64::MAX,
        }
    }

    /// Units of this resolution elapsed between the epoch and `source.now()`.
    pub fn current_diff<T: TimeSource + ?Sized>(self, source: &T) -> Result<u64> {
        let now = source.now();
        let delta = now.signed_duration_since(*EPOCH);
        if delta < TimeDelta::zero() {
            tracing::error!(%now, epoch = %*EPOCH, "clock is before the minid epoch");
            return Err(MinidError::ClockBeforeEpoch);
        }

        let units = match self {
            Self::Seconds => Some(delta.num_seconds()),
            Self::Milliseconds => Some(delta.num_milliseconds()),
            Self::Microseconds => delta.num_microseconds(),
            Self::Nanoseconds => delta.num_nanoseconds(),
        };

        match units {
            Some(n) => Ok(n.unsigned_abs()),
            None => {
                tracing::error!(%now, resolution = self.as_str(), "time diff out of range");
                Err(MinidError::RangeExceeded {
                    value: u64::MAX,
                    max: self.max_diff(),
                    width: self.width(),
                })
            }
        }
    }

    /// Instant that lies `diff` units after the epoch.
    pub fn instant_at(self, diff: u64) -> Result<DateTime<Utc>> {
        let n = i64::try_from(diff).map_err(|_| MinidError::InvalidTimestamp)?;
        let delta = match self {
            Self::Seconds => TimeDelta::try_seconds(n),
            Self::Milliseconds => TimeDelta::try_milliseconds(n),
            Self::Microseconds => Some(TimeDelta::microseconds(n)),
            Self::Nanoseconds => Some(TimeDelta::nanoseconds(n)),
        }
        .ok_or(MinidError::InvalidTimestamp)?;

        EPOCH
            .checked_add_signed(delta)
            .ok_or(MinidError::InvalidTimestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl TimeSource for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_epoch_is_2025() {
        assert_eq!(*EPOCH, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_round_trip() {
        for res in Resolution::ALL {
            assert_eq!(Resolution::parse(res.as_str()), Some(res));
        }
        assert_eq!(Resolution::parse("r"), None);
        assert_eq!(Resolution::parse("sec"), None);
    }

    #[test]
    fn test_current_diff_units() {
        let clock = FixedClock(*EPOCH + TimeDelta::milliseconds(1_500));
        assert_eq!(Resolution::Seconds.current_diff(&clock).unwrap(), 1);
        assert_eq!(
            Resolution::Milliseconds.current_diff(&clock).unwrap(),
            1_500
        );
        assert_eq!(
            Resolution::Microseconds.current_diff(&clock).unwrap(),
            1_500_000
        );
        assert_eq!(
            Resolution::Nanoseconds.current_diff(&clock).unwrap(),
            1_500_000_000
        );
    }

    #[test]
    fn test_clock_before_epoch() {
        let clock = FixedClock(*EPOCH - TimeDelta::seconds(1));
        for res in Resolution::ALL {
            assert_eq!(res.current_diff(&clock), Err(MinidError::ClockBeforeEpoch));
        }
    }

    #[test]
    fn test_nanos_out_of_range() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2400, 1, 1, 0, 0, 0).unwrap());
        assert!(matches!(
            Resolution::Nanoseconds.current_diff(&clock),
            Err(MinidError::RangeExceeded { .. })
        ));
        assert!(Resolution::Seconds.current_diff(&clock).is_ok());
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        for res in Resolution::ALL {
            assert!(res.current_diff(&SystemClock).is_ok());
        }
    }

    #[test]
    fn test_instant_at_inverts_current_diff() {
        let second = Utc.with_ymd_and_hms(2026, 2, 12, 9, 15, 30).unwrap();
        let at = second + TimeDelta::microseconds(123_456);
        let clock = FixedClock(at);
        let us = Resolution::Microseconds.current_diff(&clock).unwrap();
        assert_eq!(Resolution::Microseconds.instant_at(us).unwrap(), at);

        let s = Resolution::Seconds.current_diff(&clock).unwrap();
        assert_eq!(Resolution::Seconds.instant_at(s).unwrap(), second);
        assert_eq!(
            Resolution::Nanoseconds.instant_at(u64::MAX),
            Err(MinidError::InvalidTimestamp)
        );
    }
}
