use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A wall-clock instant as recorded in commit signatures.
///
/// Stores whole seconds since the UNIX epoch together with the UTC offset
/// (in minutes) that was in effect locally. The textual form is
/// `<seconds> <±HHMM>`, e.g. `1700000000 +0130`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since UNIX epoch.
    pub seconds: i64,
    /// Offset east of UTC in minutes (negative for west).
    pub offset_minutes: i32,
}

impl Timestamp {
    /// Create a timestamp with explicit values.
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Self {
            seconds,
            offset_minutes,
        }
    }

    /// Render the UTC offset as `±HHMM`.
    pub fn format_offset(&self) -> String {
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let abs = self.offset_minutes.unsigned_abs();
        format!("{sign}{:02}{:02}", abs / 60, abs % 60)
    }

    /// Parse a `±HHMM` offset into minutes.
    pub fn parse_offset(s: &str) -> Result<i32, TypeError> {
        let invalid = || TypeError::InvalidOffset(s.to_string());
        let (sign, digits) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        Ok(sign * (hours * 60 + minutes))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seconds, self.format_offset())
    }
}

/// Source of "now" for anything that stamps objects with a time.
pub trait TimeSource: Send + Sync {
    /// The current instant and local UTC offset.
    fn now(&self) -> Timestamp;
}

/// The host's wall clock and local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Local::now();
        Timestamp::new(now.timestamp(), now.offset().local_minus_utc() / 60)
    }
}

/// A clock frozen at a single instant. Used for reproducible digests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_positive_offset() {
        assert_eq!(Timestamp::new(0, 90).format_offset(), "+0130");
        assert_eq!(Timestamp::new(0, 0).format_offset(), "+0000");
    }

    #[test]
    fn format_negative_offset() {
        assert_eq!(Timestamp::new(0, -300).format_offset(), "-0500");
        assert_eq!(Timestamp::new(0, -570).format_offset(), "-0930");
    }

    #[test]
    fn parse_offset_roundtrip() {
        for minutes in [-720, -570, -60, 0, 45, 330, 840] {
            let ts = Timestamp::new(1, minutes);
            assert_eq!(Timestamp::parse_offset(&ts.format_offset()).unwrap(), minutes);
        }
    }

    #[test]
    fn parse_offset_rejects_garbage() {
        for bad in ["", "0100", "+01", "+01a0", "+0160", "*0100"] {
            assert!(Timestamp::parse_offset(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn display_matches_commit_format() {
        let ts = Timestamp::new(1_700_000_000, 180);
        assert_eq!(ts.to_string(), "1700000000 +0300");
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let clock = FixedClock(Timestamp::new(42, -60));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().seconds, 42);
    }

    #[test]
    fn system_clock_offset_is_whole_minutes() {
        let now = SystemClock.now();
        assert!(now.seconds > 0);
        assert!(now.offset_minutes.abs() < 24 * 60);
    }
}
