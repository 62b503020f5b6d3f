//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default one-shot recording duration (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Default max recording duration for daemon mode (60 seconds)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 60;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default one-shot recording duration (10 seconds)
    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    /// Default max duration for daemon mode (60 seconds)
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse formats: "30s", "1m", "2m30s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        if input.is_empty() {
            return Err(err());
        }

        let mut total_secs: u64 = 0;
        let mut digits = String::new();
        let mut seen_minutes = false;
        let mut seen_seconds = false;

        for c in input.chars() {
            match c {
                '0'..='9' => digits.push(c),
                'm' | 'M' => {
                    if seen_minutes || seen_seconds || digits.is_empty() {
                        return Err(err());
                    }
                    let minutes: u64 = digits.parse().map_err(|_| err())?;
                    total_secs += minutes * 60;
                    digits.clear();
                    seen_minutes = true;
                }
                's' | 'S' => {
                    if seen_seconds || digits.is_empty() {
                        return Err(err());
                    }
                    let secs: u64 = digits.parse().map_err(|_| err())?;
                    total_secs += secs;
                    digits.clear();
                    seen_seconds = true;
                }
                _ => return Err(err()),
            }
        }

        // Trailing digits without a unit, or no unit at all
        if !digits.is_empty() || (!seen_minutes && !seen_seconds) {
            return Err(err());
        }

        if total_secs == 0 {
            return Err(err());
        }

        Ok(Self::from_secs(total_secs))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            write!(f, "{}m", secs / 60)
        } else if secs >= 60 {
            write!(f, "{}m{}s", secs / 60, secs % 60)
        } else {
            write!(f, "{}s", secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds() {
        assert_eq!("30s".parse::<Duration>().unwrap().as_secs(), 30);
        assert_eq!("5s".parse::<Duration>().unwrap().as_secs(), 5);
    }

    #[test]
    fn parse_minutes() {
        assert_eq!("1m".parse::<Duration>().unwrap().as_secs(), 60);
        assert_eq!("5m".parse::<Duration>().unwrap().as_secs(), 300);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        assert_eq!("2m30s".parse::<Duration>().unwrap().as_secs(), 150);
        assert_eq!("1m1s".parse::<Duration>().unwrap().as_secs(), 61);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("30S".parse::<Duration>().unwrap().as_secs(), 30);
        assert_eq!("1M".parse::<Duration>().unwrap().as_secs(), 60);
    }

    #[test]
    fn parse_with_whitespace() {
        assert_eq!("  30s  ".parse::<Duration>().unwrap().as_secs(), 30);
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!("".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("s30".parse::<Duration>().is_err());
        assert!("30s1m".parse::<Duration>().is_err());
        assert!("1m2m".parse::<Duration>().is_err());
        assert!("abc".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
        assert!("1m30".parse::<Duration>().is_err());
    }

    #[test]
    fn parse_rejects_zero() {
        assert!("0s".parse::<Duration>().is_err());
        assert!("0m".parse::<Duration>().is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!("30s".parse::<Duration>().unwrap().to_string(), "30s");
        assert_eq!("2m".parse::<Duration>().unwrap().to_string(), "2m");
        assert_eq!("2m30s".parse::<Duration>().unwrap().to_string(), "2m30s");
    }

    #[test]
    fn conversions() {
        let d = Duration::from_secs(2);
        assert_eq!(d.as_millis(), 2000);
        assert_eq!(d.as_std(), StdDuration::from_secs(2));
    }

    #[test]
    fn defaults() {
        assert_eq!(Duration::default_duration().as_secs(), 10);
        assert_eq!(Duration::default_max_duration().as_secs(), 60);
    }
}
