//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default trim length applied to every finished capture (5 seconds)
pub const DEFAULT_TRIM_SECS: u64 = 5;

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
            milliseconds: secs.saturating_mul(1000),
        }
    }

    /// Default trim length (5 seconds)
    pub const fn default_trim() -> Self {
        Self::from_secs(DEFAULT_TRIM_SECS)
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Get duration in fractional seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.milliseconds as f64 / 1000.0
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Number of sample frames this duration spans at `sample_rate`.
    ///
    /// Rounds down, so the result never covers more time than `self`.
    /// Saturates at `u64::MAX` for durations no buffer could hold.
    pub const fn frames_at(&self, sample_rate: u32) -> u64 {
        let frames = self.milliseconds as u128 * sample_rate as u128 / 1000;
        if frames > u64::MAX as u128 {
            u64::MAX
        } else {
            frames as u64
        }
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "5s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(DurationParseError { input: s.to_string() });
            }
        }

        // Leftover digits without a unit
        if !current_num.is_empty() || !found_any {
            return Err(DurationParseError { input: s.to_string() });
        }

        let total_ms = minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .filter(|&ms| ms > 0)
            .ok_or_else(|| DurationParseError { input: s.to_string() })?;

        Ok(Self { milliseconds: total_ms })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_trim()
    }
}

/// Format elapsed seconds as a `M:SS` clock.
pub fn format_clock(elapsed_secs: u64) -> String {
    format!("{}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_case_insensitive() {
        let d: Duration = "1M30S".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
    }

    #[test]
    fn display_round_trips_common_values() {
        assert_eq!(Duration::from_secs(5).to_string(), "5s");
        assert_eq!(Duration::from_secs(120).to_string(), "2m");
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
    }

    #[test]
    fn frames_at_sample_rate() {
        assert_eq!(Duration::from_secs(5).frames_at(44_100), 220_500);
        assert_eq!(Duration::from_millis(1500).frames_at(48_000), 72_000);
        assert_eq!(Duration::from_millis(1).frames_at(22_050), 22);
    }

    #[test]
    fn parse_rejects_overflowing_values() {
        assert!("400000000000000000m".parse::<Duration>().is_err());
        assert!("18446744073709552s".parse::<Duration>().is_err());
        assert!("99999999999999999999s".parse::<Duration>().is_err());

        let largest: Duration = "18446744073709551s".parse().unwrap();
        assert_eq!(largest.as_secs(), 18_446_744_073_709_551);
    }

    #[test]
    fn frames_at_saturates_for_huge_durations() {
        let huge: Duration = "5000000000000000s".parse().unwrap();
        assert_eq!(huge.frames_at(44_100), u64::MAX);
        assert_eq!(Duration::from_millis(u64::MAX).frames_at(48_000), u64::MAX);
        assert_eq!(Duration::from_secs(u64::MAX).as_millis(), u64::MAX);
    }

    #[test]
    fn default_is_five_seconds() {
        assert_eq!(Duration::default().as_secs(), 5);
        assert_eq!(Duration::default().as_std(), StdDuration::from_secs(5));
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(600), "10:00");
    }
}
