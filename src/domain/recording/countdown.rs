//! Countdown length value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::CountdownParseError;

/// Default countdown before recording starts (1 second)
pub const DEFAULT_COUNTDOWN_SECS: u32 = 1;

/// Number of one-second ticks to wait before recording starts.
/// Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Countdown(u32);

impl Countdown {
    /// Build a countdown from a raw user value; `None` for anything below 1.
    pub fn new(ticks: i64) -> Option<Self> {
        if ticks <= 0 {
            return None;
        }
        u32::try_from(ticks).ok().map(Self)
    }

    /// Number of ticks
    pub const fn ticks(&self) -> u32 {
        self.0
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self(DEFAULT_COUNTDOWN_SECS)
    }
}

impl FromStr for Countdown {
    type Err = CountdownParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CountdownParseError { input: s.to_string() })
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
