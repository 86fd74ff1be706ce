//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Countdown, Duration};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Countdown length in seconds before a "with countdown" recording starts
    pub countdown: Option<u32>,
    /// Trim length applied to finished recordings (e.g. "5s")
    pub trim: Option<String>,
    /// Directory recordings are saved into
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            countdown: Some(Countdown::default().ticks()),
            trim: Some(Duration::default_trim().to_string()),
            output_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            countdown: other.countdown.or(self.countdown),
            trim: other.trim.or(self.trim),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }

    /// Get countdown, or default if not set/invalid
    pub fn countdown_or_default(&self) -> Countdown {
        self.countdown
            .and_then(|n| Countdown::new(n.into()))
            .unwrap_or_default()
    }

    /// Get trim as parsed Duration, or default if not set/invalid
    pub fn trim_or_default(&self) -> Duration {
        self.trim
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_trim)
    }

    /// Get output directory, or the current directory if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.countdown, Some(1));
        assert_eq!(config.trim, Some("5s".to_string()));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.countdown.is_none());
        assert!(config.trim.is_none());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            countdown: Some(3),
            trim: Some("5s".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            countdown: None,
            trim: Some("10s".to_string()),
            output_dir: Some(PathBuf::from("/tmp/out")),
        };

        let merged = base.merge(other);
        assert_eq!(merged.countdown, Some(3));
        assert_eq!(merged.trim, Some("10s".to_string()));
        assert_eq!(merged.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn countdown_or_default_rejects_zero() {
        let config = AppConfig {
            countdown: Some(0),
            ..Default::default()
        };
        assert_eq!(config.countdown_or_default().ticks(), 1);

        let config = AppConfig {
            countdown: Some(4),
            ..Default::default()
        };
        assert_eq!(config.countdown_or_default().ticks(), 4);
    }

    #[test]
    fn trim_or_default_parses() {
        let config = AppConfig {
            trim: Some("1m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.trim_or_default().as_secs(), 60);
    }

    #[test]
    fn trim_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            trim: Some("forever".to_string()),
            ..Default::default()
        };
        assert_eq!(config.trim_or_default().as_secs(), 5);
        assert_eq!(AppConfig::empty().trim_or_default().as_secs(), 5);
    }

    #[test]
    fn output_dir_defaults_to_cwd() {
        assert_eq!(AppConfig::empty().output_dir_or_default(), PathBuf::from("."));
    }
}
