//! Analytics runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the summary and dashboard operations. Parsers here take the raw environment value
//! as an argument instead of reading process-wide environment variables, so tests and
//! multi-threaded callers see consistent behaviour.

use crate::constants::{
    DEFAULT_SPARKLINE_POINTS, DEFAULT_STABLE_SLOPE_BAND, DEFAULT_TREND_WINDOW_DAYS,
    MAX_TREND_WINDOW_DAYS,
};
use crate::{AnalyticsError, AnalyticsResult};

/// Analytics configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsConfig {
    trend_window_days: u32,
    stable_slope_band: f64,
    sparkline_points: usize,
}

impl AnalyticsConfig {
    /// Create a new `AnalyticsConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidConfig`] if:
    /// - `trend_window_days` is zero or longer than a year,
    /// - `stable_slope_band` is negative or not finite,
    /// - `sparkline_points` is zero.
    pub fn new(
        trend_window_days: u32,
        stable_slope_band: f64,
        sparkline_points: usize,
    ) -> AnalyticsResult<Self> {
        if trend_window_days == 0 || trend_window_days > MAX_TREND_WINDOW_DAYS {
            return Err(AnalyticsError::InvalidConfig(format!(
                "trend_window_days must be between 1 and {MAX_TREND_WINDOW_DAYS}"
            )));
        }

        if !stable_slope_band.is_finite() || stable_slope_band < 0.0 {
            return Err(AnalyticsError::InvalidConfig(
                "stable_slope_band must be a finite, non-negative number".into(),
            ));
        }

        if sparkline_points == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "sparkline_points must be at least 1".into(),
            ));
        }

        Ok(Self {
            trend_window_days,
            stable_slope_band,
            sparkline_points,
        })
    }

    pub fn trend_window_days(&self) -> u32 {
        self.trend_window_days
    }

    pub fn stable_slope_band(&self) -> f64 {
        self.stable_slope_band
    }

    pub fn sparkline_points(&self) -> usize {
        self.sparkline_points
    }

    /// Build a configuration from optional raw environment values.
    ///
    /// Each argument is the unparsed value of the corresponding environment variable; `None`
    /// or blank values fall back to the defaults.
    pub fn from_env_values(
        trend_window_days: Option<String>,
        stable_slope_band: Option<String>,
        sparkline_points: Option<String>,
    ) -> AnalyticsResult<Self> {
        Self::new(
            trend_window_days_from_env_value(trend_window_days)?,
            stable_slope_band_from_env_value(stable_slope_band)?,
            sparkline_points_from_env_value(sparkline_points)?,
        )
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            stable_slope_band: DEFAULT_STABLE_SLOPE_BAND,
            sparkline_points: DEFAULT_SPARKLINE_POINTS,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the trailing trend window from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_TREND_WINDOW_DAYS`].
pub fn trend_window_days_from_env_value(value: Option<String>) -> AnalyticsResult<u32> {
    let parsed = non_blank(value)
        .map(|v| {
            v.parse::<u32>().map_err(|e| {
                AnalyticsError::InvalidConfig(format!("trend window {v:?} is not a day count: {e}"))
            })
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_TREND_WINDOW_DAYS))
}

/// Parse the stable slope band from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_STABLE_SLOPE_BAND`].
pub fn stable_slope_band_from_env_value(value: Option<String>) -> AnalyticsResult<f64> {
    let parsed = non_blank(value)
        .map(|v| {
            v.parse::<f64>().map_err(|e| {
                AnalyticsError::InvalidConfig(format!("slope band {v:?} is not a number: {e}"))
            })
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_STABLE_SLOPE_BAND))
}

/// Parse the sparkline length from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SPARKLINE_POINTS`].
pub fn sparkline_points_from_env_value(value: Option<String>) -> AnalyticsResult<usize> {
    let parsed = non_blank(value)
        .map(|v| {
            v.parse::<usize>().map_err(|e| {
                AnalyticsError::InvalidConfig(format!("sparkline points {v:?} is not a count: {e}"))
            })
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_SPARKLINE_POINTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_env_values_fall_back_to_defaults() {
        let cfg = AnalyticsConfig::from_env_values(None, Some("   ".into()), Some(String::new()))
            .expect("defaults should be valid");
        assert_eq!(cfg, AnalyticsConfig::default());
    }

    #[test]
    fn env_values_are_trimmed_and_parsed() {
        let cfg = AnalyticsConfig::from_env_values(
            Some(" 14 ".into()),
            Some("0.5".into()),
            Some("30".into()),
        )
        .expect("valid overrides");
        assert_eq!(cfg.trend_window_days(), 14);
        assert_eq!(cfg.stable_slope_band(), 0.5);
        assert_eq!(cfg.sparkline_points(), 30);
    }

    #[test]
    fn rejects_non_numeric_window() {
        let err = trend_window_days_from_env_value(Some("a week".into()))
            .expect_err("should reject text");
        assert!(matches!(err, AnalyticsError::InvalidConfig(msg) if msg.contains("a week")));
    }

    #[test]
    fn rejects_zero_window() {
        let err = AnalyticsConfig::new(0, 1.0, 14).expect_err("should reject zero window");
        assert!(matches!(err, AnalyticsError::InvalidConfig(msg) if msg.contains("trend_window_days")));
    }

    #[test]
    fn rejects_negative_slope_band() {
        let err = AnalyticsConfig::new(7, -0.1, 14).expect_err("should reject negative band");
        assert!(matches!(err, AnalyticsError::InvalidConfig(msg) if msg.contains("stable_slope_band")));
    }

    #[test]
    fn rejects_nan_slope_band() {
        let err = stable_slope_band_from_env_value(Some("NaN".into()))
            .and_then(|band| AnalyticsConfig::new(7, band, 14))
            .expect_err("should reject NaN band");
        assert!(matches!(err, AnalyticsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_sparkline_points() {
        let err = AnalyticsConfig::new(7, 1.0, 0).expect_err("should reject empty sparklines");
        assert!(matches!(err, AnalyticsError::InvalidConfig(msg) if msg.contains("sparkline_points")));
    }
}
