//! Constants used throughout the MediTrack core crate.
//!
//! Clinical thresholds live here so the scoring tables, reference ranges and configuration
//! defaults are reviewed in one place.

/// Upper clamp for the composite risk score.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Lowest score classified as `critical`.
pub const CRITICAL_RISK_FLOOR: f64 = 86.0;

/// Lowest score classified as `high`.
pub const HIGH_RISK_FLOOR: f64 = 61.0;

/// Lowest score classified as `moderate`.
pub const MODERATE_RISK_FLOOR: f64 = 31.0;

/// BMI below this value scores as underweight.
pub const UNDERWEIGHT_BMI: f64 = 18.5;

/// BMI above this value scores as obese.
pub const OBESE_BMI: f64 = 30.0;

/// Default trailing window, in days, used when summarising vitals.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;

/// Default absolute per-reading slope treated as "stable".
pub const DEFAULT_STABLE_SLOPE_BAND: f64 = 1.0;

/// Default number of points kept per dashboard sparkline.
pub const DEFAULT_SPARKLINE_POINTS: usize = 14;

/// Longest trailing window accepted by configuration (one year).
pub const MAX_TREND_WINDOW_DAYS: u32 = 366;

/// BMI assumed when a patient has none on record; midpoint of the band that scores no points.
pub const NEUTRAL_BMI: f64 = 24.25;
