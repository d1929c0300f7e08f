//! Trend estimation over chronological series.
//!
//! Series are ordered oldest first. Every function here is total over finite input: degenerate
//! series (fewer than two readings, zero mean) yield a neutral result rather than an error, and
//! non-finite input simply propagates through the arithmetic.

use crate::constants::DEFAULT_STABLE_SLOPE_BAND;
use crate::shared::round_to;
use meditrack_types::TrendDirection;
use serde::{Deserialize, Serialize};

/// Arithmetic mean of `series`, or `0.0` when it is empty.
pub fn average(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Ordinary least-squares slope of value against index position.
///
/// Returns `0.0` for fewer than two readings, where the index variance is zero.
pub fn linear_slope(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = average(series);

    let (numerator, denominator) =
        series
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (i, &value)| {
                let dx = i as f64 - x_mean;
                (num + dx * (value - y_mean), den + dx * dx)
            });

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Estimated percentage change across the whole series window.
///
/// The per-reading OLS slope is expressed relative to the series mean and then scaled by the
/// number of readings, so the figure describes change over the displayed window rather than
/// per step: `(slope / mean) * 100 * n`.
///
/// Returns exactly `0.0` when the series has fewer than two readings or a zero mean.
pub fn estimate_trend(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }

    let y_mean = average(series);
    if y_mean == 0.0 {
        return 0.0;
    }

    (linear_slope(series) / y_mean) * 100.0 * n as f64
}

/// Direction of `series` using the default stable band on the raw slope.
pub fn trend_direction(series: &[f64]) -> TrendDirection {
    trend_direction_with_band(series, DEFAULT_STABLE_SLOPE_BAND)
}

/// Direction of `series`, treating slopes within `±band` units per reading as stable.
pub fn trend_direction_with_band(series: &[f64], band: f64) -> TrendDirection {
    let slope = linear_slope(series);
    if slope > band {
        TrendDirection::Increasing
    } else if slope < -band {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Direction of a KPI between two reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiDirection {
    Up,
    Down,
    Stable,
}

/// Period-over-period change of a dashboard KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiChange {
    /// Percentage change, rounded to one decimal place.
    pub percent: f64,
    pub direction: KpiDirection,
}

/// Percentage change from `previous` to `current`.
///
/// A non-positive `previous` has no meaningful baseline and reports a stable `0.0`.
pub fn percentage_change(current: f64, previous: f64) -> KpiChange {
    let percent = if previous > 0.0 {
        round_to((current - previous) / previous * 100.0, 1)
    } else {
        0.0
    };

    let direction = if percent > 0.0 {
        KpiDirection::Up
    } else if percent < 0.0 {
        KpiDirection::Down
    } else {
        KpiDirection::Stable
    };

    KpiChange { percent, direction }
}
