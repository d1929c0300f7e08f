//! Per-vital trend summaries for patient charts.

use crate::anomaly::count_anomalies;
use crate::constants::DEFAULT_STABLE_SLOPE_BAND;
use crate::shared::round_to;
use crate::trend::{average, estimate_trend, trend_direction_with_band};
use crate::vitals::{vital_status, VitalKind};
use meditrack_types::{TrendDirection, VitalStatus};
use serde::Serialize;

/// Display-ready summary of one vital sign over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalSummary {
    pub kind: VitalKind,
    pub parameter: &'static str,
    pub unit: &'static str,
    /// Most recent reading.
    pub current: f64,
    /// Mean of the window, rounded to one decimal.
    pub average: f64,
    pub trend: TrendDirection,
    /// Window trend percentage, rounded to one decimal.
    pub trend_percent: f64,
    /// Status of the most recent reading.
    pub status: VitalStatus,
    pub readings_count: usize,
    /// Readings in the window classified as warning or danger.
    pub anomalies: usize,
}

/// Summarises `series` (oldest first) using the default stable slope band.
///
/// Returns `None` for an empty series.
pub fn summarize_vital(kind: VitalKind, series: &[f64]) -> Option<VitalSummary> {
    summarize_vital_with_band(kind, series, DEFAULT_STABLE_SLOPE_BAND)
}

/// Summarises `series` (oldest first), treating slopes within `±band` as stable.
pub fn summarize_vital_with_band(
    kind: VitalKind,
    series: &[f64],
    band: f64,
) -> Option<VitalSummary> {
    let current = *series.last()?;

    Some(VitalSummary {
        kind,
        parameter: kind.label(),
        unit: kind.unit(),
        current,
        average: round_to(average(series), 1),
        trend: trend_direction_with_band(series, band),
        trend_percent: round_to(estimate_trend(series), 1),
        status: vital_status(kind, current),
        readings_count: series.len(),
        anomalies: count_anomalies(series, |value| vital_status(kind, value)),
    })
}
