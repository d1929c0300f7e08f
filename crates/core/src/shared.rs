//! Shared numeric helpers for the MediTrack core.

/// Rounds `value` half away from zero to `decimals` decimal places.
///
/// Display values (averages, BMI, KPI percentages) are rounded once at the edge of the
/// analytics layer; internal arithmetic always works on unrounded values.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
