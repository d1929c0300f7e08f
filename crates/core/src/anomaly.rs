//! Anomaly counting over a series.
//!
//! What counts as abnormal is decided by the caller's classifier; for vital signs that is
//! usually [`crate::vitals::vital_status`] bound to a [`crate::vitals::VitalKind`].

use meditrack_types::VitalStatus;

/// Number of readings in `series` that `classify` does not mark as [`VitalStatus::Normal`].
pub fn count_anomalies<F>(series: &[f64], classify: F) -> usize
where
    F: Fn(f64) -> VitalStatus,
{
    series
        .iter()
        .filter(|&&value| classify(value).is_anomalous())
        .count()
}
