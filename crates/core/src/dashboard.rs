//! Cohort-level dashboard aggregation.
//!
//! The dashboard shows how many patients sit in each risk level, how many raise alerts, and a
//! sparkline per vital sign drawn from the whole cohort's recent readings.

use crate::config::AnalyticsConfig;
use crate::patient::{assess_patient, PatientReport, PatientSnapshot, VitalReading};
use crate::shared::round_to;
use crate::trend::{average, trend_direction_with_band};
use crate::vitals::VitalKind;
use crate::AnalyticsResult;
use chrono::{DateTime, Utc};
use meditrack_types::{RiskLevel, TrendDirection};
use serde::Serialize;

/// Patient counts per risk level. Every level is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub critical: usize,
}

impl RiskDistribution {
    pub fn from_levels(levels: impl IntoIterator<Item = RiskLevel>) -> Self {
        let mut distribution = Self::default();
        for level in levels {
            *distribution.slot_mut(level) += 1;
        }
        distribution
    }

    fn slot_mut(&mut self, level: RiskLevel) -> &mut usize {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Moderate => &mut self.moderate,
            RiskLevel::High => &mut self.high,
            RiskLevel::Critical => &mut self.critical,
        }
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::High => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high + self.critical
    }

    /// Patients whose level raises an alert; see [`RiskLevel::is_alert`].
    pub fn alerts(&self) -> usize {
        RiskLevel::ALL
            .into_iter()
            .filter(RiskLevel::is_alert)
            .map(|level| self.count(level))
            .sum()
    }
}

/// Cohort readings of one vital sign, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sparkline {
    pub kind: VitalKind,
    pub label: &'static str,
    pub unit: &'static str,
    pub data: Vec<f64>,
    pub trend: TrendDirection,
}

/// Everything the dashboard overview renders for a cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortDashboard {
    pub generated_at: DateTime<Utc>,
    pub total_patients: usize,
    pub distribution: RiskDistribution,
    pub critical_alerts: usize,
    /// Mean risk score, rounded to one decimal; `0.0` for an empty cohort.
    pub average_risk_score: f64,
    /// Reports whose computed level moved more than one step from the recorded level.
    pub flagged_level_changes: usize,
    pub sparklines: Vec<Sparkline>,
    pub reports: Vec<PatientReport>,
}

impl CohortDashboard {
    /// Assesses every snapshot and aggregates the results as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the first patient assessment failure; see [`assess_patient`].
    pub fn build(
        snapshots: &[PatientSnapshot],
        config: &AnalyticsConfig,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<Self> {
        let reports = snapshots
            .iter()
            .map(|snapshot| assess_patient(snapshot, config, now))
            .collect::<AnalyticsResult<Vec<_>>>()?;

        let sparklines = cohort_sparklines(snapshots, config, now);
        Ok(Self::from_reports(reports, sparklines, now))
    }

    /// Aggregates already-computed reports.
    pub fn from_reports(
        reports: Vec<PatientReport>,
        sparklines: Vec<Sparkline>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let distribution = RiskDistribution::from_levels(reports.iter().map(|r| r.risk.level));
        let scores: Vec<f64> = reports.iter().map(|r| r.risk.score).collect();
        let flagged_level_changes = reports.iter().filter(|r| r.level_change_flagged).count();

        tracing::debug!(
            patients = reports.len(),
            alerts = distribution.alerts(),
            "aggregated cohort dashboard"
        );

        Self {
            generated_at,
            total_patients: reports.len(),
            distribution,
            critical_alerts: distribution.alerts(),
            average_risk_score: round_to(average(&scores), 1),
            flagged_level_changes,
            sparklines,
            reports,
        }
    }
}

/// One sparkline per vital sign with cohort readings in the window.
///
/// Readings from all patients are merged in time order and each line keeps the first
/// `sparkline_points` values.
pub fn cohort_sparklines(
    snapshots: &[PatientSnapshot],
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> Vec<Sparkline> {
    let mut readings: Vec<&VitalReading> = snapshots
        .iter()
        .flat_map(|s| s.readings_within(now, config.trend_window_days()))
        .collect();
    readings.sort_by_key(|r| r.recorded_at);

    VitalKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let data: Vec<f64> = readings
                .iter()
                .filter_map(|r| r.value(kind))
                .take(config.sparkline_points())
                .collect();
            if data.is_empty() {
                return None;
            }
            Some(Sparkline {
                kind,
                label: kind.label(),
                unit: kind.unit(),
                trend: trend_direction_with_band(&data, config.stable_slope_band()),
                data,
            })
        })
        .collect()
}
