//! Patient snapshots and per-patient risk reports.
//!
//! A [`PatientSnapshot`] is the already-fetched state the dashboard holds for one patient:
//! demographics relevant to scoring plus the raw vital sign readings. Reports are computed
//! against an explicit `now` so the same snapshot always yields the same report.

use crate::bmi::calculate_bmi;
use crate::config::AnalyticsConfig;
use crate::constants::NEUTRAL_BMI;
use crate::risk::{assess_risk, validate_risk_level_change, RiskAssessment, RiskFactors};
use crate::summary::{summarize_vital_with_band, VitalSummary};
use crate::trend::average;
use crate::vitals::{validate_vital, VitalKind};
use crate::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, Duration, Utc};
use meditrack_types::RiskLevel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One set of vital signs taken together.
///
/// Every measurement is optional; intake forms rarely capture all of them at once. The intake
/// form's field names (`timestamp`, `blood_pressure_systolic`, ...) are accepted as aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalReading {
    #[serde(alias = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(default, alias = "blood_pressure_systolic")]
    pub systolic: Option<f64>,
    #[serde(default, alias = "blood_pressure_diastolic")]
    pub diastolic: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
    #[serde(default)]
    pub respiratory_rate: Option<f64>,
    #[serde(default, alias = "blood_glucose")]
    pub glucose: Option<f64>,
}

impl VitalReading {
    /// The measurement of `kind`, if it was taken.
    pub fn value(&self, kind: VitalKind) -> Option<f64> {
        match kind {
            VitalKind::Systolic => self.systolic,
            VitalKind::Diastolic => self.diastolic,
            VitalKind::HeartRate => self.heart_rate,
            VitalKind::Temperature => self.temperature,
            VitalKind::OxygenSaturation => self.oxygen_saturation,
            VitalKind::RespiratoryRate => self.respiratory_rate,
            VitalKind::Glucose => self.glucose,
        }
    }
}

/// Values of `kind` across `readings`, skipping readings where it was not taken.
pub fn series_of(readings: &[&VitalReading], kind: VitalKind) -> Vec<f64> {
    readings.iter().filter_map(|r| r.value(kind)).collect()
}

/// Scoring-relevant state of one patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientSnapshot {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    /// Age in years.
    pub age: f64,
    /// Recorded BMI; takes precedence over weight and height.
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub vitals: Vec<VitalReading>,
    /// Risk level currently recorded for the patient, if any.
    #[serde(default)]
    pub previous_risk_level: Option<RiskLevel>,
}

impl PatientSnapshot {
    /// Rejects snapshots with an unusable age or implausible vital readings.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidInput`] for a negative or non-finite age, or
    /// [`AnalyticsError::ImplausibleVital`] for the first reading outside its plausible range.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "age must be a non-negative number (got {})",
                self.age
            )));
        }

        for reading in &self.vitals {
            for kind in VitalKind::ALL {
                if let Some(value) = reading.value(kind) {
                    validate_vital(kind, value)?;
                }
            }
        }

        Ok(())
    }

    /// Readings recorded in the `window_days` days up to and including `now`, oldest first.
    pub fn readings_within(&self, now: DateTime<Utc>, window_days: u32) -> Vec<&VitalReading> {
        let cutoff = now - Duration::days(i64::from(window_days));
        let mut readings: Vec<&VitalReading> = self
            .vitals
            .iter()
            .filter(|r| r.recorded_at >= cutoff && r.recorded_at <= now)
            .collect();
        readings.sort_by_key(|r| r.recorded_at);
        readings
    }

    /// The recorded BMI, or one derived from weight and height.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidInput`] if BMI must be derived from a non-positive
    /// weight or height.
    pub fn effective_bmi(&self) -> AnalyticsResult<Option<f64>> {
        if let Some(bmi) = self.bmi {
            return Ok(Some(bmi));
        }
        match (self.weight_kg, self.height_m) {
            (Some(weight), Some(height)) => calculate_bmi(weight, height).map(Some),
            _ => Ok(None),
        }
    }

    /// Risk factors over the trailing window ending at `now`.
    ///
    /// Blood pressure and glucose are averaged over the window. A patient with no known BMI is
    /// scored at [`NEUTRAL_BMI`], which contributes no points.
    pub fn risk_factors(
        &self,
        now: DateTime<Utc>,
        window_days: u32,
    ) -> AnalyticsResult<RiskFactors> {
        let readings = self.readings_within(now, window_days);

        let bmi = match self.effective_bmi()? {
            Some(bmi) => bmi,
            None => {
                tracing::warn!(patient = %self.id, "no BMI or weight/height on record; scoring BMI as neutral");
                NEUTRAL_BMI
            }
        };

        Ok(RiskFactors {
            avg_systolic: average(&series_of(&readings, VitalKind::Systolic)),
            avg_glucose: average(&series_of(&readings, VitalKind::Glucose)),
            chronic_conditions_count: self.chronic_conditions.len() as f64,
            age: self.age,
            bmi,
        })
    }
}

/// Inclusive time window a report covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Risk and vitals overview for one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientReport {
    pub patient_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub window: DateWindow,
    pub risk: RiskAssessment,
    /// One summary per vital sign with readings in the window, in [`VitalKind::ALL`] order.
    pub vitals: Vec<VitalSummary>,
    /// Set when the computed level is more than one step from the recorded one.
    pub level_change_flagged: bool,
}

/// Builds the report for `snapshot` as of `now`.
///
/// # Errors
///
/// Returns [`AnalyticsError::Patient`] wrapping the underlying failure if the snapshot does not
/// validate or its BMI cannot be derived.
pub fn assess_patient(
    snapshot: &PatientSnapshot,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> AnalyticsResult<PatientReport> {
    build_report(snapshot, config, now).map_err(|source| AnalyticsError::Patient {
        id: snapshot.id,
        source: Box::new(source),
    })
}

fn build_report(
    snapshot: &PatientSnapshot,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> AnalyticsResult<PatientReport> {
    snapshot.validate()?;

    let window_days = config.trend_window_days();
    let factors = snapshot.risk_factors(now, window_days)?;
    let risk = assess_risk(&factors);

    let readings = snapshot.readings_within(now, window_days);
    let vitals: Vec<VitalSummary> = VitalKind::ALL
        .into_iter()
        .filter_map(|kind| {
            summarize_vital_with_band(
                kind,
                &series_of(&readings, kind),
                config.stable_slope_band(),
            )
        })
        .collect();

    let level_change_flagged =
        validate_risk_level_change(snapshot.previous_risk_level, risk.level, None).is_err();
    if level_change_flagged {
        tracing::info!(
            patient = %snapshot.id,
            previous = ?snapshot.previous_risk_level,
            computed = %risk.level,
            "risk level moved more than one step"
        );
    }

    Ok(PatientReport {
        patient_id: snapshot.id,
        name: snapshot.name.clone(),
        window: DateWindow {
            from: now - Duration::days(i64::from(window_days)),
            to: now,
        },
        risk,
        vitals,
        level_change_flagged,
    })
}
