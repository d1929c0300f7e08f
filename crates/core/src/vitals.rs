//! Vital sign reference ranges.
//!
//! Each [`VitalKind`] carries three nested ranges:
//! - the **normal** range, used for `low` / `normal` / `high` positioning;
//! - the wider **warning** band, beyond which a reading is classified as `danger`;
//! - the **plausible** range, outside of which a reading is rejected as a recording error.

use crate::{AnalyticsError, AnalyticsResult};
use meditrack_types::VitalStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vital signs tracked per reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    Systolic,
    Diastolic,
    HeartRate,
    Temperature,
    OxygenSaturation,
    RespiratoryRate,
    Glucose,
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRange {
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Where a reading sits relative to its normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePosition {
    Low,
    Normal,
    High,
}

impl VitalKind {
    pub const ALL: [VitalKind; 7] = [
        VitalKind::Systolic,
        VitalKind::Diastolic,
        VitalKind::HeartRate,
        VitalKind::Temperature,
        VitalKind::OxygenSaturation,
        VitalKind::RespiratoryRate,
        VitalKind::Glucose,
    ];

    /// Snake-case identifier, matching the serialised form.
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::Systolic => "systolic",
            VitalKind::Diastolic => "diastolic",
            VitalKind::HeartRate => "heart_rate",
            VitalKind::Temperature => "temperature",
            VitalKind::OxygenSaturation => "oxygen_saturation",
            VitalKind::RespiratoryRate => "respiratory_rate",
            VitalKind::Glucose => "glucose",
        }
    }

    /// Human-readable parameter name shown on charts.
    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::Systolic => "Systolic BP",
            VitalKind::Diastolic => "Diastolic BP",
            VitalKind::HeartRate => "Heart Rate",
            VitalKind::Temperature => "Temperature",
            VitalKind::OxygenSaturation => "O2 Saturation",
            VitalKind::RespiratoryRate => "Respiratory Rate",
            VitalKind::Glucose => "Blood Glucose",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VitalKind::Systolic | VitalKind::Diastolic => "mmHg",
            VitalKind::HeartRate => "bpm",
            VitalKind::Temperature => "°C",
            VitalKind::OxygenSaturation => "%",
            VitalKind::RespiratoryRate => "breaths/min",
            VitalKind::Glucose => "mg/dL",
        }
    }

    pub fn normal_range(&self) -> VitalRange {
        match self {
            VitalKind::Systolic => VitalRange::new(90.0, 140.0),
            VitalKind::Diastolic => VitalRange::new(60.0, 90.0),
            VitalKind::HeartRate => VitalRange::new(60.0, 100.0),
            VitalKind::Temperature => VitalRange::new(36.1, 37.2),
            VitalKind::OxygenSaturation => VitalRange::new(95.0, 100.0),
            VitalKind::RespiratoryRate => VitalRange::new(12.0, 20.0),
            VitalKind::Glucose => VitalRange::new(70.0, 140.0),
        }
    }

    pub fn warning_band(&self) -> VitalRange {
        match self {
            VitalKind::Systolic => VitalRange::new(80.0, 180.0),
            VitalKind::Diastolic => VitalRange::new(50.0, 110.0),
            VitalKind::HeartRate => VitalRange::new(50.0, 120.0),
            VitalKind::Temperature => VitalRange::new(35.0, 38.5),
            VitalKind::OxygenSaturation => VitalRange::new(90.0, 100.0),
            VitalKind::RespiratoryRate => VitalRange::new(9.0, 24.0),
            VitalKind::Glucose => VitalRange::new(54.0, 180.0),
        }
    }

    /// Physiologically plausible range; wider than normal to admit genuine extremes.
    pub fn plausible_range(&self) -> VitalRange {
        match self {
            VitalKind::Systolic => VitalRange::new(50.0, 250.0),
            VitalKind::Diastolic => VitalRange::new(30.0, 150.0),
            VitalKind::HeartRate => VitalRange::new(20.0, 250.0),
            VitalKind::Temperature => VitalRange::new(30.0, 45.0),
            VitalKind::OxygenSaturation => VitalRange::new(50.0, 100.0),
            VitalKind::RespiratoryRate => VitalRange::new(5.0, 60.0),
            VitalKind::Glucose => VitalRange::new(20.0, 600.0),
        }
    }
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalKind {
    type Err = AnalyticsError;

    /// Accepts the snake-case identifier plus the long field names used by intake forms
    /// (`blood_pressure_systolic`, `glucose_level`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "systolic" | "blood_pressure_systolic" => VitalKind::Systolic,
            "diastolic" | "blood_pressure_diastolic" => VitalKind::Diastolic,
            "heart_rate" | "pulse" => VitalKind::HeartRate,
            "temperature" | "temp" => VitalKind::Temperature,
            "oxygen_saturation" | "spo2" => VitalKind::OxygenSaturation,
            "respiratory_rate" => VitalKind::RespiratoryRate,
            "glucose" | "glucose_level" | "blood_glucose" => VitalKind::Glucose,
            _ => {
                return Err(AnalyticsError::InvalidInput(format!(
                    "unknown vital sign: {s:?}"
                )))
            }
        };
        Ok(kind)
    }
}

/// Position of `value` relative to the normal range of `kind`.
pub fn range_position(kind: VitalKind, value: f64) -> RangePosition {
    let normal = kind.normal_range();
    if value < normal.min {
        RangePosition::Low
    } else if value > normal.max {
        RangePosition::High
    } else {
        RangePosition::Normal
    }
}

/// Classifies a reading as normal, warning or danger.
pub fn vital_status(kind: VitalKind, value: f64) -> VitalStatus {
    if kind.normal_range().contains(value) {
        VitalStatus::Normal
    } else if kind.warning_band().contains(value) {
        VitalStatus::Warning
    } else {
        VitalStatus::Danger
    }
}

/// Rejects readings outside the plausible range of `kind`.
///
/// # Errors
///
/// Returns [`AnalyticsError::ImplausibleVital`] if `value` is outside the plausible range or
/// not finite.
pub fn validate_vital(kind: VitalKind, value: f64) -> AnalyticsResult<f64> {
    let range = kind.plausible_range();
    if !range.contains(value) {
        return Err(AnalyticsError::ImplausibleVital {
            kind,
            value,
            min: range.min,
            max: range.max,
        });
    }
    Ok(value)
}
