//! # MediTrack Core
//!
//! Pure analytics behind the MediTrack clinical dashboard:
//! - Trend estimation and direction over vital sign series
//! - Composite risk scoring and classification, with risk level change checks
//! - Vital sign reference ranges, status classification and plausibility validation
//! - Per-patient reports and cohort dashboard aggregation
//!
//! **No I/O concerns beyond reading cohort files**: environment handling, logging setup and
//! output formatting belong in the `meditrack` CLI and the `meditrack-run` binary.

pub mod anomaly;
pub mod bmi;
pub mod cohort;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod patient;
pub mod risk;
pub mod summary;
pub mod trend;
pub mod vitals;

mod shared;

pub use anomaly::count_anomalies;
pub use bmi::calculate_bmi;
pub use cohort::{load_cohort, parse_cohort, CohortFormat};
pub use config::AnalyticsConfig;
pub use dashboard::{CohortDashboard, RiskDistribution, Sparkline};
pub use error::{AnalyticsError, AnalyticsResult};
pub use patient::{assess_patient, PatientReport, PatientSnapshot, VitalReading};
pub use risk::{
    assess_risk, classify_risk, score_risk, validate_risk_level_change, RiskAssessment,
    RiskFactors,
};
pub use summary::{summarize_vital, VitalSummary};
pub use trend::{
    average, estimate_trend, percentage_change, trend_direction, KpiChange, KpiDirection,
};
pub use vitals::{range_position, validate_vital, vital_status, RangePosition, VitalKind};

pub use meditrack_types::{RiskLevel, TrendDirection, VitalStatus};
