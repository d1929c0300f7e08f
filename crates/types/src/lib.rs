//! Shared value types for MediTrack analytics.
//!
//! These are the small, display-ready labels that cross crate boundaries: the categorical
//! risk level derived from a score, the per-reading status used for anomaly counting, and the
//! direction of a series trend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing label types from text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input did not name a known risk level.
    #[error("unknown risk level: {0:?} (expected low, moderate, high or critical)")]
    UnknownRiskLevel(String),
    /// The input did not name a known vital status.
    #[error("unknown vital status: {0:?} (expected normal, warning or danger)")]
    UnknownVitalStatus(String),
}

/// Categorical bucket derived from a 0-100 risk score.
///
/// Variants are declared in ascending severity so the derived ordering matches clinical
/// severity (`Low < Moderate < High < Critical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Every level, lowest severity first.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Returns the lowercase label used on the wire and in the dashboard.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Position in the severity hierarchy, `0` for `Low` up to `3` for `Critical`.
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    /// Number of hierarchy steps between two levels, regardless of direction.
    pub fn steps_from(&self, other: RiskLevel) -> u8 {
        self.rank().abs_diff(other.rank())
    }

    /// Whether this level should raise a dashboard alert.
    pub fn is_alert(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = TypesError;

    /// Parses a level name, ignoring surrounding whitespace and ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalised)
            .ok_or_else(|| TypesError::UnknownRiskLevel(s.to_owned()))
    }
}

impl Serialize for RiskLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Status of a single reading against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    /// Within the normal range.
    Normal,
    /// Outside the normal range but inside the warning band.
    Warning,
    /// Beyond the warning band.
    Danger,
}

impl VitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Normal => "normal",
            VitalStatus::Warning => "warning",
            VitalStatus::Danger => "danger",
        }
    }

    /// True for anything other than [`VitalStatus::Normal`].
    pub fn is_anomalous(&self) -> bool {
        !matches!(self, VitalStatus::Normal)
    }
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(VitalStatus::Normal),
            "warning" => Ok(VitalStatus::Warning),
            "danger" => Ok(VitalStatus::Danger),
            _ => Err(TypesError::UnknownVitalStatus(s.to_owned())),
        }
    }
}

/// Direction of a series over its observed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }

    /// Arrow glyph printed next to a trend figure.
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "↑",
            TrendDirection::Decreasing => "↓",
            TrendDirection::Stable => "→",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_order_by_severity() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(RiskLevel::ALL.iter().max(), Some(&RiskLevel::Critical));
    }

    #[test]
    fn risk_level_parses_case_insensitively() {
        assert_eq!(" High ".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!("CRITICAL".parse::<RiskLevel>(), Ok(RiskLevel::Critical));
    }

    #[test]
    fn risk_level_rejects_unknown_names() {
        let err = "severe".parse::<RiskLevel>().expect_err("should reject unknown level");
        assert!(matches!(err, TypesError::UnknownRiskLevel(name) if name == "severe"));
    }

    #[test]
    fn steps_from_is_symmetric() {
        assert_eq!(RiskLevel::Low.steps_from(RiskLevel::Critical), 3);
        assert_eq!(RiskLevel::Critical.steps_from(RiskLevel::Low), 3);
        assert_eq!(RiskLevel::High.steps_from(RiskLevel::High), 0);
    }

    #[test]
    fn only_high_and_critical_raise_alerts() {
        let alerts: Vec<_> = RiskLevel::ALL.into_iter().filter(|l| l.is_alert()).collect();
        assert_eq!(alerts, vec![RiskLevel::High, RiskLevel::Critical]);
    }

    #[test]
    fn labels_serialise_lowercase() {
        let json = serde_json::to_string(&(
            RiskLevel::Moderate,
            VitalStatus::Danger,
            TrendDirection::Decreasing,
        ))
        .expect("serialise labels");
        assert_eq!(json, r#"["moderate","danger","decreasing"]"#);
    }

    #[test]
    fn risk_level_deserialise_rejects_unknown_label() {
        let err = serde_json::from_str::<RiskLevel>(r#""extreme""#)
            .expect_err("should reject unknown label");
        assert!(err.to_string().contains("unknown risk level"));
    }

    #[test]
    fn trend_arrows_are_distinct() {
        assert_eq!(TrendDirection::Increasing.arrow(), "↑");
        assert_eq!(TrendDirection::Decreasing.arrow(), "↓");
        assert_eq!(TrendDirection::Stable.arrow(), "→");
    }

    #[test]
    fn only_normal_status_is_not_anomalous() {
        assert!(!VitalStatus::Normal.is_anomalous());
        assert!(VitalStatus::Warning.is_anomalous());
        assert!(VitalStatus::Danger.is_anomalous());
        assert_eq!("Warning".parse::<VitalStatus>(), Ok(VitalStatus::Warning));
    }
}
