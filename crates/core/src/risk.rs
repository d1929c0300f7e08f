//! Composite risk scoring and classification.
//!
//! The score is an additive point system. Each factor owns an ordered tier list, checked
//! highest threshold first, and contributes the points of the first tier it matches (or
//! nothing). Factor points add up and the total is clamped to [`MAX_RISK_SCORE`].
//!
//! | Factor             | Tier         | Points |
//! |--------------------|--------------|--------|
//! | Systolic BP        | > 140        | 30     |
//! |                    | > 130        | 15     |
//! | Glucose            | > 180        | 25     |
//! |                    | > 140        | 15     |
//! | Chronic conditions | > 2          | 20     |
//! |                    | > 0          | 10     |
//! | Age                | > 65         | 15     |
//! |                    | > 55         | 8      |
//! | BMI                | > 30         | 10     |
//! |                    | < 18.5       | 10     |

use crate::constants::{
    CRITICAL_RISK_FLOOR, HIGH_RISK_FLOOR, MAX_RISK_SCORE, MODERATE_RISK_FLOOR, OBESE_BMI,
    UNDERWEIGHT_BMI,
};
use crate::{AnalyticsError, AnalyticsResult};
use meditrack_types::RiskLevel;
use serde::{Deserialize, Serialize};

/// Clinical inputs to the risk score.
///
/// Values are expected to be plausible, non-negative clinical magnitudes; ranges are not
/// validated here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Average systolic blood pressure (mmHg).
    pub avg_systolic: f64,
    /// Average blood glucose (mg/dL).
    pub avg_glucose: f64,
    /// Number of chronic conditions on record.
    pub chronic_conditions_count: f64,
    /// Age in years.
    pub age: f64,
    /// Body-mass index (kg/m²).
    pub bmi: f64,
}

/// A scored factor, in the order the scoring table lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Systolic,
    Glucose,
    ChronicConditions,
    Age,
    Bmi,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::Systolic,
        RiskFactor::Glucose,
        RiskFactor::ChronicConditions,
        RiskFactor::Age,
        RiskFactor::Bmi,
    ];

    fn tiers(&self) -> &'static [Tier] {
        match self {
            RiskFactor::Systolic => SYSTOLIC_TIERS,
            RiskFactor::Glucose => GLUCOSE_TIERS,
            RiskFactor::ChronicConditions => CHRONIC_CONDITION_TIERS,
            RiskFactor::Age => AGE_TIERS,
            RiskFactor::Bmi => BMI_TIERS,
        }
    }

    fn value_in(&self, factors: &RiskFactors) -> f64 {
        match self {
            RiskFactor::Systolic => factors.avg_systolic,
            RiskFactor::Glucose => factors.avg_glucose,
            RiskFactor::ChronicConditions => factors.chronic_conditions_count,
            RiskFactor::Age => factors.age,
            RiskFactor::Bmi => factors.bmi,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Above(f64),
    Below(f64),
}

#[derive(Debug, Clone, Copy)]
struct Tier {
    bound: Bound,
    points: f64,
}

impl Tier {
    const fn above(threshold: f64, points: f64) -> Self {
        Self {
            bound: Bound::Above(threshold),
            points,
        }
    }

    const fn below(threshold: f64, points: f64) -> Self {
        Self {
            bound: Bound::Below(threshold),
            points,
        }
    }

    fn matches(&self, value: f64) -> bool {
        match self.bound {
            Bound::Above(threshold) => value > threshold,
            Bound::Below(threshold) => value < threshold,
        }
    }
}

const SYSTOLIC_TIERS: &[Tier] = &[Tier::above(140.0, 30.0), Tier::above(130.0, 15.0)];
const GLUCOSE_TIERS: &[Tier] = &[Tier::above(180.0, 25.0), Tier::above(140.0, 15.0)];
const CHRONIC_CONDITION_TIERS: &[Tier] = &[Tier::above(2.0, 20.0), Tier::above(0.0, 10.0)];
const AGE_TIERS: &[Tier] = &[Tier::above(65.0, 15.0), Tier::above(55.0, 8.0)];
const BMI_TIERS: &[Tier] = &[
    Tier::above(OBESE_BMI, 10.0),
    Tier::below(UNDERWEIGHT_BMI, 10.0),
];

/// Points of the first matching tier, or `0.0`.
fn tier_points(tiers: &[Tier], value: f64) -> f64 {
    tiers
        .iter()
        .find(|tier| tier.matches(value))
        .map_or(0.0, |tier| tier.points)
}

/// Points a single factor contributes for the given inputs.
pub fn factor_points(factor: RiskFactor, factors: &RiskFactors) -> f64 {
    tier_points(factor.tiers(), factor.value_in(factors))
}

/// Composite risk score in `[0, 100]`.
pub fn score_risk(factors: &RiskFactors) -> f64 {
    let total: f64 = RiskFactor::ALL
        .iter()
        .map(|factor| factor_points(*factor, factors))
        .sum();
    total.min(MAX_RISK_SCORE)
}

/// Maps a score to its risk level, evaluating bands from highest to lowest.
///
/// Each band includes its lower bound: `61` is `high`, `60` is `moderate`.
pub fn classify_risk(score: f64) -> RiskLevel {
    if score >= CRITICAL_RISK_FLOOR {
        RiskLevel::Critical
    } else if score >= HIGH_RISK_FLOOR {
        RiskLevel::High
    } else if score >= MODERATE_RISK_FLOOR {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Points contributed by one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: RiskFactor,
    pub points: f64,
}

/// Score, level and the factors that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    /// Factors that scored, in scoring-table order. Points are before clamping.
    pub contributions: Vec<FactorContribution>,
}

/// Scores and classifies `factors`, keeping the per-factor breakdown.
pub fn assess_risk(factors: &RiskFactors) -> RiskAssessment {
    let contributions: Vec<FactorContribution> = RiskFactor::ALL
        .iter()
        .map(|factor| FactorContribution {
            factor: *factor,
            points: factor_points(*factor, factors),
        })
        .filter(|contribution| contribution.points > 0.0)
        .collect();

    let score = score_risk(factors);
    let level = classify_risk(score);
    tracing::debug!(score, %level, factors = contributions.len(), "assessed risk");

    RiskAssessment {
        score,
        level,
        contributions,
    }
}

/// Validates a change of recorded risk level.
///
/// Moving more than one step through the hierarchy (for example `low` straight to `high`, or
/// `critical` down to `moderate`) requires a non-blank justification. A patient without a
/// previous level may be given any level.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnjustifiedRiskJump`] when the jump is larger than one step and no
/// justification was supplied.
pub fn validate_risk_level_change(
    old: Option<RiskLevel>,
    new: RiskLevel,
    justification: Option<&str>,
) -> AnalyticsResult<RiskLevel> {
    let Some(old) = old else {
        return Ok(new);
    };

    let justified = justification.is_some_and(|text| !text.trim().is_empty());
    if new.steps_from(old) > 1 && !justified {
        return Err(AnalyticsError::UnjustifiedRiskJump { from: old, to: new });
    }

    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> RiskFactors {
        RiskFactors {
            avg_systolic: 100.0,
            avg_glucose: 90.0,
            chronic_conditions_count: 0.0,
            age: 30.0,
            bmi: 22.0,
        }
    }

    #[test]
    fn healthy_factors_score_zero() {
        assert_eq!(score_risk(&healthy()), 0.0);
        assert_eq!(classify_risk(score_risk(&healthy())), RiskLevel::Low);
    }

    #[test]
    fn worst_tiers_reach_clamp_exactly() {
        let factors = RiskFactors {
            avg_systolic: 145.0,
            avg_glucose: 190.0,
            chronic_conditions_count: 3.0,
            age: 70.0,
            bmi: 35.0,
        };
        assert_eq!(score_risk(&factors), 100.0);
    }

    #[test]
    fn score_never_exceeds_clamp() {
        let extreme = RiskFactors {
            avg_systolic: 1_000.0,
            avg_glucose: 1_000.0,
            chronic_conditions_count: 50.0,
            age: 120.0,
            bmi: 80.0,
        };
        let score = score_risk(&extreme);
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn only_highest_matching_tier_applies() {
        let factors = RiskFactors {
            avg_systolic: 150.0,
            ..healthy()
        };
        assert_eq!(score_risk(&factors), 30.0);

        let factors = RiskFactors {
            avg_systolic: 135.0,
            ..healthy()
        };
        assert_eq!(score_risk(&factors), 15.0);
    }

    #[test]
    fn tier_thresholds_are_exclusive() {
        let at_thresholds = RiskFactors {
            avg_systolic: 130.0,
            avg_glucose: 140.0,
            chronic_conditions_count: 0.0,
            age: 55.0,
            bmi: 30.0,
        };
        assert_eq!(score_risk(&at_thresholds), 0.0);

        let underweight_boundary = RiskFactors {
            bmi: 18.5,
            ..healthy()
        };
        assert_eq!(score_risk(&underweight_boundary), 0.0);
    }

    #[test]
    fn bmi_scores_at_both_extremes() {
        let under = RiskFactors {
            bmi: 17.0,
            ..healthy()
        };
        let over = RiskFactors {
            bmi: 31.0,
            ..healthy()
        };
        assert_eq!(score_risk(&under), 10.0);
        assert_eq!(score_risk(&over), 10.0);
    }

    #[test]
    fn factors_add_independently() {
        let factors = RiskFactors {
            avg_systolic: 135.0,
            avg_glucose: 150.0,
            chronic_conditions_count: 1.0,
            age: 60.0,
            bmi: 22.0,
        };
        assert_eq!(score_risk(&factors), 15.0 + 15.0 + 10.0 + 8.0);
        assert_eq!(classify_risk(score_risk(&factors)), RiskLevel::Moderate);
    }

    #[test]
    fn score_is_monotonic_in_each_factor() {
        let steps = [0.0, 1.0, 2.0, 3.0, 50.0, 56.0, 66.0, 131.0, 141.0, 181.0, 500.0];
        let setters: [fn(&mut RiskFactors, f64); 4] = [
            |f, v| f.avg_systolic = v,
            |f, v| f.avg_glucose = v,
            |f, v| f.chronic_conditions_count = v,
            |f, v| f.age = v,
        ];

        for set in setters {
            let mut previous = 0.0;
            for value in steps {
                let mut factors = healthy();
                set(&mut factors, value);
                let score = score_risk(&factors);
                assert!(score >= previous, "score dropped at {value}");
                previous = score;
            }
        }
    }

    #[test]
    fn repeated_scoring_is_identical() {
        let factors = RiskFactors {
            avg_systolic: 137.5,
            avg_glucose: 182.0,
            chronic_conditions_count: 1.0,
            age: 61.0,
            bmi: 17.9,
        };
        let first = score_risk(&factors);
        for _ in 0..3 {
            assert_eq!(score_risk(&factors), first);
            assert_eq!(classify_risk(score_risk(&factors)), RiskLevel::High);
        }
        assert_eq!(assess_risk(&factors), assess_risk(&factors));
    }

    #[test]
    fn classify_risk_band_boundaries() {
        assert_eq!(classify_risk(30.0), RiskLevel::Low);
        assert_eq!(classify_risk(31.0), RiskLevel::Moderate);
        assert_eq!(classify_risk(60.0), RiskLevel::Moderate);
        assert_eq!(classify_risk(61.0), RiskLevel::High);
        assert_eq!(classify_risk(85.0), RiskLevel::High);
        assert_eq!(classify_risk(86.0), RiskLevel::Critical);
    }

    #[test]
    fn classify_risk_accepts_out_of_range_scores() {
        assert_eq!(classify_risk(-10.0), RiskLevel::Low);
        assert_eq!(classify_risk(250.0), RiskLevel::Critical);
        assert_eq!(classify_risk(30.5), RiskLevel::Low);
    }

    #[test]
    fn assessment_lists_contributing_factors_in_table_order() {
        let factors = RiskFactors {
            avg_systolic: 142.0,
            age: 67.0,
            ..healthy()
        };
        let assessment = assess_risk(&factors);
        assert_eq!(assessment.score, 45.0);
        assert_eq!(assessment.level, RiskLevel::Moderate);
        assert_eq!(
            assessment.contributions,
            vec![
                FactorContribution {
                    factor: RiskFactor::Systolic,
                    points: 30.0
                },
                FactorContribution {
                    factor: RiskFactor::Age,
                    points: 15.0
                },
            ]
        );
    }

    #[test]
    fn healthy_assessment_has_no_contributions() {
        let assessment = assess_risk(&healthy());
        assert!(assessment.contributions.is_empty());
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn risk_change_without_previous_level_is_accepted() {
        let level = validate_risk_level_change(None, RiskLevel::Critical, None)
            .expect("first assignment should be accepted");
        assert_eq!(level, RiskLevel::Critical);
    }

    #[test]
    fn single_step_risk_change_needs_no_justification() {
        validate_risk_level_change(Some(RiskLevel::Low), RiskLevel::Moderate, None)
            .expect("one step up should be accepted");
        validate_risk_level_change(Some(RiskLevel::Critical), RiskLevel::High, None)
            .expect("one step down should be accepted");
    }

    #[test]
    fn large_risk_jump_requires_justification() {
        let err = validate_risk_level_change(Some(RiskLevel::Low), RiskLevel::Critical, None)
            .expect_err("should reject unjustified jump");
        assert!(matches!(
            err,
            AnalyticsError::UnjustifiedRiskJump {
                from: RiskLevel::Low,
                to: RiskLevel::Critical
            }
        ));
        assert_eq!(
            err.to_string(),
            "risk level jump from low to critical requires justification"
        );
    }

    #[test]
    fn blank_justification_does_not_count() {
        let err = validate_risk_level_change(Some(RiskLevel::Critical), RiskLevel::Low, Some("  "))
            .expect_err("should reject blank justification");
        assert!(matches!(err, AnalyticsError::UnjustifiedRiskJump { .. }));

        validate_risk_level_change(
            Some(RiskLevel::Critical),
            RiskLevel::Low,
            Some("post-operative review"),
        )
        .expect("justified jump should be accepted");
    }
}
