use clap::{Parser, Subcommand};
use meditrack_core::{
    assess_risk, average, calculate_bmi, classify_risk, count_anomalies, estimate_trend,
    load_cohort, percentage_change, trend_direction, validate_risk_level_change, validate_vital,
    vital_status, AnalyticsConfig, CohortDashboard, RiskFactors, RiskLevel, VitalKind,
};
use meditrack_core::constants::NEUTRAL_BMI;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meditrack")]
#[command(about = "MediTrack clinical analytics CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trend percentage and direction of a series
    Trend {
        /// Readings, oldest first (comma-separated)
        #[arg(value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Arithmetic mean of a series
    Average {
        /// Readings (comma-separated)
        #[arg(value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Percentage change between two KPI values
    Change { current: f64, previous: f64 },
    /// Composite risk score with per-factor points
    Score {
        #[arg(long, default_value_t = 0.0)]
        systolic: f64,
        #[arg(long, default_value_t = 0.0)]
        glucose: f64,
        /// Number of chronic conditions
        #[arg(long, default_value_t = 0.0)]
        conditions: f64,
        #[arg(long, default_value_t = 0.0)]
        age: f64,
        /// Body-mass index; unknown BMI scores as neutral
        #[arg(long, default_value_t = NEUTRAL_BMI)]
        bmi: f64,
    },
    /// Risk level for a score
    Classify { score: f64 },
    /// Check a risk level change against the previous level
    LevelChange {
        /// Previously recorded level (low, moderate, high, critical)
        previous: RiskLevel,
        /// Proposed level
        proposed: RiskLevel,
        /// Clinical justification for a jump of more than one level
        #[arg(long)]
        justification: Option<String>,
    },
    /// Count readings outside the normal status for a vital sign
    Anomalies {
        /// Vital sign (e.g. systolic, heart_rate, spo2)
        kind: VitalKind,
        /// Readings (comma-separated)
        #[arg(value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Body mass index from weight (kg) and height (m)
    Bmi { weight_kg: f64, height_m: f64 },
    /// Status of a single vital sign reading
    VitalStatus { kind: VitalKind, value: f64 },
    /// Check a vital sign reading is physiologically plausible
    ValidateVital { kind: VitalKind, value: f64 },
    /// Assess a cohort file and print the dashboard as JSON
    Assess {
        /// Cohort file (.json, .yaml or .yml)
        path: PathBuf,
        /// Trailing window in days
        #[arg(long)]
        window_days: Option<u32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Trend { values }) => {
            println!("{}", trend_line(&values));
        }
        Some(Commands::Average { values }) => {
            println!("Average: {:.2}", average(&values));
        }
        Some(Commands::Change { current, previous }) => {
            let change = percentage_change(current, previous);
            println!("Change: {:.1}% ({:?})", change.percent, change.direction);
        }
        Some(Commands::Score {
            systolic,
            glucose,
            conditions,
            age,
            bmi,
        }) => {
            let assessment = assess_risk(&RiskFactors {
                avg_systolic: systolic,
                avg_glucose: glucose,
                chronic_conditions_count: conditions,
                age,
                bmi,
            });
            println!("Score: {} ({})", assessment.score, assessment.level);
            for contribution in assessment.contributions {
                println!("  {:?}: {}", contribution.factor, contribution.points);
            }
        }
        Some(Commands::Classify { score }) => {
            println!("{}", classify_risk(score));
        }
        Some(Commands::LevelChange {
            previous,
            proposed,
            justification,
        }) => match validate_risk_level_change(Some(previous), proposed, justification.as_deref())
        {
            Ok(level) => println!("Accepted risk level: {}", level),
            Err(e) => eprintln!("Rejected: {}", e),
        },
        Some(Commands::Anomalies { kind, values }) => {
            let anomalies = count_anomalies(&values, |value| vital_status(kind, value));
            println!("{} of {} {} readings anomalous", anomalies, values.len(), kind);
        }
        Some(Commands::Bmi {
            weight_kg,
            height_m,
        }) => match calculate_bmi(weight_kg, height_m) {
            Ok(bmi) => println!("BMI: {}", bmi),
            Err(e) => eprintln!("Error calculating BMI: {}", e),
        },
        Some(Commands::VitalStatus { kind, value }) => {
            println!("{} {} {}: {}", kind.label(), value, kind.unit(), vital_status(kind, value));
        }
        Some(Commands::ValidateVital { kind, value }) => match validate_vital(kind, value) {
            Ok(value) => println!("{} {} {} is plausible", kind.label(), value, kind.unit()),
            Err(e) => eprintln!("Implausible reading: {}", e),
        },
        Some(Commands::Assess { path, window_days }) => {
            let defaults = AnalyticsConfig::default();
            let config = AnalyticsConfig::new(
                window_days.unwrap_or(defaults.trend_window_days()),
                defaults.stable_slope_band(),
                defaults.sparkline_points(),
            )?;
            let snapshots = load_cohort(&path)?;
            let dashboard = CohortDashboard::build(&snapshots, &config, chrono::Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        None => {
            println!("Use 'meditrack --help' for commands");
        }
    }

    Ok(())
}

fn trend_line(values: &[f64]) -> String {
    let direction = trend_direction(values);
    format!(
        "Trend: {:.1}% {} ({})",
        estimate_trend(values),
        direction.arrow(),
        direction
    )
}
