use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meditrack_core::{load_cohort, AnalyticsConfig, CohortDashboard};

/// Envelope written to stdout for each run.
#[derive(Serialize)]
struct RunOutput<'a> {
    cohort_file: &'a str,
    config: RunConfig,
    dashboard: &'a CohortDashboard,
}

#[derive(Serialize)]
struct RunConfig {
    trend_window_days: u32,
    stable_slope_band: f64,
    sparkline_points: usize,
}

impl From<&AnalyticsConfig> for RunConfig {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            trend_window_days: config.trend_window_days(),
            stable_slope_band: config.stable_slope_band(),
            sparkline_points: config.sparkline_points(),
        }
    }
}

/// Main entry point for the MediTrack dashboard runner
///
/// Loads a cohort file, assesses every patient as of now and prints the cohort dashboard as
/// JSON on stdout. Logs go to stderr.
///
/// # Environment Variables
/// - `MEDITRACK_COHORT_FILE`: cohort file to assess (required, `.json`, `.yaml` or `.yml`)
/// - `MEDITRACK_TREND_WINDOW_DAYS`: trailing window in days (default: 7)
/// - `MEDITRACK_STABLE_SLOPE_BAND`: slope treated as stable (default: 1.0)
/// - `MEDITRACK_SPARKLINE_POINTS`: points kept per sparkline (default: 14)
/// - `RUST_LOG`: additional tracing directives
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meditrack=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AnalyticsConfig::from_env_values(
        std::env::var("MEDITRACK_TREND_WINDOW_DAYS").ok(),
        std::env::var("MEDITRACK_STABLE_SLOPE_BAND").ok(),
        std::env::var("MEDITRACK_SPARKLINE_POINTS").ok(),
    )?;

    let cohort_file: PathBuf = std::env::var("MEDITRACK_COHORT_FILE")
        .context("MEDITRACK_COHORT_FILE must point at a cohort file")?
        .into();

    tracing::info!(
        "++ Assessing cohort {} over {} days",
        cohort_file.display(),
        config.trend_window_days()
    );

    let snapshots = load_cohort(&cohort_file)
        .with_context(|| format!("loading cohort from {}", cohort_file.display()))?;
    let dashboard = CohortDashboard::build(&snapshots, &config, chrono::Utc::now())?;

    if dashboard.critical_alerts > 0 {
        tracing::warn!(
            alerts = dashboard.critical_alerts,
            "patients at high or critical risk"
        );
    }

    let cohort_file = cohort_file.display().to_string();
    let output = RunOutput {
        cohort_file: &cohort_file,
        config: RunConfig::from(&config),
        dashboard: &dashboard,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
