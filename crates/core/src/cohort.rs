//! Cohort files.
//!
//! A cohort file is a JSON or YAML array of [`PatientSnapshot`]s, as exported by the dashboard
//! backend. Readings may use either the snake-case names or the intake form names
//! (`timestamp`, `blood_pressure_systolic`, `blood_glucose`, ...).
//!
//! Parsing uses `serde_path_to_error` so a schema mismatch names the failing field (for example
//! `[2].vitals[0].recorded_at`) instead of only a line number.

use crate::patient::PatientSnapshot;
use crate::{AnalyticsError, AnalyticsResult};
use std::path::Path;

/// Supported cohort serialisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortFormat {
    Json,
    Yaml,
}

impl CohortFormat {
    /// Infers the format from a file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> AnalyticsResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(CohortFormat::Json),
            Some("yaml") | Some("yml") => Ok(CohortFormat::Yaml),
            _ => Err(AnalyticsError::UnsupportedFormat(format!(
                "{} (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Parses cohort text in the given format.
///
/// # Errors
///
/// Returns [`AnalyticsError::Schema`] with the path of the first field that does not match the
/// snapshot schema, or with path `<root>` when JSON text follows the cohort array.
pub fn parse_cohort(text: &str, format: CohortFormat) -> AnalyticsResult<Vec<PatientSnapshot>> {
    match format {
        CohortFormat::Json => {
            let mut deserializer = serde_json::Deserializer::from_str(text);
            let snapshots =
                serde_path_to_error::deserialize::<_, Vec<PatientSnapshot>>(&mut deserializer)
                    .map_err(|err| schema_error(err.path().to_string(), err.into_inner()))?;
            // Anything after the top-level array means a truncated or concatenated export.
            deserializer
                .end()
                .map_err(|err| schema_error(String::new(), err))?;
            Ok(snapshots)
        }
        CohortFormat::Yaml => {
            let deserializer = serde_yaml::Deserializer::from_str(text);
            serde_path_to_error::deserialize::<_, Vec<PatientSnapshot>>(deserializer)
                .map_err(|err| schema_error(err.path().to_string(), err.into_inner()))
        }
    }
}

fn schema_error(path: String, source: impl std::fmt::Display) -> AnalyticsError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    AnalyticsError::Schema {
        path,
        message: source.to_string(),
    }
}

/// Reads and parses a cohort file, inferring the format from its extension.
///
/// # Errors
///
/// Returns an error if:
/// - the extension is not a supported format,
/// - the file cannot be read,
/// - the contents do not match the snapshot schema.
pub fn load_cohort(path: &Path) -> AnalyticsResult<Vec<PatientSnapshot>> {
    let format = CohortFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(AnalyticsError::FileRead)?;
    let snapshots = parse_cohort(&text, format)?;
    tracing::info!(
        path = %path.display(),
        patients = snapshots.len(),
        "loaded cohort"
    );
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON_COHORT: &str = r#"[
  {
    "id": "7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88",
    "age": 72,
    "bmi": 31.2,
    "chronic_conditions": ["copd"],
    "vitals": [
      { "recorded_at": "2026-03-09T08:00:00Z", "systolic": 148, "heart_rate": 88 }
    ]
  },
  {
    "id": "a4f91c6d-3b2e-4c5f-9d7a-1e8b6c0a9f12",
    "age": 34
  }
]"#;

    const YAML_COHORT: &str = r#"- id: 7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88
  age: 72
  previous_risk_level: moderate
  vitals:
    - recorded_at: "2026-03-09T08:00:00Z"
      glucose: 182
"#;

    #[test]
    fn parses_json_cohort() {
        let cohort = parse_cohort(JSON_COHORT, CohortFormat::Json).expect("parse json");
        assert_eq!(cohort.len(), 2);
        assert_eq!(cohort[0].vitals[0].systolic, Some(148.0));
        assert_eq!(cohort[0].vitals[0].diastolic, None);
        assert!(cohort[1].vitals.is_empty());
    }

    #[test]
    fn parses_yaml_cohort() {
        let cohort = parse_cohort(YAML_COHORT, CohortFormat::Yaml).expect("parse yaml");
        assert_eq!(cohort.len(), 1);
        assert_eq!(
            cohort[0].previous_risk_level,
            Some(meditrack_types::RiskLevel::Moderate)
        );
        assert_eq!(cohort[0].vitals[0].glucose, Some(182.0));
    }

    #[test]
    fn schema_errors_name_the_failing_field() {
        let broken = JSON_COHORT.replace("\"age\": 34", "\"age\": \"thirty-four\"");
        let err = parse_cohort(&broken, CohortFormat::Json).expect_err("should reject text age");
        match err {
            AnalyticsError::Schema { path, .. } => assert_eq!(path, "[1].age"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn yaml_schema_errors_name_the_failing_field() {
        let broken = YAML_COHORT.replace("glucose: 182", "glucose: high");
        let err = parse_cohort(&broken, CohortFormat::Yaml).expect_err("should reject text glucose");
        match err {
            AnalyticsError::Schema { path, .. } => assert!(path.contains("glucose"), "{path}"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn trailing_content_is_rejected() {
        let concatenated = format!("{JSON_COHORT} {{\"oops\": true");
        let err = parse_cohort(&concatenated, CohortFormat::Json)
            .expect_err("should reject text after the cohort array");
        match err {
            AnalyticsError::Schema { path, message } => {
                assert_eq!(path, "<root>");
                assert!(message.contains("trailing"), "{message}");
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn trailing_whitespace_is_accepted() {
        let padded = format!("{JSON_COHORT}\n\n");
        let cohort = parse_cohort(&padded, CohortFormat::Json).expect("parse padded json");
        assert_eq!(cohort.len(), 2);
    }

    #[test]
    fn accepts_intake_form_field_names() {
        let json = r#"[{
          "id": "7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88",
          "age": 58,
          "vitals": [{
            "timestamp": "2026-03-09T08:00:00Z",
            "blood_pressure_systolic": 120,
            "blood_pressure_diastolic": 80,
            "blood_glucose": 98
          }]
        }]"#;
        let cohort = parse_cohort(json, CohortFormat::Json).expect("parse intake names");
        let reading = &cohort[0].vitals[0];
        assert_eq!(reading.systolic, Some(120.0));
        assert_eq!(reading.diastolic, Some(80.0));
        assert_eq!(reading.glucose, Some(98.0));
        assert_eq!(reading.recorded_at.to_rfc3339(), "2026-03-09T08:00:00+00:00");
    }

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(
            CohortFormat::from_path(Path::new("cohort.JSON")).expect("json"),
            CohortFormat::Json
        );
        assert_eq!(
            CohortFormat::from_path(Path::new("ward/cohort.yml")).expect("yml"),
            CohortFormat::Yaml
        );
        let err = CohortFormat::from_path(Path::new("cohort.csv")).expect_err("csv unsupported");
        assert!(matches!(err, AnalyticsError::UnsupportedFormat(msg) if msg.contains("cohort.csv")));
    }

    #[test]
    fn loads_cohort_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create temp file");
        file.write_all(JSON_COHORT.as_bytes()).expect("write cohort");

        let cohort = load_cohort(file.path()).expect("load cohort");
        assert_eq!(cohort.len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_cohort(&dir.path().join("absent.yaml")).expect_err("should fail to read");
        assert!(matches!(err, AnalyticsError::FileRead(_)));
    }
}
