use crate::vitals::VitalKind;
use meditrack_types::RiskLevel;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "{label} must be between {min} and {max} {unit} (got {value})",
        label = kind.label(),
        unit = kind.unit()
    )]
    ImplausibleVital {
        kind: VitalKind,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("risk level jump from {from} to {to} requires justification")]
    UnjustifiedRiskJump { from: RiskLevel, to: RiskLevel },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("patient {id}: {source}")]
    Patient {
        id: uuid::Uuid,
        #[source]
        source: Box<AnalyticsError>,
    },

    #[error("failed to read cohort file: {0}")]
    FileRead(std::io::Error),
    #[error("unsupported cohort file format: {0}")]
    UnsupportedFormat(String),
    #[error("cohort schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },
}

pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;
