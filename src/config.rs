//! Runtime configuration — environment-driven settings with validated defaults.
//!
//! Configuration errors are fatal: `Settings::validate` runs at startup,
//! before any patient is processed. Every other error in the system is
//! absorbed at patient granularity.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classify::policy::DecisionPolicy;

/// Application-level constants
pub const APP_NAME: &str = "Notesieve";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Observation names recognized by default. The set is configuration, not a
/// contract: deployments tune it per facility.
pub const DEFAULT_OBSERVATION_NAMES: &[&str] = &[
    "blood count",
    "hemoglobin",
    "glucose",
    "creatinine",
    "cholesterol",
    "sodium",
    "potassium",
    "wbc",
    "rbc",
    "platelets",
    "hba1c",
    "tsh",
    "hematocrit",
    "white blood cell count",
];

/// Floor for the document budget. A budget below this cannot hold a typical
/// observation summary, which is never truncated.
pub const MIN_DOCUMENT_LENGTH: usize = 200;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info"
}

/// Get the application data directory
/// ~/Notesieve/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(APP_NAME)
}

/// Errors in startup configuration. All fatal — the run never starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Confidence threshold {0} outside [0, 1]")]
    InvalidThreshold(f32),

    #[error("Label decision table is empty")]
    EmptyDecisionTable,

    #[error("Recognized observation name set is empty")]
    EmptyObservationNames,

    #[error("Document budget {0} below minimum {MIN_DOCUMENT_LENGTH}")]
    DocumentBudgetTooSmall(usize),

    #[error("Worker concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Classification timeout must be non-zero")]
    ZeroTimeout,

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Observation pattern failed to compile: {0}")]
    BadObservationPattern(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full configuration surface for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one subdirectory of `.txt` notes per patient.
    pub data_dir: PathBuf,
    /// Directory where the results file and condensed notes are written.
    pub results_dir: PathBuf,
    /// Base URL of the scoring service.
    pub scoring_url: String,
    /// Maximum condensed document size in bytes.
    pub max_document_length: usize,
    /// Observation names the extractor recognizes (case-insensitive).
    pub recognized_observation_names: Vec<String>,
    /// Patients processed concurrently. Classification itself is always
    /// serialized through the scoring service.
    pub worker_concurrency: usize,
    /// Timeout for one scoring call, in milliseconds.
    pub classification_timeout_ms: u64,
    /// Label-to-decision mapping plus confidence threshold.
    pub policy: DecisionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: app_data_dir().join("data"),
            results_dir: app_data_dir().join("results"),
            scoring_url: "http://localhost:8008".to_string(),
            max_document_length: 4000,
            recognized_observation_names: DEFAULT_OBSERVATION_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            worker_concurrency: 1,
            classification_timeout_ms: 30_000,
            policy: DecisionPolicy::default_sentiment(),
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `NOTESIEVE_CONFIG` JSON file if set,
    /// then scalar environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match std::env::var("NOTESIEVE_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                serde_json::from_str(&raw)?
            }
            Err(_) => Self::default(),
        };
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(v) = std::env::var("NOTESIEVE_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("NOTESIEVE_RESULTS_DIR") {
            self.results_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("NOTESIEVE_SCORING_URL") {
            self.scoring_url = v;
        }
        if let Ok(v) = std::env::var("NOTESIEVE_MAX_DOC_LEN") {
            self.max_document_length = parse_env("NOTESIEVE_MAX_DOC_LEN", &v)?;
        }
        if let Ok(v) = std::env::var("NOTESIEVE_CONCURRENCY") {
            self.worker_concurrency = parse_env("NOTESIEVE_CONCURRENCY", &v)?;
        }
        if let Ok(v) = std::env::var("NOTESIEVE_TIMEOUT_MS") {
            self.classification_timeout_ms = parse_env("NOTESIEVE_TIMEOUT_MS", &v)?;
        }
        if let Ok(v) = std::env::var("NOTESIEVE_THRESHOLD") {
            self.policy.confidence_threshold = parse_env("NOTESIEVE_THRESHOLD", &v)?;
        }
        Ok(())
    }

    /// Validate the full surface. Called once at startup; any error aborts
    /// the run before the first patient.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_document_length < MIN_DOCUMENT_LENGTH {
            return Err(ConfigError::DocumentBudgetTooSmall(self.max_document_length));
        }
        if self.recognized_observation_names.is_empty()
            || self
                .recognized_observation_names
                .iter()
                .all(|n| n.trim().is_empty())
        {
            return Err(ConfigError::EmptyObservationNames);
        }
        if self.worker_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.classification_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.policy.validate()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
