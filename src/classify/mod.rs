pub mod adapter;
pub mod http;
pub mod policy;
pub mod scoring;

pub use adapter::*;
pub use http::*;
pub use policy::*;
pub use scoring::*;

use thiserror::Error;

/// Errors from the classification stage. Recoverable at patient granularity;
/// the orchestrator converts them to failure records and the run continues.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Scoring service is not reachable at {0}")]
    Connection(String),

    #[error("Scoring request timed out after {0}ms")]
    Timeout(u64),

    #[error("Scoring service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed scoring response: {0}")]
    MalformedResponse(String),

    #[error("Scoring confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f32),

    #[error("Unrecognized label {label:?} for patient {patient_id}")]
    UnrecognizedLabel { patient_id: String, label: String },

    #[error("Internal lock error")]
    LockPoisoned,
}
