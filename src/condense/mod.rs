pub mod assemble;
pub mod dedup;
pub mod labs;
pub mod redact;
pub mod sentence;

pub use assemble::*;
pub use dedup::*;
pub use labs::*;
pub use redact::*;
pub use sentence::*;

use thiserror::Error;

/// Errors from the condensation stage. Recoverable at patient granularity:
/// the orchestrator records the patient as failed and moves on. Token-level
/// problems (a malformed observation value) never surface here; they are
/// skipped where they occur.
#[derive(Debug, Error)]
pub enum CondenseError {
    #[error("Condensation produced an empty document for patient {0}")]
    EmptyDocument(String),
}
