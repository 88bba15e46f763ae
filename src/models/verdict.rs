//! Verdict and run-result types — what one orchestration pass produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The binary follow-up decision for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpDecision {
    NeedsFollowUp,
    NoFollowUp,
}

impl FollowUpDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsFollowUp => "Needs Follow-up",
            Self::NoFollowUp => "No Follow-up",
        }
    }

    /// The complementary decision.
    pub fn opposite(&self) -> Self {
        match self {
            Self::NeedsFollowUp => Self::NoFollowUp,
            Self::NoFollowUp => Self::NeedsFollowUp,
        }
    }
}

impl std::fmt::Display for FollowUpDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The classification outcome for one patient. Created once per pipeline
/// run; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub patient_id: String,
    pub raw_label: String,
    pub raw_confidence: f32,
    pub decision: FollowUpDecision,
    pub reason: Option<String>,
}

/// The pipeline stage a patient failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Condense,
    Classify,
    Cancelled,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Condense => "condense",
            Self::Classify => "classify",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why one patient produced no verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub patient_id: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// One entry of the run result: a verdict or a failure, never neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatientOutcome {
    Verdict(ClassificationVerdict),
    Failed(FailureRecord),
}

impl PatientOutcome {
    pub fn patient_id(&self) -> &str {
        match self {
            Self::Verdict(v) => &v.patient_id,
            Self::Failed(f) => &f.patient_id,
        }
    }
}

/// Aggregate of one orchestration pass. Contains exactly one outcome per
/// input patient, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcomes: Vec<PatientOutcome>,
}

impl RunResult {
    pub fn verdict_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatientOutcome::Verdict(_)))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.verdict_count()
    }
}
