//! Decision policy — a configured label table plus confidence threshold.
//!
//! The mapping from raw scoring output to a follow-up verdict is data, not
//! code: swapping or tuning the policy never touches the adapter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::models::FollowUpDecision;

/// Maps a `(label, confidence)` pair to a follow-up decision.
///
/// Each table entry names the decision that applies when the label's
/// confidence is at or above the threshold; below it, the complementary
/// decision applies (a low-confidence reassuring label still warrants
/// follow-up, and vice versa). Labels absent from the table are
/// unrecognized and classification fails for that patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub confidence_threshold: f32,
    pub table: HashMap<String, FollowUpDecision>,
}

impl DecisionPolicy {
    pub fn new(
        confidence_threshold: f32,
        entries: impl IntoIterator<Item = (String, FollowUpDecision)>,
    ) -> Self {
        Self {
            confidence_threshold,
            table: entries.into_iter().collect(),
        }
    }

    /// Default sentiment-style policy: a confident POSITIVE reads as "doing
    /// well" (no follow-up), a confident NEGATIVE as "needs attention".
    pub fn default_sentiment() -> Self {
        Self::new(
            0.8,
            [
                ("POSITIVE".to_string(), FollowUpDecision::NoFollowUp),
                ("NEGATIVE".to_string(), FollowUpDecision::NeedsFollowUp),
            ],
        )
    }

    /// Resolve a decision, or `None` when the label is not in the table.
    /// Lookup is case-insensitive regardless of how the table was built.
    pub fn decide(&self, label: &str, confidence: f32) -> Option<(FollowUpDecision, String)> {
        let at_threshold = self
            .table
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(label))
            .map(|(_, decision)| *decision)?;

        let decision = if confidence >= self.confidence_threshold {
            at_threshold
        } else {
            at_threshold.opposite()
        };

        let reason = format!(
            "{} at {:.2} (threshold {:.2})",
            label.to_uppercase(),
            confidence,
            self.confidence_threshold
        );
        Some((decision, reason))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold(self.confidence_threshold));
        }
        if self.table.is_empty() {
            return Err(ConfigError::EmptyDecisionTable);
        }
        Ok(())
    }
}
