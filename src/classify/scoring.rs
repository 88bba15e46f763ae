//! Scoring collaborator contract.

use serde::{Deserialize, Serialize};

use super::ClassificationError;

/// Raw output of the scoring model: a label and a confidence in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub label: String,
    pub confidence: f32,
}

/// Scoring model abstraction (allows mocking).
///
/// Implementations must accept text up to the assembler's configured maximum
/// length; the assembler enforces that bound before any call lands here.
pub trait ScoringClient: Send + Sync {
    fn score(&self, text: &str) -> Result<Score, ClassificationError>;
}

/// Mock scoring client for testing — returns a configurable score.
pub struct MockScoringClient {
    score: Score,
}

impl MockScoringClient {
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            score: Score {
                label: label.to_string(),
                confidence,
            },
        }
    }
}

impl ScoringClient for MockScoringClient {
    fn score(&self, _text: &str) -> Result<Score, ClassificationError> {
        Ok(self.score.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_score() {
        let client = MockScoringClient::new("POSITIVE", 0.95);
        let score = client.score("any text").unwrap();
        assert_eq!(score.label, "POSITIVE");
        assert_eq!(score.confidence, 0.95);
    }

    #[test]
    fn score_serde_roundtrip() {
        let score = Score {
            label: "NEGATIVE".into(),
            confidence: 0.42,
        };
        let json = serde_json::to_string(&score).unwrap();
        let parsed: Score = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.label, "NEGATIVE");
        assert_eq!(parsed.confidence, 0.42);
    }
}
