//! Classification adapter — condensed document in, follow-up verdict out.

use std::sync::Arc;

use crate::condense::CondensedDocument;
use crate::models::ClassificationVerdict;
use crate::scoring_service::ScoringService;

use super::policy::DecisionPolicy;
use super::scoring::ScoringClient;
use super::ClassificationError;

/// Sends a condensed document to the scoring collaborator and maps its raw
/// output to a domain verdict via the configured policy.
///
/// The adapter never defaults silently: an unrecognized label or a failing
/// collaborator is a classification failure carrying the patient id.
pub struct ClassificationAdapter {
    client: Box<dyn ScoringClient>,
    policy: DecisionPolicy,
    service: Arc<ScoringService>,
}

impl ClassificationAdapter {
    pub fn new(
        client: Box<dyn ScoringClient>,
        policy: DecisionPolicy,
        service: Arc<ScoringService>,
    ) -> Self {
        Self {
            client,
            policy,
            service,
        }
    }

    /// Classify one condensed document.
    ///
    /// Access to the scoring model is serialized: the exclusive guard is
    /// held for the whole call.
    pub fn classify(
        &self,
        document: &CondensedDocument,
    ) -> Result<ClassificationVerdict, ClassificationError> {
        let score = {
            let _guard = self.service.acquire(&document.patient_id)?;
            self.client.score(&document.full_text)?
        };

        let (decision, reason) = self
            .policy
            .decide(&score.label, score.confidence)
            .ok_or_else(|| ClassificationError::UnrecognizedLabel {
                patient_id: document.patient_id.clone(),
                label: score.label.clone(),
            })?;

        tracing::info!(
            patient_id = document.patient_id,
            label = score.label,
            confidence = score.confidence,
            decision = decision.as_str(),
            "Classification complete"
        );

        Ok(ClassificationVerdict {
            patient_id: document.patient_id.clone(),
            raw_label: score.label,
            raw_confidence: score.confidence,
            decision,
            reason: Some(reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::scoring::MockScoringClient;
    use crate::models::FollowUpDecision;

    fn document(patient_id: &str) -> CondensedDocument {
        CondensedDocument {
            patient_id: patient_id.to_string(),
            deduplicated_text: "Patient feels fine.".into(),
            observation_summary_text: "Blood Count: 300".into(),
            full_text: "Patient feels fine.\n\nBlood Count: 300".into(),
            was_truncated: false,
        }
    }

    fn adapter(client: Box<dyn ScoringClient>) -> ClassificationAdapter {
        ClassificationAdapter::new(
            client,
            DecisionPolicy::default_sentiment(),
            Arc::new(ScoringService::new()),
        )
    }

    #[test]
    fn confident_positive_yields_no_follow_up() {
        let adapter = adapter(Box::new(MockScoringClient::new("POSITIVE", 0.95)));
        let verdict = adapter.classify(&document("patient_001")).unwrap();

        assert_eq!(verdict.decision, FollowUpDecision::NoFollowUp);
        assert_eq!(verdict.raw_label, "POSITIVE");
        assert_eq!(verdict.raw_confidence, 0.95);
        assert!(verdict.reason.as_deref().unwrap().contains("0.95"));
    }

    #[test]
    fn unrecognized_label_fails_with_patient_id() {
        let adapter = adapter(Box::new(MockScoringClient::new("NEUTRAL", 0.9)));
        let err = adapter.classify(&document("patient_042")).unwrap_err();

        match err {
            ClassificationError::UnrecognizedLabel { patient_id, label } => {
                assert_eq!(patient_id, "patient_042");
                assert_eq!(label, "NEUTRAL");
            }
            other => panic!("expected UnrecognizedLabel, got {other}"),
        }
    }

    #[test]
    fn collaborator_failure_propagates() {
        struct FailingClient;
        impl ScoringClient for FailingClient {
            fn score(&self, _text: &str) -> Result<crate::classify::Score, ClassificationError> {
                Err(ClassificationError::Timeout(5_000))
            }
        }

        let adapter = adapter(Box::new(FailingClient));
        let err = adapter.classify(&document("patient_001")).unwrap_err();
        assert!(matches!(err, ClassificationError::Timeout(5_000)));
    }

    #[test]
    fn guard_is_released_after_classification() {
        let service = Arc::new(ScoringService::new());
        let adapter = ClassificationAdapter::new(
            Box::new(MockScoringClient::new("POSITIVE", 0.9)),
            DecisionPolicy::default_sentiment(),
            service.clone(),
        );

        adapter.classify(&document("patient_001")).unwrap();
        assert!(!service.is_busy());
    }
}
