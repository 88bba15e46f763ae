//! Document assembly — one bounded document per patient.

use serde::{Deserialize, Serialize};

use crate::models::ObservationSeries;

use super::CondenseError;

/// The condensed form of a patient's whole note set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CondensedDocument {
    pub patient_id: String,
    pub deduplicated_text: String,
    pub observation_summary_text: String,
    pub full_text: String,
    pub was_truncated: bool,
}

/// Merges deduplicated prose and the observation summary into one document,
/// enforcing the configured size budget.
pub struct DocumentAssembler {
    max_document_length: usize,
}

impl DocumentAssembler {
    pub fn new(max_document_length: usize) -> Self {
        Self {
            max_document_length,
        }
    }

    /// Assemble the condensed document.
    ///
    /// When over budget, trailing whole sentences are dropped until the
    /// document fits: never mid-word, and never from the observation
    /// summary, since structured readings are higher-value signal than prose
    /// under a length budget. A summary that alone exceeds the budget is
    /// still emitted whole, with `was_truncated` set.
    pub fn assemble(
        &self,
        patient_id: &str,
        sentences: &[String],
        observations: &[ObservationSeries],
    ) -> Result<CondensedDocument, CondenseError> {
        if sentences.is_empty() && observations.is_empty() {
            return Err(CondenseError::EmptyDocument(patient_id.to_string()));
        }

        let summary = observations
            .iter()
            .map(ObservationSeries::render)
            .collect::<Vec<_>>()
            .join("\n");

        let mut kept = sentences.len();
        let mut full_text = compose(&sentences[..kept], &summary);
        let mut was_truncated = false;

        while full_text.len() > self.max_document_length && kept > 0 {
            kept -= 1;
            was_truncated = true;
            full_text = compose(&sentences[..kept], &summary);
        }

        if was_truncated {
            tracing::debug!(
                patient_id,
                dropped_sentences = sentences.len() - kept,
                final_length = full_text.len(),
                "Condensed document truncated to budget"
            );
        }

        // Only an oversized summary can leave the budget exceeded; it is
        // never cut, so flag the document instead.
        if full_text.len() > self.max_document_length {
            was_truncated = true;
        }

        Ok(CondensedDocument {
            patient_id: patient_id.to_string(),
            deduplicated_text: sentences[..kept].join(" "),
            observation_summary_text: summary,
            full_text,
            was_truncated,
        })
    }
}

fn compose(sentences: &[String], summary: &str) -> String {
    let prose = sentences.join(" ");
    match (prose.is_empty(), summary.is_empty()) {
        (false, false) => format!("{prose}\n\n{summary}"),
        (false, true) => prose,
        (true, _) => summary.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[&str]) -> ObservationSeries {
        let mut series = ObservationSeries::new(name);
        for v in values {
            series.push(*v);
        }
        series
    }

    #[test]
    fn merges_prose_and_summary() {
        let assembler = DocumentAssembler::new(500);
        let sentences = vec!["Patient feels fine.".to_string()];
        let observations = vec![
            series("Blood Count", &["300"]),
            series("Hemoglobin", &["12"]),
        ];

        let doc = assembler
            .assemble("patient_001", &sentences, &observations)
            .unwrap();

        assert_eq!(doc.deduplicated_text, "Patient feels fine.");
        assert_eq!(
            doc.observation_summary_text,
            "Blood Count: 300\nHemoglobin: 12"
        );
        assert_eq!(
            doc.full_text,
            "Patient feels fine.\n\nBlood Count: 300\nHemoglobin: 12"
        );
        assert!(!doc.was_truncated);
    }

    #[test]
    fn prose_only_document() {
        let assembler = DocumentAssembler::new(500);
        let sentences = vec!["No acute distress.".to_string()];

        let doc = assembler.assemble("patient_001", &sentences, &[]).unwrap();
        assert_eq!(doc.full_text, "No acute distress.");
        assert!(doc.observation_summary_text.is_empty());
    }

    #[test]
    fn truncation_drops_trailing_sentences_first() {
        let assembler = DocumentAssembler::new(60);
        let sentences = vec![
            "Alpha sentence here.".to_string(),
            "Beta sentence here.".to_string(),
            "Gamma sentence here.".to_string(),
        ];
        let observations = vec![series("Glucose", &["95", "100"])];

        let doc = assembler
            .assemble("patient_001", &sentences, &observations)
            .unwrap();

        assert!(doc.was_truncated);
        assert!(doc.full_text.len() <= 60);
        // Summary is intact; the last sentences are gone.
        assert!(doc.full_text.contains("Glucose: 95, 100"));
        assert!(!doc.full_text.contains("Gamma"));
        assert!(doc.deduplicated_text.starts_with("Alpha"));
    }

    #[test]
    fn summary_is_never_truncated() {
        let assembler = DocumentAssembler::new(200);
        let sentences: Vec<String> = (0..30)
            .map(|i| format!("Filler sentence number {i} with extra words."))
            .collect();
        let observations = vec![series("Blood Count", &["300", "400", "700"])];

        let doc = assembler
            .assemble("patient_001", &sentences, &observations)
            .unwrap();

        assert!(doc.was_truncated);
        assert!(doc.full_text.len() <= 200);
        assert!(doc.full_text.contains("Blood Count: 300, 400, 700"));
    }

    #[test]
    fn oversized_summary_alone_is_flagged_but_whole() {
        let assembler = DocumentAssembler::new(200);
        let values: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let observations = vec![series("Glucose", &value_refs)];

        let doc = assembler.assemble("patient_001", &[], &observations).unwrap();

        assert!(doc.was_truncated);
        assert_eq!(doc.full_text, doc.observation_summary_text);
        assert!(doc.full_text.len() > 200);
    }

    #[test]
    fn empty_condensation_is_an_error() {
        let assembler = DocumentAssembler::new(500);
        let result = assembler.assemble("patient_001", &[], &[]);
        assert!(matches!(result, Err(CondenseError::EmptyDocument(id)) if id == "patient_001"));
    }

    #[test]
    fn untruncated_document_within_budget() {
        let assembler = DocumentAssembler::new(500);
        let sentences = vec!["Short note.".to_string()];
        let doc = assembler.assemble("patient_001", &sentences, &[]).unwrap();
        assert!(doc.full_text.len() <= 500);
        assert!(!doc.was_truncated);
    }
}
