//! Identifying-information redaction.
//!
//! Replaces physician names, patient names, dates of birth, and visit dates
//! with generic placeholders before any text leaves the condensation stage.
//! Pattern-based and best-effort: the downstream classifier needs the
//! clinical content, not the identities.

use regex::Regex;

/// Replaces recognizable identifying spans with placeholders.
pub struct Redactor {
    rules: Vec<(Regex, &'static str)>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    pub fn new() -> Self {
        let rules = [
            // Physician names
            (r"Visited Physician:\s+[A-Z][A-Za-z\s]+", "Visited Physician: [DOCTOR_NAME]"),
            (r"Dr\.\s+[A-Z][A-Za-z]+", "Dr. [DOCTOR_NAME]"),
            // Patient names
            (r"Patient\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?", "Patient [PATIENT_NAME]"),
            // "John Doe (DOB:" / "John Doe was seen by" / "John Doe has a history"
            (
                r"\b[A-Z][a-z]+\s+[A-Z][a-z]+(\s+\(DOB:|\s+was seen by|\s+has a history)",
                "[PATIENT_NAME]$1",
            ),
            // Dates of birth and visit dates
            (r"DOB:\s+\d{4}-\d{2}-\d{2}", "DOB: [DATE_OF_BIRTH]"),
            (r"Date:\s+\d{1,2}/\d{1,2}/\d{4}", "Date: [DATE]"),
            (r"on\s+\d{1,2}/\d{1,2}/\d{4}", "on [DATE]"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            // Fixed literals; cannot fail to compile.
            (
                Regex::new(pattern).expect("redaction pattern is valid"),
                replacement,
            )
        })
        .collect();

        Self { rules }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for (pattern, replacement) in &self.rules {
            redacted = pattern.replace_all(&redacted, *replacement).into_owned();
        }
        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_physician_names() {
        let redactor = Redactor::new();
        assert_eq!(
            redactor.redact("Seen by Dr. Smith today."),
            "Seen by Dr. [DOCTOR_NAME] today."
        );
        assert_eq!(
            redactor.redact("Visited Physician: Jones"),
            "Visited Physician: [DOCTOR_NAME]"
        );
    }

    #[test]
    fn redacts_patient_names() {
        let redactor = Redactor::new();
        assert_eq!(
            redactor.redact("Patient John Doe is recovering."),
            "Patient [PATIENT_NAME] is recovering."
        );
        assert_eq!(
            redactor.redact("John Doe was seen by the nurse."),
            "[PATIENT_NAME] was seen by the nurse."
        );
    }

    #[test]
    fn redacts_dates() {
        let redactor = Redactor::new();
        assert_eq!(
            redactor.redact("DOB: 1985-03-15, Date: 3/15/2024"),
            "DOB: [DATE_OF_BIRTH], Date: [DATE]"
        );
        assert_eq!(
            redactor.redact("Reviewed on 11/2/2023."),
            "Reviewed on [DATE]."
        );
    }

    #[test]
    fn leaves_clinical_content_alone() {
        let redactor = Redactor::new();
        let text = "Blood Count: 500. Vital signs stable.";
        assert_eq!(redactor.redact(text), text);
    }
}
