//! Observation extraction — `<name>: <value>` patterns in note text.
//!
//! The recognized name set comes from configuration; matching is
//! case-insensitive with `:` or `-` separators. Values accumulate per
//! observation name across the whole note set, in encounter order, and are
//! never deduplicated: a repeated reading is an independent measurement.

use std::collections::HashMap;

use regex::Regex;

use crate::config::ConfigError;
use crate::models::{Note, ObservationSeries};

/// Scans note text for recognized observation values.
pub struct LabFieldExtractor {
    pattern: Regex,
    squeeze_ws: Regex,
    orphan_punct: Regex,
    doubled_commas: Regex,
}

impl LabFieldExtractor {
    /// Build an extractor over the configured observation names.
    ///
    /// Longer names are matched first so `white blood cell count` is never
    /// shadowed by a shorter alternative like `wbc`.
    pub fn new(names: &[String]) -> Result<Self, ConfigError> {
        let mut alternatives: Vec<String> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Err(ConfigError::EmptyObservationNames);
        }
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()));

        let source = format!(
            r"(?i)\b({})\s*[:\-]\s*(\d+(?:\.\d+)?)",
            alternatives.join("|")
        );
        let pattern = Regex::new(&source)
            .map_err(|e| ConfigError::BadObservationPattern(e.to_string()))?;

        // Fixed literals; cannot fail to compile.
        let squeeze_ws = Regex::new(r"\s{2,}").expect("whitespace pattern is valid");
        let orphan_punct = Regex::new(r"\s+([,.;:!?])").expect("punctuation pattern is valid");
        let doubled_commas = Regex::new(r",{2,}").expect("comma pattern is valid");

        Ok(Self {
            pattern,
            squeeze_ws,
            orphan_punct,
            doubled_commas,
        })
    }

    /// Accumulate observation series across `notes` (ordered by
    /// `source_order`). Series iteration order is first-name-encountered;
    /// values are appended in match order and kept verbatim.
    pub fn extract(&self, notes: &[Note]) -> Vec<ObservationSeries> {
        let mut series: Vec<ObservationSeries> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for note in notes {
            for captures in self.pattern.captures_iter(&note.raw_text) {
                let (Some(name), Some(value)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                let value = value.as_str();
                // Malformed numeric tokens are skipped, never fatal.
                if value.parse::<f64>().is_err() {
                    tracing::debug!(
                        note_id = note.note_id,
                        token = value,
                        "Skipping malformed observation value"
                    );
                    continue;
                }

                let name = title_case(name.as_str());
                let at = *index.entry(name.clone()).or_insert_with(|| {
                    series.push(ObservationSeries::new(name.clone()));
                    series.len() - 1
                });
                series[at].push(value);
            }
        }

        if !series.is_empty() {
            tracing::debug!(
                observations = series.len(),
                "Extracted observation series"
            );
        }

        series
    }

    /// Remove observation mentions from a sentence; the series summary
    /// carries that signal. Returns `None` when nothing meaningful is left.
    pub fn strip(&self, sentence: &str) -> Option<String> {
        let stripped = self.pattern.replace_all(sentence, "");
        let stripped = self.squeeze_ws.replace_all(stripped.trim(), " ");
        let stripped = self.orphan_punct.replace_all(&stripped, "$1");
        let stripped = self.doubled_commas.replace_all(&stripped, ",");

        if stripped.chars().any(char::is_alphanumeric) {
            Some(stripped.into_owned())
        } else {
            None
        }
    }
}

/// `blood count` → `Blood Count`.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientRecord;

    fn extractor() -> LabFieldExtractor {
        let names: Vec<String> = crate::config::DEFAULT_OBSERVATION_NAMES
            .iter()
            .map(|s| s.to_string())
            .collect();
        LabFieldExtractor::new(&names).unwrap()
    }

    fn record(notes: &[&str]) -> PatientRecord {
        let mut record = PatientRecord::new("patient_001");
        for (i, text) in notes.iter().enumerate() {
            record.push_note(format!("note_{i:02}"), *text);
        }
        record
    }

    #[test]
    fn extracts_values_in_encounter_order() {
        let record = record(&[
            "Blood Count: 300. Hemoglobin: 14.0.",
            "Blood Count: 400. Glucose: 95.",
            "Hemoglobin: 13.2. Blood Count: 700.",
        ]);

        let series = extractor().extract(&record.notes);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].render(), "Blood Count: 300, 400, 700");
        assert_eq!(series[1].render(), "Hemoglobin: 14.0, 13.2");
        assert_eq!(series[2].render(), "Glucose: 95");
    }

    #[test]
    fn duplicate_readings_are_kept() {
        let record = record(&["Glucose: 100.", "Glucose: 100."]);
        let series = extractor().extract(&record.notes);
        assert_eq!(series[0].values, vec!["100", "100"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let record = record(&["blood count: 500. HEMOGLOBIN: 12."]);
        let series = extractor().extract(&record.notes);
        assert_eq!(series[0].name, "Blood Count");
        assert_eq!(series[1].name, "Hemoglobin");
    }

    #[test]
    fn dash_separator_accepted() {
        let record = record(&["Potassium - 4.2 noted."]);
        let series = extractor().extract(&record.notes);
        assert_eq!(series[0].render(), "Potassium: 4.2");
    }

    #[test]
    fn unrecognized_names_ignored() {
        let record = record(&["Ferritin: 80. Glucose: 90."]);
        let series = extractor().extract(&record.notes);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Glucose");
    }

    #[test]
    fn non_numeric_value_is_not_a_match() {
        let record = record(&["Glucose: pending. Sodium: 140."]);
        let series = extractor().extract(&record.notes);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Sodium");
    }

    #[test]
    fn longest_name_wins() {
        let names = vec!["wbc".to_string(), "white blood cell count".to_string()];
        let extractor = LabFieldExtractor::new(&names).unwrap();
        let record = record(&["White blood cell count: 7.1."]);
        let series = extractor.extract(&record.notes);
        assert_eq!(series[0].name, "White Blood Cell Count");
    }

    #[test]
    fn strip_removes_mentions_and_tidies() {
        let extractor = extractor();
        assert_eq!(
            extractor.strip("Vitals fine, Blood Count: 300, recheck soon.").as_deref(),
            Some("Vitals fine, recheck soon.")
        );
        assert_eq!(extractor.strip("Blood Count: 300."), None);
    }

    #[test]
    fn strip_keeps_untouched_sentences() {
        let extractor = extractor();
        assert_eq!(
            extractor.strip("Patient feels fine.").as_deref(),
            Some("Patient feels fine.")
        );
    }

    #[test]
    fn empty_name_set_rejected() {
        assert!(matches!(
            LabFieldExtractor::new(&[]),
            Err(ConfigError::EmptyObservationNames)
        ));
        assert!(matches!(
            LabFieldExtractor::new(&["  ".to_string()]),
            Err(ConfigError::EmptyObservationNames)
        ));
    }
}
