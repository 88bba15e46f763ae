//! Sentence-level deduplication across a patient's whole note set.
//!
//! Clinical notes for one patient repeat themselves heavily (templated
//! phrases, copy-forwarded assessments). Each sentence is emitted exactly once
//! the first time its normalized form is seen, in first-seen order.

use std::collections::HashSet;

use crate::models::Note;

use super::sentence::SentenceSplitter;

/// Removes sentences already seen for a patient, preserving the original
/// casing and punctuation of the first occurrence.
pub struct Deduplicator {
    splitter: SentenceSplitter,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator {
    pub fn new() -> Self {
        Self {
            splitter: SentenceSplitter::new(),
        }
    }

    /// Deduplicate across `notes`, which must be ordered by `source_order`.
    ///
    /// Two sentences are duplicates when their normalized forms (case-folded,
    /// whitespace-collapsed) are equal; any other character difference makes
    /// them distinct. Output order is first-seen order, never sorted.
    pub fn deduplicate(&self, notes: &[Note]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique = Vec::new();

        for note in notes {
            for sentence in self.splitter.split(&note.raw_text) {
                if seen.insert(normalize(sentence)) {
                    unique.push(sentence.to_string());
                }
            }
        }

        tracing::debug!(
            notes = notes.len(),
            unique_sentences = unique.len(),
            "Deduplicated note set"
        );

        unique
    }
}

/// Normalized comparison form: lowercase, internal whitespace collapsed.
fn normalize(sentence: &str) -> String {
    sentence
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
