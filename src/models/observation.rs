//! Observation series — named numeric readings accumulated across notes.

use serde::{Deserialize, Serialize};

/// A named clinical measurement series for one patient.
///
/// Values are appended strictly in the order their source sentences were
/// encountered (by note `source_order`, then position within the note) and
/// are never reordered or deduplicated: repeated readings are independent
/// measurements, not noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub name: String,
    pub values: Vec<String>,
}

impl ObservationSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Render as a summary line: `Blood Count: 300, 400, 700`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.name, self.values.join(", "))
    }
}
