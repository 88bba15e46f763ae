//! Result persistence — the run's results file and per-patient condensed notes.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::condense::CondensedDocument;
use crate::models::{PatientOutcome, RunResult};

use super::StoreError;

/// Default name of the per-run results file.
pub const RESULTS_FILENAME: &str = "follow_up_results.txt";

/// Writes verdicts and condensed documents under a results directory.
pub struct ResultSink {
    results_dir: PathBuf,
}

impl ResultSink {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Write one line per patient: `<patient_id>: <decision>` for verdicts,
    /// `<patient_id>: ERROR - <reason>` for failures. Returns the file path.
    pub fn write_results(&self, result: &RunResult) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.results_dir)?;
        let path = self.results_dir.join(RESULTS_FILENAME);
        let mut file = std::fs::File::create(&path)?;

        for outcome in &result.outcomes {
            match outcome {
                PatientOutcome::Verdict(v) => {
                    writeln!(file, "{}: {}", v.patient_id, v.decision)?;
                }
                PatientOutcome::Failed(f) => {
                    writeln!(file, "{}: ERROR - {}", f.patient_id, f.reason)?;
                }
            }
        }

        tracing::info!(path = %path.display(), "Results written");
        Ok(path)
    }

    /// Write a patient's condensed document to `condensed/<patient_id>.txt`.
    pub fn write_condensed(&self, document: &CondensedDocument) -> Result<PathBuf, StoreError> {
        let dir = self.results_dir.join("condensed");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.txt", document.patient_id));
        std::fs::write(&path, &document.full_text)?;

        tracing::debug!(
            patient_id = document.patient_id,
            path = %path.display(),
            "Condensed note written"
        );
        Ok(path)
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }
}
