//! Note loading — one subdirectory of `.txt` notes per patient.

use std::path::Path;

use crate::models::PatientRecord;

use super::StoreError;

/// Load every patient under `data_dir`.
///
/// Each subdirectory is a patient id; its `.txt` files are that patient's
/// notes, ordered by filename (discovery order is `source_order`). Patients
/// are returned in directory-name order so runs are deterministic. A patient
/// directory with no readable notes still yields a record, so the pipeline
/// reports it as a failure rather than dropping the patient silently.
pub fn load_patients(data_dir: &Path) -> Result<Vec<PatientRecord>, StoreError> {
    if !data_dir.is_dir() {
        return Err(StoreError::MissingDataDir(data_dir.to_path_buf()));
    }

    let mut patient_dirs: Vec<_> = std::fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .collect();
    patient_dirs.sort_by_key(|entry| entry.file_name());

    let mut patients = Vec::with_capacity(patient_dirs.len());

    for dir in patient_dirs {
        let patient_id = dir.file_name().to_string_lossy().into_owned();
        let mut record = PatientRecord::new(&patient_id);

        let mut note_files: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        note_files.sort();

        for path in note_files {
            match std::fs::read_to_string(&path) {
                Ok(raw_text) => {
                    let note_id = path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    record.push_note(note_id, raw_text);
                }
                Err(e) => {
                    tracing::warn!(
                        patient_id,
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable note"
                    );
                }
            }
        }

        tracing::debug!(patient_id, notes = record.notes.len(), "Loaded patient");
        patients.push(record);
    }

    tracing::info!(
        patients = patients.len(),
        data_dir = %data_dir.display(),
        "Loaded patient note sets"
    );

    Ok(patients)
}
