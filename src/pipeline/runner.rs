//! Patient pipeline — condense → classify → record, fanned out over patients.
//!
//! Each patient moves through the stages independently; any stage failure
//! becomes a failure record for that patient and the run continues. Up to
//! `worker_concurrency` patients are in flight at once, but classification
//! itself is serialized through the scoring service.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::classify::{ClassificationAdapter, ClassificationError, ScoringClient};
use crate::condense::{
    CondenseError, CondensedDocument, Deduplicator, DocumentAssembler, LabFieldExtractor,
    Redactor,
};
use crate::config::{ConfigError, Settings};
use crate::models::{
    FailureRecord, FailureStage, Note, PatientOutcome, PatientRecord, RunResult,
};
use crate::scoring_service::ScoringService;
use crate::store::ResultSink;

/// Orchestrates the full per-patient pipeline.
///
/// Pure pipeline logic with trait-based DI for the scoring collaborator, so
/// the orchestrator is fully testable with mock clients. Construction
/// validates the settings; configuration errors abort before any patient.
pub struct PatientPipeline {
    redactor: Redactor,
    dedup: Deduplicator,
    extractor: LabFieldExtractor,
    assembler: DocumentAssembler,
    adapter: ClassificationAdapter,
    worker_concurrency: usize,
}

impl PatientPipeline {
    pub fn new(
        settings: &Settings,
        client: Box<dyn ScoringClient>,
        service: Arc<ScoringService>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            redactor: Redactor::new(),
            dedup: Deduplicator::new(),
            extractor: LabFieldExtractor::new(&settings.recognized_observation_names)?,
            assembler: DocumentAssembler::new(settings.max_document_length),
            adapter: ClassificationAdapter::new(client, settings.policy.clone(), service),
            worker_concurrency: settings.worker_concurrency,
        })
    }

    /// Condense one patient's notes into a single bounded document.
    ///
    /// Redaction runs first so neither the deduplicated prose nor the
    /// observation summary carries identifying spans. Observation mentions
    /// are stripped from the prose; the summary carries them.
    pub fn condense(&self, record: &PatientRecord) -> Result<CondensedDocument, CondenseError> {
        let redacted: Vec<Note> = record
            .notes
            .iter()
            .map(|note| Note {
                raw_text: self.redactor.redact(&note.raw_text),
                ..note.clone()
            })
            .collect();

        let observations = self.extractor.extract(&redacted);
        let sentences: Vec<String> = self
            .dedup
            .deduplicate(&redacted)
            .iter()
            .filter_map(|sentence| self.extractor.strip(sentence))
            .collect();

        self.assembler
            .assemble(&record.patient_id, &sentences, &observations)
    }

    /// Run one patient through the full state machine:
    /// condense → classify → record. Failures never escape.
    pub fn process(&self, record: &PatientRecord, sink: Option<&ResultSink>) -> PatientOutcome {
        let document = match self.condense(record) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    patient_id = record.patient_id,
                    error = %e,
                    "Condensation failed"
                );
                return PatientOutcome::Failed(FailureRecord {
                    patient_id: record.patient_id.clone(),
                    stage: FailureStage::Condense,
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(
            patient_id = record.patient_id,
            length = document.full_text.len(),
            truncated = document.was_truncated,
            "Condensation complete"
        );

        if let Some(sink) = sink {
            if let Err(e) = sink.write_condensed(&document) {
                tracing::warn!(
                    patient_id = record.patient_id,
                    error = %e,
                    "Failed to persist condensed note — continuing"
                );
            }
        }

        match self.adapter.classify(&document) {
            Ok(verdict) => PatientOutcome::Verdict(verdict),
            Err(e) => {
                let reason = match &e {
                    ClassificationError::Timeout(_) => "timeout".to_string(),
                    other => other.to_string(),
                };
                tracing::warn!(
                    patient_id = record.patient_id,
                    error = %e,
                    "Classification failed"
                );
                PatientOutcome::Failed(FailureRecord {
                    patient_id: record.patient_id.clone(),
                    stage: FailureStage::Classify,
                    reason,
                })
            }
        }
    }

    /// Process every patient with a bounded worker pool.
    ///
    /// The result contains exactly one outcome per input patient, in input
    /// order. Setting `stop` cancels scheduling of further patients:
    /// in-flight patients complete, and unscheduled ones are recorded as
    /// cancelled rather than dropped.
    pub fn run_batch(
        &self,
        patients: &[PatientRecord],
        sink: Option<&ResultSink>,
        stop: &AtomicBool,
    ) -> RunResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let workers = self.worker_concurrency.min(patients.len()).max(1);
        tracing::info!(
            %run_id,
            patients = patients.len(),
            workers,
            "Pipeline run starting"
        );

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, PatientOutcome)>();

        let mut slots: Vec<Option<PatientOutcome>> = Vec::new();
        slots.resize_with(patients.len(), || None);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || loop {
                    let i = next.fetch_add(1, Ordering::SeqCst);
                    if i >= patients.len() {
                        break;
                    }
                    let record = &patients[i];
                    let outcome = if stop.load(Ordering::Relaxed) {
                        PatientOutcome::Failed(FailureRecord {
                            patient_id: record.patient_id.clone(),
                            stage: FailureStage::Cancelled,
                            reason: "cancelled".to_string(),
                        })
                    } else {
                        self.process(record, sink)
                    };
                    let _ = tx.send((i, outcome));
                });
            }
            drop(tx);

            for (i, outcome) in rx {
                slots[i] = Some(outcome);
            }
        });

        let outcomes: Vec<PatientOutcome> = slots
            .into_iter()
            .zip(patients)
            .map(|(slot, record)| {
                slot.unwrap_or_else(|| {
                    PatientOutcome::Failed(FailureRecord {
                        patient_id: record.patient_id.clone(),
                        stage: FailureStage::Cancelled,
                        reason: "cancelled".to_string(),
                    })
                })
            })
            .collect();

        let result = RunResult {
            run_id,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            outcomes,
        };

        tracing::info!(
            %run_id,
            verdicts = result.verdict_count(),
            failures = result.failure_count(),
            duration_ms = result.duration_ms,
            "Pipeline run complete"
        );

        result
    }
}
