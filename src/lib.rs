//! Notesieve — condense a patient's clinical notes into one bounded document
//! and classify whether the patient needs follow-up.
//!
//! The pipeline is: redact → split into sentences → deduplicate across the
//! patient's note set → accumulate observation series → assemble one bounded
//! document → score it against a local classification model → map the raw
//! label and confidence to a follow-up verdict. Each patient is independent;
//! a single patient's failure never aborts the run.

pub mod classify;
pub mod condense;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod scoring_service;
pub mod store;
