//! Centralized scoring access — single point of entry to the shared model.
//!
//! The scoring collaborator is a shared, possibly stateful resource (a
//! loaded model with limited parallel-inference capacity). This service
//! enforces exclusive access: condensation runs freely in parallel, but
//! every classification call holds the guard for its duration.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::classify::ClassificationError;

/// Snapshot of the classification call currently holding the model.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveScore {
    /// Patient whose document is being scored.
    pub patient_id: String,
    /// When the call started (ISO 8601).
    pub started_at: String,
}

/// Exclusive-access controller for the scoring model.
///
/// All classification calls go through `acquire`; the returned guard is held
/// for the whole call and releasing it clears the observable state.
pub struct ScoringService {
    /// Exclusive access lock — only one scoring call at a time.
    lock: Mutex<()>,
    /// What's currently running (observable state).
    current: Mutex<Option<ActiveScore>>,
}

impl ScoringService {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            current: Mutex::new(None),
        }
    }

    /// Acquire exclusive access to the scoring model. Blocks until free.
    pub fn acquire(&self, patient_id: &str) -> Result<ScoringGuard<'_>, ClassificationError> {
        let guard = self
            .lock
            .lock()
            .map_err(|_| ClassificationError::LockPoisoned)?;
        self.set_current(patient_id);
        Ok(ScoringGuard {
            _guard: guard,
            service: self,
        })
    }

    /// Which patient's call currently holds the model, if any.
    pub fn current_score(&self) -> Option<ActiveScore> {
        self.current.lock().ok()?.clone()
    }

    /// Is a scoring call in flight?
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    // ── Internal ────────────────────────────────────────────

    fn set_current(&self, patient_id: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(ActiveScore {
                patient_id: patient_id.to_string(),
                started_at: chrono::Utc::now().to_rfc3339(),
            });
        }
    }

    fn clear_current(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for exclusive scoring access.
///
/// Dropping the guard releases the lock and clears the current call state.
pub struct ScoringGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    service: &'a ScoringService,
}

impl Drop for ScoringGuard<'_> {
    fn drop(&mut self) {
        self.service.clear_current();
    }
}
