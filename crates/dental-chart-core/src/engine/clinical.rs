//! Clinical entry engine.
//!
//! Materializes, edits and refreshes the per-surface clinical entries of a
//! patient. Auto fields are re-derived here; pinned fields are only replaced
//! by explicit user action.

use crate::models::{ClinicalEntry, CostFigures, Patient, Pinned, Surface, ToothStatus};

use super::cost::CostEstimator;
use super::recommend::{recommended_procedure, EntryTemplate};

/// What [`ClinicalEngine::refresh_if_auto`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No entry recorded for the surface
    NoEntry,
    /// Procedure is pinned by the user
    Pinned,
    /// Recommendation matches the stored procedure
    Unchanged,
    /// Procedure replaced by a new recommendation
    Updated { from: String, to: String },
}

/// Engine over clinical entries, pricing procedures with a [`CostEstimator`].
pub struct ClinicalEngine<'a> {
    estimator: &'a CostEstimator,
}

impl<'a> ClinicalEngine<'a> {
    pub fn new(estimator: &'a CostEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &'a CostEstimator {
        self.estimator
    }

    /// Build a fresh entry for a surface in the given status.
    ///
    /// Diagnosis and note come from the status template, the procedure is
    /// recommended (auto) and the cost follows the procedure (auto).
    pub fn synthesize(&self, status: ToothStatus, surface: Surface) -> ClinicalEntry {
        let template = EntryTemplate::for_status(status, surface);
        let procedure = recommended_procedure(status, &template.diagnosis, surface);

        ClinicalEntry {
            diagnosis: template.diagnosis,
            procedure: Pinned::Auto(procedure.to_string()),
            note: template.note.to_string(),
            cost: Pinned::Auto(self.estimator.auto_figures(procedure)),
        }
    }

    /// The stored entry, or a synthesized one. Does not persist.
    pub fn get_or_init(
        &self,
        patient: &Patient,
        tooth: &str,
        surface: Surface,
        status: ToothStatus,
    ) -> ClinicalEntry {
        match patient.clinical.get(tooth, surface) {
            Some(existing) => existing.clone(),
            None => self.synthesize(status, surface),
        }
    }

    /// Overwrite an entry.
    ///
    /// An auto cost is re-derived from the entry's procedure; pinned figures
    /// are re-clamped and kept.
    pub fn set_entry(&self, patient: &mut Patient, tooth: &str, surface: Surface, entry: ClinicalEntry) {
        let entry = self.normalize(entry);
        patient.clinical.insert(tooth, surface, entry);
    }

    /// Bring an entry's derived cost in line with its procedure.
    pub fn normalize(&self, entry: ClinicalEntry) -> ClinicalEntry {
        let cost = match entry.cost {
            Pinned::Manual(figures) => {
                Pinned::Manual(CostFigures::clamped(figures.fee, figures.minutes as f64))
            }
            Pinned::Auto(_) => Pinned::Auto(self.estimator.auto_figures(entry.procedure_name())),
        };
        ClinicalEntry { cost, ..entry }
    }

    /// Re-recommend the procedure of an existing auto entry for the current
    /// status. Resyncs an auto cost when the procedure changes.
    pub fn refresh_if_auto(
        &self,
        patient: &mut Patient,
        tooth: &str,
        surface: Surface,
        status: ToothStatus,
    ) -> RefreshOutcome {
        let Some(entry) = patient.clinical.get_mut(tooth, surface) else {
            return RefreshOutcome::NoEntry;
        };
        if entry.procedure_manual() {
            return RefreshOutcome::Pinned;
        }

        let recommended = recommended_procedure(status, &entry.diagnosis, surface);
        if entry.procedure_name() == recommended {
            return RefreshOutcome::Unchanged;
        }

        let from = entry.procedure_name().to_string();
        entry.procedure = Pinned::Auto(recommended.to_string());
        if !entry.cost_manual() {
            entry.cost = Pinned::Auto(self.estimator.auto_figures(recommended));
        }

        RefreshOutcome::Updated {
            from,
            to: recommended.to_string(),
        }
    }

    /// Remove an entry. The odontogram is not touched.
    pub fn clear(patient: &mut Patient, tooth: &str, surface: Surface) -> Option<ClinicalEntry> {
        patient.clinical.remove(tooth, surface)
    }

    /// Change the diagnosis; an auto procedure (and auto cost) follows it.
    pub fn with_diagnosis(
        &self,
        entry: &ClinicalEntry,
        diagnosis: &str,
        status: ToothStatus,
        surface: Surface,
    ) -> ClinicalEntry {
        let mut updated = ClinicalEntry {
            diagnosis: diagnosis.to_string(),
            ..entry.clone()
        };
        if !updated.procedure_manual() {
            let recommended = recommended_procedure(status, diagnosis, surface);
            updated.procedure = Pinned::Auto(recommended.to_string());
        }
        self.normalize(updated)
    }

    /// Pin a user-picked procedure.
    pub fn with_manual_procedure(&self, entry: &ClinicalEntry, procedure: &str) -> ClinicalEntry {
        self.normalize(ClinicalEntry {
            procedure: Pinned::Manual(procedure.to_string()),
            ..entry.clone()
        })
    }

    /// Unpin the procedure and take the current recommendation.
    pub fn with_auto_procedure(
        &self,
        entry: &ClinicalEntry,
        status: ToothStatus,
        surface: Surface,
    ) -> ClinicalEntry {
        let recommended = recommended_procedure(status, &entry.diagnosis, surface);
        self.normalize(ClinicalEntry {
            procedure: Pinned::Auto(recommended.to_string()),
            ..entry.clone()
        })
    }
}
