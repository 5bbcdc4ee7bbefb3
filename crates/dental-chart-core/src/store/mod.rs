//! Patient store: the command/query surface of the chart.
//!
//! Owns every patient (an arena indexed by patient id), the active-patient
//! selection, the selected surface and the plan filter/search state. Commands
//! act on the active patient only and run to completion, auto-refresh and
//! cost resync included, before returning. Queries always reflect the last
//! completed command.

mod panel;

pub use panel::*;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{is_known_procedure, parse_amount, CostCatalog, CoverageGap, PROCEDURE_OPTIONS};
use crate::config::EngineConfig;
use crate::engine::{ClinicalEngine, CostEstimator, RefreshOutcome};
use crate::models::{
    ClinicalEntry, NewPatientForm, Patient, PlanFilter, PlanTotals, Selection, Surface,
    ToothStatus, TreatmentPlanItem,
};
use crate::plan::{self, ExportSink, PlanProjector, PlanSnapshot};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("No active patient")]
    NoActivePatient,

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory patient store.
pub struct PatientStore {
    config: EngineConfig,
    estimator: CostEstimator,
    patients: Vec<Patient>,
    index: HashMap<String, usize>,
    active: Option<usize>,
    selection: Option<Selection>,
    plan_filter: PlanFilter,
    plan_search: String,
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PatientStore {
    /// Create a store. Seeds the demo patients when configured to.
    pub fn new(config: EngineConfig) -> Self {
        let estimator = CostEstimator::new(CostCatalog::standard(), config.fallback_cost);
        let mut store = Self {
            config,
            estimator,
            patients: Vec::new(),
            index: HashMap::new(),
            active: None,
            selection: None,
            plan_filter: PlanFilter::All,
            plan_search: String::new(),
        };

        if store.config.seed_demo_patients {
            store.seed_demo_patients();
        }

        let gaps = store.coverage_gaps();
        if !gaps.is_empty() {
            let missing: Vec<&str> = gaps.iter().map(|g| g.procedure.as_str()).collect();
            warn!(
                count = gaps.len(),
                ?missing,
                "recommendable procedures missing from the cost catalog; default estimate applies"
            );
        }

        store
    }

    fn seed_demo_patients(&mut self) {
        self.insert_patient("María González", 34, "Female", "Routine checkup", "Active");
        self.insert_patient("Carlos Méndez", 41, "Male", "Post-surgery review", "Follow-up");
        self.active = Some(0);
    }

    fn insert_patient(&mut self, name: &str, age: u32, gender: &str, notes: &str, status: &str) -> usize {
        let idx = self.patients.len();
        let id = self.config.patient_id(idx + 1);
        let patient = Patient::new(
            id.clone(),
            name.to_string(),
            age,
            gender.to_string(),
            notes.to_string(),
            status.to_string(),
        );
        self.patients.push(patient);
        self.index.insert(id, idx);
        idx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    /// Procedure options the cost catalog does not price.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        self.estimator.catalog().coverage_gaps(PROCEDURE_OPTIONS)
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// All patients in creation order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.index.get(id).map(|idx| &self.patients[*idx])
    }

    pub fn active_patient(&self) -> Option<&Patient> {
        self.active.map(|idx| &self.patients[idx])
    }

    /// Create a patient with the next sequential id and make it active.
    ///
    /// A blank name is a no-op.
    pub fn add_patient(&mut self, name: &str, age: u32, gender: &str, notes: &str) -> Option<&Patient> {
        let name = name.trim();
        if name.is_empty() {
            debug!("add_patient ignored: blank name");
            return None;
        }

        let status = self.config.default_patient_status.clone();
        let idx = self.insert_patient(name, age, gender, notes, &status);
        self.active = Some(idx);
        self.selection = None;

        let patient = &self.patients[idx];
        info!(patient = %patient.id, "patient created");
        Some(patient)
    }

    /// Create a patient from raw form input.
    pub fn add_patient_from_form(&mut self, form: &NewPatientForm) -> Option<&Patient> {
        if !form.is_submittable() {
            debug!("add_patient ignored: form not submittable");
            return None;
        }
        self.add_patient(&form.name, form.parsed_age(), &form.gender, &form.notes)
    }

    /// Make a patient active. Clears the surface selection.
    pub fn select_patient(&mut self, id: &str) -> StoreResult<&Patient> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::PatientNotFound(id.to_string()))?;
        self.active = Some(idx);
        self.selection = None;
        debug!(patient = id, "patient selected");
        Ok(&self.patients[idx])
    }

    // =========================================================================
    // Odontogram
    // =========================================================================

    /// Status of a surface of the active patient (normal when untouched).
    pub fn get_surface_status(&self, tooth: &str, surface: Surface) -> ToothStatus {
        self.active_patient()
            .map(|p| p.odontogram.status(tooth, surface))
            .unwrap_or_default()
    }

    /// Advance a surface's status and bring its clinical entry up to date.
    ///
    /// Materializes the entry on first touch; otherwise re-recommends an auto
    /// procedure (and resyncs an auto cost). Selects the surface.
    pub fn cycle_surface(&mut self, tooth: &str, surface: Surface) -> Option<ToothStatus> {
        let idx = self.active?;
        let engine = ClinicalEngine::new(&self.estimator);
        let patient = &mut self.patients[idx];

        let status = patient.odontogram.cycle(tooth, surface);
        if patient.clinical.contains(tooth, surface) {
            match engine.refresh_if_auto(patient, tooth, surface, status) {
                RefreshOutcome::Updated { from, to } => {
                    debug!(patient = %patient.id, tooth, %surface, %from, %to, "procedure re-recommended");
                }
                outcome => debug!(patient = %patient.id, tooth, %surface, ?outcome, "procedure kept"),
            }
        } else {
            let entry = engine.synthesize(status, surface);
            engine.set_entry(patient, tooth, surface, entry);
        }
        patient.touch();
        info!(patient = %patient.id, tooth, %surface, %status, "surface cycled");

        self.selection = Some(Selection {
            tooth: tooth.to_string(),
            surface,
            status,
        });
        Some(status)
    }

    /// Set every surface of a tooth to normal. Clinical entries are kept.
    pub fn reset_tooth(&mut self, tooth: &str) -> Option<&Patient> {
        let idx = self.active?;
        if self.selection.as_ref().is_some_and(|s| s.tooth == tooth) {
            self.selection = None;
        }

        let patient = &mut self.patients[idx];
        patient.odontogram.reset_tooth(tooth);
        patient.touch();
        info!(patient = %patient.id, tooth, "tooth reset");
        Some(patient)
    }

    /// Clear the whole odontogram. Clinical entries are kept.
    pub fn reset_all(&mut self) -> Option<&Patient> {
        let idx = self.active?;
        self.selection = None;

        let patient = &mut self.patients[idx];
        patient.odontogram.reset_all();
        patient.touch();
        info!(patient = %patient.id, "odontogram reset");
        Some(patient)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Focus a surface with its live status.
    pub fn select_surface(&mut self, tooth: &str, surface: Surface) -> Option<&Selection> {
        self.active?;
        let status = self.get_surface_status(tooth, surface);
        self.selection = Some(Selection {
            tooth: tooth.to_string(),
            surface,
            status,
        });
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // =========================================================================
    // Clinical entries
    // =========================================================================

    /// Stored entry or a synthesized one for the live status. Not persisted.
    pub fn get_or_init_clinical_entry(&self, tooth: &str, surface: Surface) -> Option<ClinicalEntry> {
        let patient = self.active_patient()?;
        let status = patient.odontogram.status(tooth, surface);
        Some(ClinicalEngine::new(&self.estimator).get_or_init(patient, tooth, surface, status))
    }

    /// Overwrite an entry. An auto cost follows the entry's procedure.
    pub fn set_clinical_entry(&mut self, tooth: &str, surface: Surface, entry: ClinicalEntry) -> Option<&Patient> {
        let idx = self.active?;
        let engine = ClinicalEngine::new(&self.estimator);
        let patient = &mut self.patients[idx];

        engine.set_entry(patient, tooth, surface, entry);
        patient.touch();
        debug!(patient = %patient.id, tooth, %surface, "clinical entry set");
        Some(patient)
    }

    /// Remove an entry. The surface status is left as is.
    pub fn clear_clinical_entry(&mut self, tooth: &str, surface: Surface) -> Option<ClinicalEntry> {
        let idx = self.active?;
        let patient = &mut self.patients[idx];

        let removed = ClinicalEngine::clear(patient, tooth, surface)?;
        patient.touch();
        info!(patient = %patient.id, tooth, %surface, "clinical entry cleared");

        if self
            .selection
            .as_ref()
            .is_some_and(|s| s.tooth == tooth && s.surface == surface)
        {
            self.selection = None;
        }
        Some(removed)
    }

    /// Edit the (possibly synthesized) entry of a surface and persist it.
    fn edit_entry<F>(&mut self, tooth: &str, surface: Surface, edit: F) -> Option<&ClinicalEntry>
    where
        F: FnOnce(&ClinicalEngine<'_>, ClinicalEntry, ToothStatus) -> ClinicalEntry,
    {
        let idx = self.active?;
        let engine = ClinicalEngine::new(&self.estimator);
        let patient = &mut self.patients[idx];

        let status = patient.odontogram.status(tooth, surface);
        let current = engine.get_or_init(patient, tooth, surface, status);
        let updated = edit(&engine, current, status);
        engine.set_entry(patient, tooth, surface, updated);
        patient.touch();

        patient.clinical.get(tooth, surface)
    }

    /// Change the diagnosis; an auto procedure is re-recommended.
    pub fn set_diagnosis(&mut self, tooth: &str, surface: Surface, diagnosis: &str) -> Option<&ClinicalEntry> {
        self.edit_entry(tooth, surface, |engine, entry, status| {
            engine.with_diagnosis(&entry, diagnosis, status, surface)
        })
    }

    /// Pin a user-picked procedure.
    pub fn pick_procedure(&mut self, tooth: &str, surface: Surface, procedure: &str) -> Option<&ClinicalEntry> {
        if !is_known_procedure(procedure) {
            debug!(tooth, %surface, procedure, "procedure outside the option list");
        }
        self.edit_entry(tooth, surface, |engine, entry, _| {
            engine.with_manual_procedure(&entry, procedure)
        })
    }

    /// Unpin the procedure and take the current recommendation.
    pub fn revert_procedure_to_auto(&mut self, tooth: &str, surface: Surface) -> Option<&ClinicalEntry> {
        self.edit_entry(tooth, surface, |engine, entry, status| {
            engine.with_auto_procedure(&entry, status, surface)
        })
    }

    pub fn set_note(&mut self, tooth: &str, surface: Surface, note: &str) -> Option<&ClinicalEntry> {
        self.edit_entry(tooth, surface, |_, entry, _| ClinicalEntry {
            note: note.to_string(),
            ..entry
        })
    }

    // =========================================================================
    // Cost
    // =========================================================================

    /// Pin fee and minutes of a surface. Values are clamped, never rejected.
    pub fn set_cost_override(&mut self, tooth: &str, surface: Surface, fee: f64, minutes: f64) -> Option<&ClinicalEntry> {
        debug!(tooth, %surface, fee, minutes, "cost override");
        self.edit_entry(tooth, surface, |engine, entry, _| {
            engine.estimator().set_override(&entry, fee, minutes)
        })
    }

    /// Pin fee and minutes from raw text; unparsable text counts as 0.
    pub fn set_cost_override_text(
        &mut self,
        tooth: &str,
        surface: Surface,
        fee: &str,
        minutes: &str,
    ) -> Option<&ClinicalEntry> {
        self.set_cost_override(tooth, surface, parse_amount(fee), parse_amount(minutes))
    }

    /// Drop a cost override and re-estimate from the procedure.
    pub fn revert_cost_to_auto(&mut self, tooth: &str, surface: Surface) -> Option<&ClinicalEntry> {
        debug!(tooth, %surface, "cost reverted to auto");
        self.edit_entry(tooth, surface, |engine, entry, _| {
            engine.estimator().revert_to_auto(&entry)
        })
    }

    // =========================================================================
    // Treatment plan
    // =========================================================================

    pub fn plan_filter(&self) -> PlanFilter {
        self.plan_filter
    }

    pub fn set_plan_filter(&mut self, filter: PlanFilter) {
        self.plan_filter = filter;
    }

    pub fn plan_search(&self) -> &str {
        &self.plan_search
    }

    pub fn set_plan_search(&mut self, text: &str) {
        self.plan_search = text.to_string();
    }

    /// Full plan of the active patient, unfiltered.
    pub fn treatment_plan(&self) -> Vec<TreatmentPlanItem> {
        self.active_patient()
            .map(|p| PlanProjector::new(&self.estimator).build(p))
            .unwrap_or_default()
    }

    /// Plan after the current filter and search.
    pub fn treatment_plan_view(&self) -> Vec<TreatmentPlanItem> {
        self.active_patient()
            .map(|p| PlanProjector::new(&self.estimator).view(p, self.plan_filter, &self.plan_search))
            .unwrap_or_default()
    }

    /// Totals over the current view.
    pub fn treatment_plan_totals(&self) -> PlanTotals {
        plan::totals(&self.treatment_plan_view())
    }

    /// Panel view-model for a selection on the active patient.
    pub fn clinical_panel_view(&self, selection: &Selection) -> Option<ClinicalPanelView> {
        let patient = self.active_patient()?;
        let engine = ClinicalEngine::new(&self.estimator);
        Some(ClinicalPanelView::build(&engine, patient, selection))
    }

    /// Panel view-model for the current selection.
    pub fn clinical_panel(&self) -> Option<ClinicalPanelView> {
        self.clinical_panel_view(self.selection.as_ref()?)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Snapshot of the current view and its totals.
    pub fn export_snapshot(&self) -> StoreResult<PlanSnapshot> {
        let patient = self.active_patient().ok_or(StoreError::NoActivePatient)?;
        let items = self.treatment_plan_view();
        let totals = plan::totals(&items);
        Ok(PlanSnapshot::new(patient, items, totals))
    }

    pub fn export_json(&self) -> StoreResult<String> {
        Ok(self.export_snapshot()?.to_json(self.config.export.pretty)?)
    }

    pub fn export_csv(&self) -> StoreResult<String> {
        Ok(self.export_snapshot()?.to_csv())
    }

    /// Write the JSON export to a sink. Failures are logged and reported as
    /// `false`; store state is unaffected either way.
    pub fn copy_plan_to(&self, sink: &mut dyn ExportSink) -> bool {
        let payload = match self.export_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "plan export failed");
                return false;
            }
        };

        match sink.write(&payload) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "plan export sink failed");
                false
            }
        }
    }
}
