//! Dental Chart Core Library
//!
//! Clinical-state engine for a dental chart: odontogram, per-surface clinical
//! entries, cost estimation and a derived treatment plan.
//!
//! # Architecture
//!
//! ```text
//!   cycle surface ──► Odontogram ──status──┐
//!                                          ▼
//!   panel edits ───────────────► Clinical Entry Engine ──procedure──► Cost Estimator
//!                                          │                              │
//!                                          └───────────┬──────────────────┘
//!                                                      ▼
//!                                         Treatment Plan Projector
//!                                        (filter → search → totals)
//!                                                      │
//!                                      ┌───────────────┼───────────────┐
//!                                      ▼               ▼               ▼
//!                                 Plan view        JSON export     CSV export
//! ```
//!
//! # Core Principle
//!
//! **Derived fields stay derived until a user pins them.** An auto procedure
//! follows the surface status and diagnosis; an auto cost follows the
//! procedure. A manual value is only replaced by an explicit revert.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Surface, ToothStatus, Odontogram, ClinicalEntry, Patient, etc.)
//! - [`catalog`]: Static catalogs, cost table and clamp/format helpers
//! - [`engine`]: Recommendation, clinical entry engine and cost estimation
//! - [`plan`]: Treatment plan projection and export
//! - [`store`]: Patient store (command/query surface)
//! - [`config`]: TOML configuration
//! - [`logging`]: tracing subscriber setup

pub mod catalog;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod plan;
pub mod store;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{ClinicalEngine, CostEstimator};
pub use models::{
    ClinicalEntry, CostFigures, Odontogram, Patient, Pinned, PlanFilter, PlanTotals, Selection,
    Surface, ToothStatus, TreatmentPlanItem,
};
pub use plan::{ExportSink, PlanProjector, PlanSnapshot};
pub use store::{ClinicalPanelView, PatientStore};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use catalog::{CostCatalog, ToothLayout};
use models::CostEstimate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DentalChartError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<store::StoreError> for DentalChartError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::PatientNotFound(id) => DentalChartError::NotFound(id),
            store::StoreError::NoActivePatient => DentalChartError::NotFound("active patient".into()),
            store::StoreError::Serialization(e) => DentalChartError::SerializationError(e.to_string()),
        }
    }
}

impl From<config::ConfigError> for DentalChartError {
    fn from(e: config::ConfigError) -> Self {
        DentalChartError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for DentalChartError {
    fn from(e: serde_json::Error) -> Self {
        DentalChartError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DentalChartError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DentalChartError::Internal(format!("Lock poisoned: {}", e))
    }
}

fn parse_surface(code: &str) -> Result<Surface, DentalChartError> {
    Surface::from_code(code)
        .ok_or_else(|| DentalChartError::InvalidInput(format!("unknown surface code: {}", code)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a chart with the default configuration (demo patients seeded).
#[uniffi::export]
pub fn open_chart() -> Arc<DentalChart> {
    Arc::new(DentalChart {
        store: Arc::new(Mutex::new(PatientStore::default())),
    })
}

/// Open a chart configured from TOML text.
#[uniffi::export]
pub fn open_chart_with_config(toml: String) -> Result<Arc<DentalChart>, DentalChartError> {
    let config = EngineConfig::from_toml_str(&toml)?;
    Ok(Arc::new(DentalChart {
        store: Arc::new(Mutex::new(PatientStore::new(config))),
    }))
}

/// FDI layout of the chart.
#[uniffi::export]
pub fn tooth_layout() -> FfiToothLayout {
    ToothLayout::fdi().into()
}

/// Diagnosis options offered by the clinical panel.
#[uniffi::export]
pub fn diagnosis_options() -> Vec<String> {
    catalog::diagnosis_options().into_iter().map(String::from).collect()
}

/// Procedure options offered by the clinical panel.
#[uniffi::export]
pub fn procedure_options() -> Vec<String> {
    catalog::PROCEDURE_OPTIONS.iter().map(|p| p.to_string()).collect()
}

/// Cost table rows, sorted by procedure.
#[uniffi::export]
pub fn cost_catalog() -> Vec<FfiCostRow> {
    let catalog = CostCatalog::standard();
    catalog
        .procedures()
        .into_iter()
        .filter_map(|procedure| {
            catalog.lookup(procedure).map(|figures| FfiCostRow {
                procedure: procedure.to_string(),
                minutes: figures.minutes,
                fee: figures.fee,
            })
        })
        .collect()
}

/// Whether a procedure is one of the procedure options.
#[uniffi::export]
pub fn is_known_procedure(procedure: String) -> bool {
    catalog::is_known_procedure(&procedure)
}

#[uniffi::export]
pub fn format_usd(amount: f64) -> String {
    catalog::format_usd(amount)
}

#[uniffi::export]
pub fn format_minutes(minutes: f64) -> String {
    catalog::format_minutes(minutes)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DentalChart {
    store: Arc<Mutex<PatientStore>>,
}

#[uniffi::export]
impl DentalChart {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// All patients in creation order.
    pub fn patients(&self) -> Result<Vec<FfiPatient>, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.patients().iter().map(FfiPatient::from).collect())
    }

    pub fn active_patient(&self) -> Result<Option<FfiPatient>, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.active_patient().map(FfiPatient::from))
    }

    /// Create a patient and make it active. `None` when the name is blank.
    pub fn add_patient(
        &self,
        name: String,
        age: String,
        gender: String,
        notes: String,
    ) -> Result<Option<FfiPatient>, DentalChartError> {
        let mut store = self.store.lock()?;
        let form = models::NewPatientForm {
            name,
            age,
            gender,
            notes,
        };
        Ok(store.add_patient_from_form(&form).map(FfiPatient::from))
    }

    pub fn select_patient(&self, id: String) -> Result<FfiPatient, DentalChartError> {
        let mut store = self.store.lock()?;
        Ok(store.select_patient(&id)?.into())
    }

    // =========================================================================
    // Odontogram Operations
    // =========================================================================

    pub fn get_surface_status(&self, tooth: String, surface: String) -> Result<String, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let store = self.store.lock()?;
        Ok(store.get_surface_status(&tooth, surface).as_str().to_string())
    }

    /// Advance a surface's status. Returns the new status.
    pub fn cycle_surface(&self, tooth: String, surface: String) -> Result<String, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        store
            .cycle_surface(&tooth, surface)
            .map(|status| status.as_str().to_string())
            .ok_or_else(|| DentalChartError::NotFound("active patient".into()))
    }

    pub fn reset_tooth(&self, tooth: String) -> Result<(), DentalChartError> {
        let mut store = self.store.lock()?;
        store.reset_tooth(&tooth);
        Ok(())
    }

    pub fn reset_all(&self) -> Result<(), DentalChartError> {
        let mut store = self.store.lock()?;
        store.reset_all();
        Ok(())
    }

    pub fn select_surface(&self, tooth: String, surface: String) -> Result<(), DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        store.select_surface(&tooth, surface);
        Ok(())
    }

    pub fn clear_selection(&self) -> Result<(), DentalChartError> {
        let mut store = self.store.lock()?;
        store.clear_selection();
        Ok(())
    }

    // =========================================================================
    // Clinical Entry Operations
    // =========================================================================

    /// Stored or synthesized entry. Not persisted.
    pub fn get_or_init_clinical_entry(
        &self,
        tooth: String,
        surface: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let store = self.store.lock()?;
        Ok(store
            .get_or_init_clinical_entry(&tooth, surface)
            .map(FfiClinicalEntry::from))
    }

    pub fn set_clinical_entry(
        &self,
        tooth: String,
        surface: String,
        entry: FfiClinicalEntry,
    ) -> Result<(), DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        store.set_clinical_entry(&tooth, surface, entry.into());
        Ok(())
    }

    /// Remove an entry. Returns whether one existed.
    pub fn clear_clinical_entry(&self, tooth: String, surface: String) -> Result<bool, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store.clear_clinical_entry(&tooth, surface).is_some())
    }

    pub fn set_diagnosis(
        &self,
        tooth: String,
        surface: String,
        diagnosis: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .set_diagnosis(&tooth, surface, &diagnosis)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    pub fn pick_procedure(
        &self,
        tooth: String,
        surface: String,
        procedure: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .pick_procedure(&tooth, surface, &procedure)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    pub fn revert_procedure_to_auto(
        &self,
        tooth: String,
        surface: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .revert_procedure_to_auto(&tooth, surface)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    pub fn set_note(
        &self,
        tooth: String,
        surface: String,
        note: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .set_note(&tooth, surface, &note)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    // =========================================================================
    // Cost Operations
    // =========================================================================

    /// Pin fee and minutes from raw text input.
    pub fn set_cost_override(
        &self,
        tooth: String,
        surface: String,
        fee: String,
        minutes: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .set_cost_override_text(&tooth, surface, &fee, &minutes)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    pub fn revert_cost_to_auto(
        &self,
        tooth: String,
        surface: String,
    ) -> Result<Option<FfiClinicalEntry>, DentalChartError> {
        let surface = parse_surface(&surface)?;
        let mut store = self.store.lock()?;
        Ok(store
            .revert_cost_to_auto(&tooth, surface)
            .cloned()
            .map(FfiClinicalEntry::from))
    }

    /// Estimate a procedure against the store's catalog.
    pub fn estimate(&self, procedure: String) -> Result<FfiCostEstimate, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.estimator().estimate(&procedure).into())
    }

    // =========================================================================
    // Treatment Plan Operations
    // =========================================================================

    /// Set the plan filter: "all", "alertsOnly" or "treatedOnly".
    pub fn set_plan_filter(&self, filter: String) -> Result<(), DentalChartError> {
        let filter: PlanFilter = filter.parse().map_err(DentalChartError::InvalidInput)?;
        let mut store = self.store.lock()?;
        store.set_plan_filter(filter);
        Ok(())
    }

    pub fn set_plan_search(&self, text: String) -> Result<(), DentalChartError> {
        let mut store = self.store.lock()?;
        store.set_plan_search(&text);
        Ok(())
    }

    pub fn treatment_plan_view(&self) -> Result<Vec<FfiPlanItem>, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store
            .treatment_plan_view()
            .into_iter()
            .map(FfiPlanItem::from)
            .collect())
    }

    pub fn treatment_plan_totals(&self) -> Result<FfiPlanTotals, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.treatment_plan_totals().into())
    }

    /// Panel view-model for the selected surface, if any.
    pub fn clinical_panel(&self) -> Result<Option<FfiClinicalPanel>, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.clinical_panel().map(FfiClinicalPanel::from))
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the current plan view as JSON.
    pub fn export_json(&self) -> Result<String, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.export_json()?)
    }

    /// Export the current plan view as CSV.
    pub fn export_csv(&self) -> Result<String, DentalChartError> {
        let store = self.store.lock()?;
        Ok(store.export_csv()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub notes: String,
    pub status: String,
    pub revision: u64,
    pub flagged_teeth: u32,
    pub alert_surfaces: u32,
    pub treated_surfaces: u32,
    pub entry_count: u32,
}

impl From<&Patient> for FfiPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender.clone(),
            notes: patient.notes.clone(),
            status: patient.status.clone(),
            revision: patient.revision,
            flagged_teeth: patient.odontogram.flagged_teeth().count() as u32,
            alert_surfaces: patient.odontogram.count(ToothStatus::Alert) as u32,
            treated_surfaces: patient.odontogram.count(ToothStatus::Treated) as u32,
            entry_count: patient.clinical.len() as u32,
        }
    }
}

/// FFI-safe clinical entry (flattened auto/manual flags).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalEntry {
    pub diagnosis: String,
    pub procedure: String,
    pub note: String,
    pub procedure_manual: bool,
    pub cost_manual: bool,
    pub cost_fee: f64,
    pub cost_minutes: u32,
}

impl From<ClinicalEntry> for FfiClinicalEntry {
    fn from(entry: ClinicalEntry) -> Self {
        Self {
            procedure_manual: entry.procedure_manual(),
            cost_manual: entry.cost_manual(),
            cost_fee: entry.cost_fee(),
            cost_minutes: entry.cost_minutes(),
            diagnosis: entry.diagnosis,
            procedure: entry.procedure.into_value(),
            note: entry.note,
        }
    }
}

impl From<FfiClinicalEntry> for ClinicalEntry {
    fn from(entry: FfiClinicalEntry) -> Self {
        ClinicalEntry {
            diagnosis: entry.diagnosis,
            procedure: Pinned::with_mode(entry.procedure, entry.procedure_manual),
            note: entry.note,
            cost: Pinned::with_mode(
                CostFigures::clamped(entry.cost_fee, entry.cost_minutes as f64),
                entry.cost_manual,
            ),
        }
    }
}

/// FFI-safe plan row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanItem {
    pub tooth: String,
    pub surface: String,
    pub surface_name: String,
    pub status: String,
    pub diagnosis: String,
    pub procedure: String,
    pub note: String,
    pub procedure_manual: bool,
    pub cost_fee: f64,
    pub cost_minutes: u32,
    pub cost_manual: bool,
    pub cost_source: String,
}

impl From<TreatmentPlanItem> for FfiPlanItem {
    fn from(item: TreatmentPlanItem) -> Self {
        Self {
            tooth: item.tooth,
            surface: item.surface.code().to_string(),
            surface_name: item.surface_name,
            status: item.status.as_str().to_string(),
            diagnosis: item.diagnosis,
            procedure: item.procedure,
            note: item.note,
            procedure_manual: item.procedure_manual,
            cost_fee: item.cost_fee,
            cost_minutes: item.cost_minutes,
            cost_manual: item.cost_manual,
            cost_source: item.cost_source.as_str().to_string(),
        }
    }
}

/// FFI-safe plan totals.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanTotals {
    pub total_minutes: u32,
    pub total_fee: f64,
}

impl From<PlanTotals> for FfiPlanTotals {
    fn from(totals: PlanTotals) -> Self {
        Self {
            total_minutes: totals.total_minutes,
            total_fee: totals.total_fee,
        }
    }
}

/// FFI-safe clinical panel view-model.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalPanel {
    pub tooth: String,
    pub surface: String,
    pub surface_name: String,
    pub status: String,
    pub entry: FfiClinicalEntry,
    pub cost_source: String,
    pub persisted: bool,
}

impl From<ClinicalPanelView> for FfiClinicalPanel {
    fn from(view: ClinicalPanelView) -> Self {
        Self {
            surface: view.surface.code().to_string(),
            status: view.status.as_str().to_string(),
            entry: FfiClinicalEntry {
                diagnosis: view.diagnosis,
                procedure: view.procedure,
                note: view.note,
                procedure_manual: view.procedure_manual,
                cost_manual: view.cost_manual,
                cost_fee: view.cost_fee,
                cost_minutes: view.cost_minutes,
            },
            cost_source: view.cost_source.as_str().to_string(),
            persisted: view.persisted,
            tooth: view.tooth,
            surface_name: view.surface_name,
        }
    }
}

/// FFI-safe cost estimate.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCostEstimate {
    pub minutes: u32,
    pub fee: f64,
    pub cost_manual: bool,
    pub source: String,
}

impl From<CostEstimate> for FfiCostEstimate {
    fn from(estimate: CostEstimate) -> Self {
        Self {
            minutes: estimate.minutes,
            fee: estimate.fee,
            cost_manual: estimate.cost_manual,
            source: estimate.source.as_str().to_string(),
        }
    }
}

/// FFI-safe cost table row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCostRow {
    pub procedure: String,
    pub minutes: u32,
    pub fee: f64,
}

/// FFI-safe tooth layout.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToothLayout {
    pub upper: Vec<String>,
    pub lower: Vec<String>,
}

impl From<ToothLayout> for FfiToothLayout {
    fn from(layout: ToothLayout) -> Self {
        Self {
            upper: layout.upper,
            lower: layout.lower,
        }
    }
}
