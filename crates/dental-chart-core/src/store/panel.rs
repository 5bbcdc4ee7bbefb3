//! Clinical panel view-model.

use serde::{Deserialize, Serialize};

use crate::engine::ClinicalEngine;
use crate::models::{CostSource, Patient, Selection, Surface, ToothStatus};
use crate::plan::priced_procedure;

/// Everything the clinical panel renders for the selected surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalPanelView {
    pub tooth: String,
    pub surface: Surface,
    pub surface_name: String,
    pub status: ToothStatus,
    pub diagnosis: String,
    pub procedure: String,
    pub note: String,
    pub procedure_manual: bool,
    pub cost_fee: f64,
    pub cost_minutes: u32,
    pub cost_manual: bool,
    pub cost_source: CostSource,
    /// False while the entry is only synthesized, not yet stored
    pub persisted: bool,
}

impl ClinicalPanelView {
    /// Build the view for a selection, synthesizing the entry if needed.
    ///
    /// The cost is priced the same way as the entry's plan row; the procedure
    /// field shows the raw, possibly blank, value being edited.
    pub fn build(engine: &ClinicalEngine<'_>, patient: &Patient, selection: &Selection) -> Self {
        let entry = engine.get_or_init(patient, &selection.tooth, selection.surface, selection.status);
        let cost = engine.estimator().resolve(&entry, priced_procedure(&entry));

        Self {
            tooth: selection.tooth.clone(),
            surface: selection.surface,
            surface_name: selection.surface.label().to_string(),
            status: selection.status,
            diagnosis: entry.diagnosis.clone(),
            procedure: entry.procedure_name().to_string(),
            note: entry.note.clone(),
            procedure_manual: entry.procedure_manual(),
            cost_fee: cost.fee,
            cost_minutes: cost.minutes,
            cost_manual: cost.cost_manual,
            cost_source: cost.source,
            persisted: patient.clinical.contains(&selection.tooth, selection.surface),
        }
    }
}
