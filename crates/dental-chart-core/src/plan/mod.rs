//! Treatment plan projection.
//!
//! The plan is a flat, sorted list derived from a patient's clinical entries
//! and live surface statuses. It is recomputed on every query and never
//! stored.

mod export;

pub use export::*;

use std::cmp::Ordering;

use crate::catalog::{clamp_minutes, clamp_money, procedures};
use crate::engine::CostEstimator;
use crate::models::{ClinicalEntry, Patient, PlanFilter, PlanTotals, TreatmentPlanItem};

/// Diagnosis shown for an entry whose diagnosis is blank.
pub const DEFAULT_PLAN_DIAGNOSIS: &str = "Requires evaluation";

/// Builds plan items, pricing auto costs with a [`CostEstimator`].
pub struct PlanProjector<'a> {
    estimator: &'a CostEstimator,
}

impl<'a> PlanProjector<'a> {
    pub fn new(estimator: &'a CostEstimator) -> Self {
        Self { estimator }
    }

    /// One item per recorded clinical entry, sorted by status rank
    /// (alert, treated, normal), then tooth number, then surface code.
    pub fn build(&self, patient: &Patient) -> Vec<TreatmentPlanItem> {
        let mut items: Vec<TreatmentPlanItem> = patient
            .clinical
            .iter()
            .map(|(tooth, surface, entry)| {
                let status = patient.odontogram.status(tooth, surface);
                let diagnosis = non_blank(&entry.diagnosis, DEFAULT_PLAN_DIAGNOSIS);
                let procedure = priced_procedure(entry);
                let cost = self.estimator.resolve(entry, procedure);

                TreatmentPlanItem {
                    tooth: tooth.to_string(),
                    surface,
                    surface_name: surface.label().to_string(),
                    status,
                    diagnosis,
                    procedure: procedure.to_string(),
                    note: entry.note.clone(),
                    procedure_manual: entry.procedure_manual(),
                    cost_fee: cost.fee,
                    cost_minutes: cost.minutes,
                    cost_manual: cost.cost_manual,
                    cost_source: cost.source,
                }
            })
            .collect();

        items.sort_by(plan_order);
        items
    }

    /// Build, filter and search in one pass.
    pub fn view(&self, patient: &Patient, filter: PlanFilter, query: &str) -> Vec<TreatmentPlanItem> {
        search(filter_items(self.build(patient), filter), query)
    }
}

/// The procedure an entry is listed and priced under; blank means clinical
/// evaluation.
pub(crate) fn priced_procedure(entry: &ClinicalEntry) -> &str {
    match entry.procedure_name() {
        name if name.trim().is_empty() => procedures::CLINICAL_EVALUATION,
        name => name,
    }
}

fn non_blank(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Plan ordering: status rank, numeric tooth code, surface code.
pub fn plan_order(a: &TreatmentPlanItem, b: &TreatmentPlanItem) -> Ordering {
    a.status
        .plan_rank()
        .cmp(&b.status.plan_rank())
        .then_with(|| compare_teeth(&a.tooth, &b.tooth))
        .then_with(|| a.surface.code().cmp(b.surface.code()))
}

/// Numeric comparison of tooth codes; non-numeric codes sort after numeric
/// ones, lexicographically.
fn compare_teeth(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u32>(), b.trim().parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Keep the items admitted by a status filter.
pub fn filter_items(items: Vec<TreatmentPlanItem>, filter: PlanFilter) -> Vec<TreatmentPlanItem> {
    items
        .into_iter()
        .filter(|item| filter.admits(item.status))
        .collect()
}

/// Case-insensitive substring search. An empty query keeps everything.
pub fn search(items: Vec<TreatmentPlanItem>, query: &str) -> Vec<TreatmentPlanItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| haystack(item).contains(&query))
        .collect()
}

/// Searchable text of an item, lowercased.
fn haystack(item: &TreatmentPlanItem) -> String {
    let mode = |manual: bool| if manual { "manual" } else { "auto" };
    [
        item.tooth.as_str(),
        item.surface.code(),
        item.surface_name.as_str(),
        item.status.as_str(),
        item.diagnosis.as_str(),
        item.procedure.as_str(),
        item.note.as_str(),
        mode(item.procedure_manual),
        mode(item.cost_manual),
    ]
    .join(" ")
    .to_lowercase()
}

/// Sum time and fee over a view, re-clamped.
pub fn totals(items: &[TreatmentPlanItem]) -> PlanTotals {
    let minutes: f64 = items.iter().map(|item| item.cost_minutes as f64).sum();
    let fee: f64 = items.iter().map(|item| item.cost_fee).sum();
    PlanTotals {
        total_minutes: clamp_minutes(minutes),
        total_fee: clamp_money(fee),
    }
}
