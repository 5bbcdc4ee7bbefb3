//! End-to-end scenarios against the patient store.

use dental_chart_core::catalog::procedures;
use dental_chart_core::config::EngineConfig;
use dental_chart_core::models::{
    ClinicalEntry, CostFigures, CostSource, Pinned, PlanFilter, Surface, ToothStatus,
};
use dental_chart_core::plan::{ExportSink, MemorySink, SinkError};
use dental_chart_core::store::PatientStore;

/// Sink that refuses every payload, like a blocked clipboard.
struct RejectingSink;

impl ExportSink for RejectingSink {
    fn write(&mut self, _payload: &str) -> Result<(), SinkError> {
        Err(SinkError::Rejected("permission denied".into()))
    }
}

fn store_with_ana() -> PatientStore {
    dental_chart_core::logging::init_test();

    let mut store = PatientStore::new(EngineConfig {
        seed_demo_patients: false,
        ..EngineConfig::default()
    });
    store.add_patient("Ana", 29, "Female", "New intake").unwrap();
    store
}

#[test]
fn test_first_cycle_materializes_alert_entry() {
    let mut store = store_with_ana();

    let status = store.cycle_surface("11", Surface::Occlusal).unwrap();
    assert_eq!(status, ToothStatus::Alert);

    let entry = store.get_or_init_clinical_entry("11", Surface::Occlusal).unwrap();
    assert_eq!(entry.diagnosis, "Lesion / risk detected on Occlusal");
    assert_eq!(entry.procedure_name(), procedures::SEALANT);
    assert!(!entry.procedure_manual());

    // Sealant has no cost row; the default estimate applies.
    let plan = store.treatment_plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].cost_minutes, 30);
    assert_eq!(plan[0].cost_fee, 150.0);
    assert_eq!(plan[0].cost_source, CostSource::Default);
}

#[test]
fn test_alerts_only_search_by_tooth() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    store.cycle_surface("21", Surface::Mesial);
    store.cycle_surface("21", Surface::Mesial);
    store.cycle_surface("36", Surface::Distal);

    store.set_plan_filter(PlanFilter::AlertsOnly);
    store.set_plan_search("11");

    let view = store.treatment_plan_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].tooth, "11");
    assert_eq!(view[0].surface, Surface::Occlusal);
    assert_eq!(view[0].status, ToothStatus::Alert);

    let totals = store.treatment_plan_totals();
    assert_eq!(totals.total_minutes, 30);
    assert_eq!(totals.total_fee, 150.0);
}

#[test]
fn test_cost_override_then_revert() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    let before = store.get_or_init_clinical_entry("11", Surface::Occlusal).unwrap();

    let pinned = store
        .set_cost_override("11", Surface::Occlusal, 999.0, 10.0)
        .unwrap();
    assert!(pinned.cost_manual());
    assert_eq!(pinned.cost_fee(), 999.0);
    assert_eq!(pinned.cost_minutes(), 10);
    assert_eq!(store.treatment_plan()[0].cost_source, CostSource::Manual);

    let reverted = store.revert_cost_to_auto("11", Surface::Occlusal).unwrap();
    assert!(!reverted.cost_manual());
    assert_eq!(reverted.cost_fee(), 150.0);
    assert_eq!(reverted.cost_minutes(), 30);
    assert_eq!(reverted, &before);
}

#[test]
fn test_manual_pin_survives_cycle() {
    let mut store = store_with_ana();
    store.cycle_surface("14", Surface::Mesial);

    let entry = ClinicalEntry {
        diagnosis: "Caries (suspected)".into(),
        procedure: Pinned::Manual("Filling (composite)".into()),
        note: "Patient prefers composite".into(),
        cost: Pinned::Auto(CostFigures::default()),
    };
    store.set_clinical_entry("14", Surface::Mesial, entry);

    for _ in 0..3 {
        store.cycle_surface("14", Surface::Mesial);
    }

    let entry = store.get_or_init_clinical_entry("14", Surface::Mesial).unwrap();
    assert_eq!(entry.procedure_name(), "Filling (composite)");
    assert!(entry.procedure_manual());
    assert_eq!(entry.cost_fee(), 220.0);
    assert_eq!(store.get_surface_status("14", Surface::Mesial), ToothStatus::Alert);
}

#[test]
fn test_auto_cost_follows_recommendation() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    store.cycle_surface("11", Surface::Occlusal);

    let entry = store.get_or_init_clinical_entry("11", Surface::Occlusal).unwrap();
    assert_eq!(entry.procedure_name(), procedures::FOLLOW_UP);

    store.cycle_surface("11", Surface::Occlusal);
    let entry = store.get_or_init_clinical_entry("11", Surface::Occlusal).unwrap();
    assert_eq!(entry.procedure_name(), procedures::CLINICAL_EVALUATION);
    assert_eq!(entry.cost, Pinned::Auto(CostFigures { minutes: 20, fee: 75.0 }));
}

#[test]
fn test_entry_and_status_lifecycles_are_independent() {
    let mut store = store_with_ana();
    store.cycle_surface("46", Surface::Buccal);

    let status = store.get_surface_status("46", Surface::Buccal);
    store.clear_clinical_entry("46", Surface::Buccal);
    assert_eq!(store.get_surface_status("46", Surface::Buccal), status);
    assert!(store.treatment_plan().is_empty());

    store.cycle_surface("46", Surface::Buccal);
    let entry = store.get_or_init_clinical_entry("46", Surface::Buccal).unwrap();
    store.reset_tooth("46");
    assert_eq!(store.get_surface_status("46", Surface::Buccal), ToothStatus::Normal);
    assert_eq!(store.get_or_init_clinical_entry("46", Surface::Buccal), Some(entry));
}

#[test]
fn test_reset_all_keeps_entries_in_plan() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    store.cycle_surface("12", Surface::Lingual);
    store.reset_all();

    let plan = store.treatment_plan();
    assert_eq!(plan.len(), 2);
    assert!(plan.iter().all(|item| item.status == ToothStatus::Normal));

    store.set_plan_filter(PlanFilter::AlertsOnly);
    assert!(store.treatment_plan_view().is_empty());
}

#[test]
fn test_panel_edits() {
    let mut store = store_with_ana();
    store.cycle_surface("26", Surface::Distal);

    let entry = store
        .set_diagnosis("26", Surface::Distal, "Caries (suspected)")
        .unwrap();
    assert_eq!(entry.procedure_name(), procedures::RESIN_RESTORATION);

    let entry = store
        .pick_procedure("26", Surface::Distal, procedures::EXTRACTION)
        .unwrap();
    assert!(entry.procedure_manual());
    assert_eq!(entry.cost_fee(), 280.0);

    let entry = store
        .set_diagnosis("26", Surface::Distal, "Infection / abscess (suspected)")
        .unwrap();
    assert_eq!(entry.procedure_name(), procedures::EXTRACTION);

    let entry = store.revert_procedure_to_auto("26", Surface::Distal).unwrap();
    assert_eq!(entry.procedure_name(), procedures::ENDODONTICS);
    assert!(!entry.procedure_manual());

    let entry = store.set_note("26", Surface::Distal, "Refer to endodontist").unwrap();
    assert_eq!(entry.note, "Refer to endodontist");
    assert_eq!(entry.procedure_name(), procedures::ENDODONTICS);
}

#[test]
fn test_panel_edit_on_untouched_surface_persists_entry() {
    let mut store = store_with_ana();
    let entry = store.set_note("31", Surface::Lingual, "Calculus").unwrap();
    assert_eq!(entry.diagnosis, "No findings on Lingual");
    assert_eq!(entry.procedure_name(), procedures::CLINICAL_EVALUATION);

    let plan = store.treatment_plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].status, ToothStatus::Normal);
    assert_eq!(plan[0].cost_minutes, 20);
    assert_eq!(plan[0].cost_fee, 75.0);
    assert_eq!(plan[0].cost_source, CostSource::Catalog);
}

#[test]
fn test_free_text_diagnosis_routes_as_requires_evaluation() {
    let mut store = store_with_ana();
    store.cycle_surface("16", Surface::Occlusal);

    let entry = store
        .set_diagnosis("16", Surface::Occlusal, "Fracture / fissure (palatal cusp)")
        .unwrap();
    assert_eq!(entry.procedure_name(), procedures::CLINICAL_EVALUATION);

    let entry = store
        .set_diagnosis("16", Surface::Occlusal, "Fracture / fissure")
        .unwrap();
    assert_eq!(entry.procedure_name(), procedures::INLAY);
}

#[test]
fn test_export_json_contract() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);

    let json = store.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["patient"]["name"], "Ana");
    assert_eq!(value["patient"]["id"], "PT-0001");
    assert!(value["generatedAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(value["items"][0]["surface"], "O");
    assert_eq!(value["items"][0]["surfaceName"], "Occlusal");
    assert_eq!(value["items"][0]["costSource"], "default");
    assert_eq!(value["totals"]["totalMinutes"], 30);
    assert_eq!(value["totals"]["totalFee"], 150.0);
}

#[test]
fn test_export_csv_has_row_per_item() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    store.cycle_surface("12", Surface::Occlusal);

    let csv = store.export_csv().unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_copy_plan_to_sinks() {
    let mut store = store_with_ana();
    store.cycle_surface("11", Surface::Occlusal);
    let snapshot = store.active_patient().unwrap().clone();

    let mut clipboard = MemorySink::default();
    assert!(store.copy_plan_to(&mut clipboard));
    assert_eq!(clipboard.payloads.len(), 1);

    assert!(!store.copy_plan_to(&mut RejectingSink));
    assert_eq!(store.active_patient().unwrap(), &snapshot);
    assert_eq!(store.treatment_plan().len(), 1);
}

#[test]
fn test_demo_patients_switching() {
    let mut store = PatientStore::default();
    store.cycle_surface("11", Surface::Occlusal);

    let carlos = store.select_patient("PT-0002").unwrap();
    assert_eq!(carlos.name, "Carlos Méndez");
    assert!(store.treatment_plan().is_empty());

    store.select_patient("PT-0001").unwrap();
    assert_eq!(store.treatment_plan().len(), 1);
}
