//! Treatment plan export.
//!
//! The JSON snapshot layout (`patient`, `generatedAt`, `items`, `totals`) is
//! consumed by downstream tooling; keep field names and nesting stable.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Patient, PlanTotals, TreatmentPlanItem};

/// Export sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Export sink unavailable: {0}")]
    Unavailable(String),

    #[error("Export sink rejected payload: {0}")]
    Rejected(String),
}

/// External destination for an exported plan (e.g. a clipboard).
pub trait ExportSink {
    fn write(&mut self, payload: &str) -> Result<(), SinkError>;
}

/// In-memory sink keeping every payload written to it.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub payloads: Vec<String>,
}

impl ExportSink for MemorySink {
    fn write(&mut self, payload: &str) -> Result<(), SinkError> {
        self.payloads.push(payload.to_string());
        Ok(())
    }
}

/// Patient header of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPatient {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Serializable snapshot of a plan view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub patient: SnapshotPatient,
    /// ISO-8601 UTC timestamp with milliseconds
    pub generated_at: String,
    pub items: Vec<TreatmentPlanItem>,
    pub totals: PlanTotals,
}

impl PlanSnapshot {
    /// Snapshot a view, stamped now.
    pub fn new(patient: &Patient, items: Vec<TreatmentPlanItem>, totals: PlanTotals) -> Self {
        Self::at(patient, items, totals, Utc::now())
    }

    /// Snapshot a view with an explicit timestamp.
    pub fn at(
        patient: &Patient,
        items: Vec<TreatmentPlanItem>,
        totals: PlanTotals,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            patient: SnapshotPatient {
                id: patient.id.clone(),
                name: patient.name.clone(),
                status: patient.status.clone(),
            },
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            items,
            totals,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Export items to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("patient_id,tooth,surface,surface_name,status,diagnosis,procedure,procedure_mode,note,cost_minutes,cost_fee,cost_mode,cost_source\n");

        // Lines
        for item in &self.items {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{:.2},{},{}\n",
                escape_csv(&self.patient.id),
                escape_csv(&item.tooth),
                item.surface.code(),
                item.surface_name,
                item.status.as_str(),
                escape_csv(&item.diagnosis),
                escape_csv(&item.procedure),
                if item.procedure_manual { "manual" } else { "auto" },
                escape_csv(&item.note),
                item.cost_minutes,
                item.cost_fee,
                if item.cost_manual { "manual" } else { "auto" },
                item.cost_source.as_str(),
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostSource, Surface, ToothStatus};
    use chrono::TimeZone;

    fn make_patient() -> Patient {
        Patient::new(
            "PT-0003".into(),
            "Ana".into(),
            30,
            String::new(),
            String::new(),
            "Active".into(),
        )
    }

    fn make_item(tooth: &str, note: &str) -> TreatmentPlanItem {
        TreatmentPlanItem {
            tooth: tooth.into(),
            surface: Surface::Occlusal,
            surface_name: "Occlusal".into(),
            status: ToothStatus::Alert,
            diagnosis: "Lesion / risk detected on Occlusal".into(),
            procedure: "Sealant".into(),
            note: note.into(),
            procedure_manual: false,
            cost_fee: 150.0,
            cost_minutes: 30,
            cost_manual: false,
            cost_source: CostSource::Default,
        }
    }

    #[test]
    fn test_snapshot_json_layout() {
        let patient = make_patient();
        let generated = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let snapshot = PlanSnapshot::at(
            &patient,
            vec![make_item("11", "")],
            PlanTotals {
                total_minutes: 30,
                total_fee: 150.0,
            },
            generated,
        );

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json(false).unwrap()).unwrap();
        assert_eq!(json["patient"]["id"], "PT-0003");
        assert_eq!(json["patient"]["name"], "Ana");
        assert_eq!(json["patient"]["status"], "Active");
        assert_eq!(json["generatedAt"], "2024-01-15T10:00:00.000Z");
        assert_eq!(json["items"][0]["tooth"], "11");
        assert_eq!(json["items"][0]["costSource"], "default");
        assert_eq!(json["totals"]["totalMinutes"], 30);
        assert_eq!(json["totals"]["totalFee"], 150.0);
    }

    #[test]
    fn test_snapshot_csv() {
        let patient = make_patient();
        let snapshot = PlanSnapshot::new(
            &patient,
            vec![make_item("11", "check, again"), make_item("12", "")],
            PlanTotals::default(),
        );

        let csv = snapshot.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 items
        assert!(lines[0].starts_with("patient_id,tooth"));
        assert!(lines[1].contains("\"check, again\""));
        assert!(lines[2].contains("150.00"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::default();
        sink.write("{}").unwrap();
        assert_eq!(sink.payloads, vec!["{}".to_string()]);
    }
}
