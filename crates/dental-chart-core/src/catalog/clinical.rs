//! Diagnosis and procedure catalogs.
//!
//! Illustrative lookup tables for the clinical panel selects and the
//! recommendation engine. Not clinical knowledge.

use serde::{Deserialize, Serialize};

use crate::models::Surface;

/// Lead-in of the diagnosis written for a surface newly flagged as alert.
pub const ALERT_NARRATIVE_PREFIX: &str = "Lesion / risk detected on ";

/// Procedure names produced by the recommendation engine.
pub mod procedures {
    pub const PROPHYLAXIS: &str = "Prophylaxis";
    pub const SEALANT: &str = "Sealant";
    pub const RESIN_RESTORATION: &str = "Resin restoration";
    pub const EVALUATION_AND_RESIN: &str = "Evaluation + resin restoration (mock)";
    pub const INLAY: &str = "Inlay (mock)";
    pub const ENDODONTICS: &str = "Endodontics (mock)";
    pub const EXTRACTION: &str = "Extraction";
    pub const FOLLOW_UP: &str = "Control / Follow-up";
    pub const CLINICAL_EVALUATION: &str = "Clinical evaluation";
}

/// Procedure select options, in display order.
pub const PROCEDURE_OPTIONS: [&str; 9] = [
    procedures::PROPHYLAXIS,
    procedures::SEALANT,
    procedures::RESIN_RESTORATION,
    procedures::EVALUATION_AND_RESIN,
    procedures::INLAY,
    procedures::ENDODONTICS,
    procedures::EXTRACTION,
    procedures::FOLLOW_UP,
    procedures::CLINICAL_EVALUATION,
];

/// Whether a procedure is one of the select options (exact match).
pub fn is_known_procedure(procedure: &str) -> bool {
    PROCEDURE_OPTIONS.contains(&procedure)
}

/// Catalog diagnoses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagnosis {
    NoFindings,
    CariesSuspected,
    LesionRisk,
    SensitivityWear,
    FractureFissure,
    InfectionSuspected,
    RequiresEvaluation,
}

impl Diagnosis {
    /// All diagnoses in display order.
    pub const ALL: [Diagnosis; 7] = [
        Diagnosis::NoFindings,
        Diagnosis::CariesSuspected,
        Diagnosis::LesionRisk,
        Diagnosis::SensitivityWear,
        Diagnosis::FractureFissure,
        Diagnosis::InfectionSuspected,
        Diagnosis::RequiresEvaluation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::NoFindings => "No findings",
            Diagnosis::CariesSuspected => "Caries (suspected)",
            Diagnosis::LesionRisk => "Lesion / risk",
            Diagnosis::SensitivityWear => "Sensitivity / wear",
            Diagnosis::FractureFissure => "Fracture / fissure",
            Diagnosis::InfectionSuspected => "Infection / abscess (suspected)",
            Diagnosis::RequiresEvaluation => "Requires evaluation",
        }
    }

    /// Exact label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Map stored diagnosis text onto the catalog.
    ///
    /// An exact label maps to itself and the alert narrative
    /// ("Lesion / risk detected on Occlusal") maps to `LesionRisk`. Anything
    /// else, free text and the other narratives included, is
    /// `RequiresEvaluation`.
    pub fn normalize(text: &str) -> Self {
        let text = text.trim();
        if let Some(exact) = Self::from_label(text) {
            return exact;
        }
        if is_alert_narrative(text) {
            return Diagnosis::LesionRisk;
        }
        Diagnosis::RequiresEvaluation
    }
}

/// Alert narrative for a surface, e.g. "Lesion / risk detected on Mesial".
pub fn alert_narrative(surface: Surface) -> String {
    format!("{}{}", ALERT_NARRATIVE_PREFIX, surface.label())
}

fn is_alert_narrative(text: &str) -> bool {
    text.strip_prefix(ALERT_NARRATIVE_PREFIX)
        .is_some_and(|rest| Surface::ALL.iter().any(|s| s.label() == rest))
}

/// Diagnosis select options, in display order.
pub fn diagnosis_options() -> Vec<&'static str> {
    Diagnosis::ALL.iter().map(|d| d.label()).collect()
}
