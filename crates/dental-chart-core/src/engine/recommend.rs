//! Procedure recommendation.
//!
//! Pure function of (status, diagnosis, surface). Treated surfaces always get
//! a follow-up; normal surfaces get prophylaxis unless a finding was recorded;
//! alert surfaces are routed by diagnosis and surface group.

use crate::catalog::procedures::*;
use crate::catalog::{alert_narrative, Diagnosis};
use crate::models::{Surface, ToothStatus};

/// Recommend a procedure for an exact diagnosis label.
///
/// Unrecognized diagnoses fall through to clinical evaluation.
pub fn recommend(status: ToothStatus, diagnosis: &str, surface: Surface) -> &'static str {
    match status {
        ToothStatus::Treated => FOLLOW_UP,
        ToothStatus::Normal => {
            if diagnosis == Diagnosis::NoFindings.label() {
                PROPHYLAXIS
            } else {
                CLINICAL_EVALUATION
            }
        }
        ToothStatus::Alert => match Diagnosis::from_label(diagnosis) {
            Some(diagnosis) => recommend_for_alert(diagnosis, surface),
            None => CLINICAL_EVALUATION,
        },
    }
}

fn recommend_for_alert(diagnosis: Diagnosis, surface: Surface) -> &'static str {
    match diagnosis {
        Diagnosis::CariesSuspected => {
            if surface.is_occlusal() {
                SEALANT
            } else if surface.is_proximal() || surface.is_buccal_lingual() {
                RESIN_RESTORATION
            } else {
                CLINICAL_EVALUATION
            }
        }
        Diagnosis::LesionRisk => {
            if surface.is_occlusal() {
                SEALANT
            } else {
                CLINICAL_EVALUATION
            }
        }
        Diagnosis::FractureFissure => {
            if surface.is_occlusal() {
                INLAY
            } else {
                CLINICAL_EVALUATION
            }
        }
        Diagnosis::InfectionSuspected => {
            if surface.is_occlusal() || surface.is_proximal() {
                ENDODONTICS
            } else {
                CLINICAL_EVALUATION
            }
        }
        Diagnosis::SensitivityWear | Diagnosis::RequiresEvaluation | Diagnosis::NoFindings => {
            CLINICAL_EVALUATION
        }
    }
}

/// Recommend a procedure for stored diagnosis text.
///
/// The text is first normalized onto the diagnosis catalog: exact labels and
/// the alert narrative keep their routing, anything else is treated as
/// "Requires evaluation". Every auto-recommendation goes through here.
pub fn recommended_procedure(status: ToothStatus, diagnosis: &str, surface: Surface) -> &'static str {
    recommend(status, Diagnosis::normalize(diagnosis).label(), surface)
}

/// Canned diagnosis and note for a newly materialized entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTemplate {
    pub diagnosis: String,
    pub note: &'static str,
}

impl EntryTemplate {
    pub fn for_status(status: ToothStatus, surface: Surface) -> Self {
        let label = surface.label();
        match status {
            ToothStatus::Alert => Self {
                diagnosis: alert_narrative(surface),
                note: "Conservative treatment suggested. No backend: narrative-only clinical guidance.",
            },
            ToothStatus::Treated => Self {
                diagnosis: format!("Treatment completed on {}", label),
                note: "Surface marked as treated. Visual evidence for decision-making.",
            },
            ToothStatus::Normal => Self {
                diagnosis: format!("No findings on {}", label),
                note: "Normal status. Ideal to explain prevention and continuity of care.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treated_ignores_diagnosis_and_surface() {
        for surface in Surface::ALL {
            for diagnosis in Diagnosis::ALL {
                assert_eq!(
                    recommend(ToothStatus::Treated, diagnosis.label(), surface),
                    "Control / Follow-up"
                );
            }
            assert_eq!(recommend(ToothStatus::Treated, "anything", surface), "Control / Follow-up");
        }
    }

    #[test]
    fn test_normal_routes_on_findings() {
        assert_eq!(recommend(ToothStatus::Normal, "No findings", Surface::Buccal), "Prophylaxis");
        assert_eq!(
            recommend(ToothStatus::Normal, "Caries (suspected)", Surface::Buccal),
            "Clinical evaluation"
        );
        // Exact match only; normalization is the caller's job.
        assert_eq!(
            recommend(ToothStatus::Normal, "No findings on Buccal", Surface::Buccal),
            "Clinical evaluation"
        );
    }

    #[test]
    fn test_alert_caries() {
        assert_eq!(recommend(ToothStatus::Alert, "Caries (suspected)", Surface::Occlusal), "Sealant");
        assert_eq!(
            recommend(ToothStatus::Alert, "Caries (suspected)", Surface::Mesial),
            "Resin restoration"
        );
        assert_eq!(
            recommend(ToothStatus::Alert, "Caries (suspected)", Surface::Lingual),
            "Resin restoration"
        );
    }

    #[test]
    fn test_alert_unknown_diagnosis() {
        assert_eq!(recommend(ToothStatus::Alert, "Gum bleeding", Surface::Occlusal), "Clinical evaluation");
        assert_eq!(recommend(ToothStatus::Alert, "", Surface::Occlusal), "Clinical evaluation");
    }

    #[test]
    fn test_recommended_procedure_normalizes_narratives() {
        assert_eq!(
            recommended_procedure(ToothStatus::Alert, "Lesion / risk detected on Occlusal", Surface::Occlusal),
            "Sealant"
        );
        assert_eq!(
            recommended_procedure(ToothStatus::Normal, "No findings on Distal", Surface::Distal),
            "Clinical evaluation"
        );
        assert_eq!(
            recommended_procedure(ToothStatus::Normal, "No findings", Surface::Distal),
            "Prophylaxis"
        );
        assert_eq!(
            recommended_procedure(ToothStatus::Alert, "Fracture / fissure (palatal cusp)", Surface::Occlusal),
            "Clinical evaluation"
        );
        assert_eq!(
            recommended_procedure(ToothStatus::Normal, "Lesion / risk detected on Distal", Surface::Distal),
            "Clinical evaluation"
        );
        assert_eq!(
            recommended_procedure(ToothStatus::Alert, "   ", Surface::Occlusal),
            "Clinical evaluation"
        );
    }

    #[test]
    fn test_templates() {
        let template = EntryTemplate::for_status(ToothStatus::Alert, Surface::Occlusal);
        assert_eq!(template.diagnosis, "Lesion / risk detected on Occlusal");

        let template = EntryTemplate::for_status(ToothStatus::Treated, Surface::Mesial);
        assert_eq!(template.diagnosis, "Treatment completed on Mesial");

        let template = EntryTemplate::for_status(ToothStatus::Normal, Surface::Lingual);
        assert_eq!(template.diagnosis, "No findings on Lingual");
    }
}
