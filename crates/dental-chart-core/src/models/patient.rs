//! Patient models.

use serde::{Deserialize, Serialize};

use super::clinical::ClinicalMap;
use super::odontogram::Odontogram;

/// A patient record. Owns its odontogram and clinical entries exclusively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Sequential identifier (e.g. "PT-0001"), stable for the patient's lifetime
    pub id: String,
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Free-form gender label
    pub gender: String,
    /// Additional notes
    pub notes: String,
    /// Free-form lifecycle label (e.g. "Active", "Follow-up")
    pub status: String,
    /// Surface statuses
    pub odontogram: Odontogram,
    /// Per-surface clinical entries
    pub clinical: ClinicalMap,
    /// Incremented on every mutation of odontogram or clinical entries
    pub revision: u64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a patient with an empty chart.
    pub fn new(id: String, name: String, age: u32, gender: String, notes: String, status: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name,
            age,
            gender,
            notes,
            status,
            odontogram: Odontogram::new(),
            clinical: ClinicalMap::new(),
            revision: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Record a mutation: bump the revision and the updated_at timestamp.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Raw "new patient" form input.
///
/// Age arrives as text; anything that does not parse becomes 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub notes: String,
}

impl NewPatientForm {
    /// Parsed, clamped age.
    pub fn parsed_age(&self) -> u32 {
        crate::catalog::clamp_minutes(crate::catalog::parse_amount(&self.age))
    }

    /// Whether the form can produce a patient (non-blank name).
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new(
            "PT-0003".into(),
            "Ana".into(),
            29,
            "Female".into(),
            String::new(),
            "Active".into(),
        );
        assert_eq!(patient.id, "PT-0003");
        assert_eq!(patient.revision, 0);
        assert!(patient.clinical.is_empty());
    }

    #[test]
    fn test_touch_bumps_revision() {
        let mut patient = Patient::new(
            "PT-0001".into(),
            "Ana".into(),
            29,
            String::new(),
            String::new(),
            "Active".into(),
        );
        patient.touch();
        patient.touch();
        assert_eq!(patient.revision, 2);
    }

    #[test]
    fn test_form_age_parsing() {
        let mut form = NewPatientForm {
            name: "Ana".into(),
            age: "34".into(),
            ..Default::default()
        };
        assert_eq!(form.parsed_age(), 34);

        form.age = "abc".into();
        assert_eq!(form.parsed_age(), 0);

        form.age = "".into();
        assert_eq!(form.parsed_age(), 0);

        form.age = "-5".into();
        assert_eq!(form.parsed_age(), 0);
    }

    #[test]
    fn test_form_requires_name() {
        let form = NewPatientForm {
            name: "   ".into(),
            ..Default::default()
        };
        assert!(!form.is_submittable());
    }
}
