//! Odontogram: per tooth, per surface status.
//!
//! Sparse: a tooth or surface that was never touched reads as
//! [`ToothStatus::Normal`]. The only mutators are [`Odontogram::cycle`] and the
//! two resets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tooth::{Surface, ToothStatus};

/// Statuses of the five surfaces of one tooth (sparse).
pub type ToothSurfaces = BTreeMap<Surface, ToothStatus>;

/// Mapping from tooth code (e.g. "11") to its surface statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Odontogram {
    teeth: BTreeMap<String, ToothSurfaces>,
}

impl Odontogram {
    /// Create an empty (all-normal) odontogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the status of a surface, defaulting to normal.
    pub fn status(&self, tooth: &str, surface: Surface) -> ToothStatus {
        self.teeth
            .get(tooth)
            .and_then(|surfaces| surfaces.get(&surface))
            .copied()
            .unwrap_or_default()
    }

    /// Advance a surface one step through `normal → alert → treated → normal`.
    ///
    /// Returns the new status.
    pub fn cycle(&mut self, tooth: &str, surface: Surface) -> ToothStatus {
        let next = self.status(tooth, surface).next();
        self.teeth
            .entry(tooth.to_string())
            .or_insert_with(Self::empty_tooth)
            .insert(surface, next);
        next
    }

    /// Set all five surfaces of one tooth back to normal.
    pub fn reset_tooth(&mut self, tooth: &str) {
        self.teeth.insert(tooth.to_string(), Self::empty_tooth());
    }

    /// Clear every tooth.
    pub fn reset_all(&mut self) {
        self.teeth.clear();
    }

    /// Teeth with at least one surface not in normal status.
    pub fn flagged_teeth(&self) -> impl Iterator<Item = &str> {
        self.teeth
            .iter()
            .filter(|(_, surfaces)| surfaces.values().any(|s| *s != ToothStatus::Normal))
            .map(|(tooth, _)| tooth.as_str())
    }

    /// Count of surfaces currently in the given status.
    pub fn count(&self, status: ToothStatus) -> usize {
        self.teeth
            .values()
            .flat_map(|surfaces| surfaces.values())
            .filter(|s| **s == status)
            .count()
    }

    fn empty_tooth() -> ToothSurfaces {
        Surface::ALL
            .iter()
            .map(|surface| (*surface, ToothStatus::Normal))
            .collect()
    }
}
