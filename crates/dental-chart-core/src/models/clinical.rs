//! Clinical entry models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tooth::Surface;
use crate::catalog::{clamp_minutes, clamp_money};

/// A derived value that is either engine-computed or pinned by the user.
///
/// `Auto` values are refreshed whenever their inputs change; `Manual` values
/// are left untouched until explicitly reverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Pinned<T> {
    Auto(T),
    Manual(T),
}

impl<T> Pinned<T> {
    /// The current value regardless of mode.
    pub fn value(&self) -> &T {
        match self {
            Pinned::Auto(v) | Pinned::Manual(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Pinned::Auto(v) | Pinned::Manual(v) => v,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Pinned::Manual(_))
    }

    /// Build from a value and a manual flag.
    pub fn with_mode(value: T, manual: bool) -> Self {
        if manual {
            Pinned::Manual(value)
        } else {
            Pinned::Auto(value)
        }
    }
}

/// Time and fee for one procedure. Always clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostFigures {
    /// Chair time in minutes
    pub minutes: u32,
    /// Fee in USD, rounded to cents
    pub fee: f64,
}

impl CostFigures {
    /// Build from raw numbers, applying the clamp rules.
    ///
    /// Non-finite or negative inputs become zero.
    pub fn clamped(fee: f64, minutes: f64) -> Self {
        Self {
            minutes: clamp_minutes(minutes),
            fee: clamp_money(fee),
        }
    }
}

/// Diagnosis, procedure, note and cost recorded for one tooth surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalEntry {
    pub diagnosis: String,
    pub procedure: Pinned<String>,
    pub note: String,
    pub cost: Pinned<CostFigures>,
}

impl ClinicalEntry {
    /// Procedure name, whatever its mode.
    pub fn procedure_name(&self) -> &str {
        self.procedure.value()
    }

    pub fn procedure_manual(&self) -> bool {
        self.procedure.is_manual()
    }

    pub fn cost_manual(&self) -> bool {
        self.cost.is_manual()
    }

    pub fn cost_fee(&self) -> f64 {
        self.cost.value().fee
    }

    pub fn cost_minutes(&self) -> u32 {
        self.cost.value().minutes
    }
}

/// Sparse per tooth, per surface clinical entries.
///
/// A tooth key only exists while at least one of its surfaces has an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClinicalMap {
    teeth: BTreeMap<String, BTreeMap<Surface, ClinicalEntry>>,
}

impl ClinicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tooth: &str, surface: Surface) -> Option<&ClinicalEntry> {
        self.teeth.get(tooth).and_then(|surfaces| surfaces.get(&surface))
    }

    pub fn get_mut(&mut self, tooth: &str, surface: Surface) -> Option<&mut ClinicalEntry> {
        self.teeth
            .get_mut(tooth)
            .and_then(|surfaces| surfaces.get_mut(&surface))
    }

    pub fn contains(&self, tooth: &str, surface: Surface) -> bool {
        self.get(tooth, surface).is_some()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, tooth: &str, surface: Surface, entry: ClinicalEntry) {
        self.teeth
            .entry(tooth.to_string())
            .or_default()
            .insert(surface, entry);
    }

    /// Remove an entry, dropping the tooth key when it becomes empty.
    pub fn remove(&mut self, tooth: &str, surface: Surface) -> Option<ClinicalEntry> {
        let surfaces = self.teeth.get_mut(tooth)?;
        let removed = surfaces.remove(&surface);
        if surfaces.is_empty() {
            self.teeth.remove(tooth);
        }
        removed
    }

    /// Iterate `(tooth, surface, entry)` over every recorded surface.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Surface, &ClinicalEntry)> {
        self.teeth.iter().flat_map(|(tooth, surfaces)| {
            surfaces
                .iter()
                .map(move |(surface, entry)| (tooth.as_str(), *surface, entry))
        })
    }

    pub fn len(&self) -> usize {
        self.teeth.values().map(|surfaces| surfaces.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.teeth.is_empty()
    }
}
