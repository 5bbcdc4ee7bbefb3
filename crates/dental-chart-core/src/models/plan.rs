//! Treatment plan and cost estimate models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tooth::{Surface, ToothStatus};

/// Where a cost figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostSource {
    /// Exact hit in the procedure cost catalog
    Catalog,
    /// Unknown procedure, generic fallback estimate
    Default,
    /// User override
    Manual,
    /// No procedure
    None,
}

impl CostSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CostSource::Catalog => "catalog",
            CostSource::Default => "default",
            CostSource::Manual => "manual",
            CostSource::None => "none",
        }
    }
}

/// Result of a cost lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub minutes: u32,
    pub fee: f64,
    pub cost_manual: bool,
    pub source: CostSource,
}

/// One row of the treatment plan. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanItem {
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
}

/// Aggregate time and fee over a plan view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTotals {
    pub total_minutes: u32,
    pub total_fee: f64,
}

/// Status filter applied to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanFilter {
    #[default]
    All,
    AlertsOnly,
    TreatedOnly,
}

impl PlanFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanFilter::All => "all",
            PlanFilter::AlertsOnly => "alertsOnly",
            PlanFilter::TreatedOnly => "treatedOnly",
        }
    }

    /// Whether an item with the given status passes this filter.
    pub fn admits(self, status: ToothStatus) -> bool {
        match self {
            PlanFilter::All => true,
            PlanFilter::AlertsOnly => status == ToothStatus::Alert,
            PlanFilter::TreatedOnly => status == ToothStatus::Treated,
        }
    }
}

impl fmt::Display for PlanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PlanFilter::All),
            "alertsOnly" => Ok(PlanFilter::AlertsOnly),
            "treatedOnly" => Ok(PlanFilter::TreatedOnly),
            other => Err(format!("unknown plan filter: {other}")),
        }
    }
}

/// The surface currently focused in the clinical panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub tooth: String,
    pub surface: Surface,
    pub status: ToothStatus,
}
