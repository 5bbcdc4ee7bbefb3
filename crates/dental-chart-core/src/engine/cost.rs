//! Cost estimation for clinical entries.

use crate::catalog::CostCatalog;
use crate::models::{ClinicalEntry, CostEstimate, CostFigures, CostSource, Pinned};

/// Generic estimate for a procedure the catalog does not price.
pub const DEFAULT_FALLBACK: CostFigures = CostFigures { minutes: 30, fee: 150.0 };

/// Maps procedures to time and fee.
#[derive(Debug, Clone)]
pub struct CostEstimator {
    catalog: CostCatalog,
    fallback: CostFigures,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(CostCatalog::standard(), DEFAULT_FALLBACK)
    }
}

impl CostEstimator {
    /// Create an estimator over a catalog with a fallback for unknown procedures.
    pub fn new(catalog: CostCatalog, fallback: CostFigures) -> Self {
        let fallback = CostFigures::clamped(fallback.fee, fallback.minutes as f64);
        Self { catalog, fallback }
    }

    pub fn catalog(&self) -> &CostCatalog {
        &self.catalog
    }

    pub fn fallback(&self) -> CostFigures {
        self.fallback
    }

    /// Estimate a procedure.
    ///
    /// Blank → zero with source `none`; exact catalog hit → `catalog`;
    /// anything else → the fallback with source `default`.
    pub fn estimate(&self, procedure: &str) -> CostEstimate {
        let procedure = procedure.trim();
        if procedure.is_empty() {
            return CostEstimate {
                minutes: 0,
                fee: 0.0,
                cost_manual: false,
                source: CostSource::None,
            };
        }

        match self.catalog.lookup(procedure) {
            Some(hit) => CostEstimate {
                minutes: hit.minutes,
                fee: hit.fee,
                cost_manual: false,
                source: CostSource::Catalog,
            },
            None => CostEstimate {
                minutes: self.fallback.minutes,
                fee: self.fallback.fee,
                cost_manual: false,
                source: CostSource::Default,
            },
        }
    }

    /// Auto cost figures for a procedure.
    pub fn auto_figures(&self, procedure: &str) -> CostFigures {
        let estimate = self.estimate(procedure);
        CostFigures {
            minutes: estimate.minutes,
            fee: estimate.fee,
        }
    }

    /// Pin the cost of an entry. Independent of its procedure.
    pub fn set_override(&self, entry: &ClinicalEntry, fee: f64, minutes: f64) -> ClinicalEntry {
        ClinicalEntry {
            cost: Pinned::Manual(CostFigures::clamped(fee, minutes)),
            ..entry.clone()
        }
    }

    /// Drop a cost override and re-estimate from the entry's procedure.
    pub fn revert_to_auto(&self, entry: &ClinicalEntry) -> ClinicalEntry {
        ClinicalEntry {
            cost: Pinned::Auto(self.auto_figures(entry.procedure_name())),
            ..entry.clone()
        }
    }

    /// Resolve the cost shown for an entry: stored figures when pinned,
    /// otherwise a fresh estimate of its procedure.
    pub fn resolve(&self, entry: &ClinicalEntry, procedure: &str) -> CostEstimate {
        match &entry.cost {
            Pinned::Manual(figures) => CostEstimate {
                minutes: figures.minutes,
                fee: figures.fee,
                cost_manual: true,
                source: CostSource::Manual,
            },
            Pinned::Auto(_) => self.estimate(procedure),
        }
    }
}
