//! Procedure cost catalog and numeric clamp rules.
//!
//! Deterministic demo catalog: procedure name → minutes + fee (USD).
//! Lookups are exact-match; anything else is the caller's fallback.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::CostFigures;

/// Fixed procedure → (minutes, fee) table.
#[derive(Debug, Clone)]
pub struct CostCatalog {
    entries: HashMap<String, CostFigures>,
}

impl Default for CostCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl CostCatalog {
    /// The standard demo table.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();

        entries.insert("Clinical evaluation".into(), CostFigures { minutes: 20, fee: 75.0 });
        entries.insert("Dental cleaning".into(), CostFigures { minutes: 45, fee: 120.0 });
        entries.insert("Filling (composite)".into(), CostFigures { minutes: 45, fee: 220.0 });
        entries.insert("Filling (amalgam)".into(), CostFigures { minutes: 45, fee: 200.0 });
        entries.insert("Root canal therapy".into(), CostFigures { minutes: 90, fee: 950.0 });
        entries.insert("Crown placement".into(), CostFigures { minutes: 90, fee: 1200.0 });
        entries.insert("Extraction".into(), CostFigures { minutes: 45, fee: 280.0 });
        entries.insert("Periodontal scaling".into(), CostFigures { minutes: 60, fee: 350.0 });
        entries.insert("Fluoride treatment".into(), CostFigures { minutes: 15, fee: 35.0 });
        entries.insert("Sealant application".into(), CostFigures { minutes: 20, fee: 60.0 });
        entries.insert("X-rays".into(), CostFigures { minutes: 15, fee: 45.0 });

        Self { entries }
    }

    /// Exact-match lookup.
    pub fn lookup(&self, procedure: &str) -> Option<CostFigures> {
        self.entries.get(procedure).copied()
    }

    /// Catalog keys, sorted.
    pub fn procedures(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Procedures from `vocabulary` with no cost row, each with the most
    /// similar catalog key.
    ///
    /// Reporting only: estimates for these procedures still use the fallback.
    pub fn coverage_gaps<'v>(&self, vocabulary: impl IntoIterator<Item = &'v str>) -> Vec<CoverageGap> {
        let keys = self.procedures();
        vocabulary
            .into_iter()
            .filter(|procedure| self.lookup(procedure).is_none())
            .map(|procedure| {
                let lower = procedure.to_lowercase();
                let nearest = keys
                    .iter()
                    .map(|key| (*key, jaro_winkler(&lower, &key.to_lowercase())))
                    .fold(None, |best: Option<(&str, f64)>, (key, score)| match best {
                        Some((_, best_score)) if best_score >= score => best,
                        _ => Some((key, score)),
                    });

                CoverageGap {
                    procedure: procedure.to_string(),
                    nearest: nearest.map(|(key, _)| key.to_string()),
                    similarity: nearest.map(|(_, score)| score).unwrap_or(0.0),
                }
            })
            .collect()
    }
}

/// A procedure the cost catalog does not price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub procedure: String,
    /// Most similar catalog key, if the catalog is non-empty
    pub nearest: Option<String>,
    /// Jaro-Winkler similarity to `nearest` (0.0 - 1.0)
    pub similarity: f64,
}

/// Clamp a money amount: non-finite or negative → 0, else rounded to cents.
pub fn clamp_money(n: f64) -> f64 {
    if !n.is_finite() || n < 0.0 {
        return 0.0;
    }
    let cents = (n * 100.0).round();
    if cents.is_finite() {
        cents / 100.0
    } else {
        n
    }
}

/// Clamp a minute count: non-finite or negative → 0, else rounded.
pub fn clamp_minutes(n: f64) -> u32 {
    if !n.is_finite() || n < 0.0 {
        return 0;
    }
    n.round().min(u32::MAX as f64) as u32
}

/// Parse numeric text from a form field.
///
/// Blank text is 0; unparsable text is NaN, which the clamp rules turn into 0.
pub fn parse_amount(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a USD amount, e.g. `$1,200.00`.
pub fn format_usd(amount: f64) -> String {
    let cents = (clamp_money(amount) * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}.{:02}", grouped, cents % 100)
}

/// Format a minute count; zero renders as an em dash.
pub fn format_minutes(minutes: f64) -> String {
    match clamp_minutes(minutes) {
        0 => "—".to_string(),
        m => format!("{} min", m),
    }
}
