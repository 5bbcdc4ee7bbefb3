//! FDI tooth layout.
//!
//! Upper arch 18..11 | 21..28, lower arch 48..41 | 31..38, both listed left to
//! right as drawn on the chart.

use serde::{Deserialize, Serialize};

pub const UPPER_LEFT_TO_RIGHT: [&str; 16] = [
    "18", "17", "16", "15", "14", "13", "12", "11", "21", "22", "23", "24", "25", "26", "27", "28",
];

pub const LOWER_LEFT_TO_RIGHT: [&str; 16] = [
    "48", "47", "46", "45", "44", "43", "42", "41", "31", "32", "33", "34", "35", "36", "37", "38",
];

/// Both arches, as owned strings for callers across the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothLayout {
    pub upper: Vec<String>,
    pub lower: Vec<String>,
}

impl ToothLayout {
    pub fn fdi() -> Self {
        Self {
            upper: UPPER_LEFT_TO_RIGHT.iter().map(|t| t.to_string()).collect(),
            lower: LOWER_LEFT_TO_RIGHT.iter().map(|t| t.to_string()).collect(),
        }
    }
}
