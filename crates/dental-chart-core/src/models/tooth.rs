//! Tooth surface and status models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five anatomical faces of a tooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Surface {
    #[serde(rename = "O")]
    Occlusal,
    #[serde(rename = "M")]
    Mesial,
    #[serde(rename = "D")]
    Distal,
    #[serde(rename = "B")]
    Buccal,
    #[serde(rename = "L")]
    Lingual,
}

impl Surface {
    /// All surfaces in odontogram display order (O, M, D, B, L).
    pub const ALL: [Surface; 5] = [
        Surface::Occlusal,
        Surface::Mesial,
        Surface::Distal,
        Surface::Buccal,
        Surface::Lingual,
    ];

    /// Single-letter code used in exports and at the FFI boundary.
    pub fn code(self) -> &'static str {
        match self {
            Surface::Occlusal => "O",
            Surface::Mesial => "M",
            Surface::Distal => "D",
            Surface::Buccal => "B",
            Surface::Lingual => "L",
        }
    }

    /// Human-readable surface name.
    pub fn label(self) -> &'static str {
        match self {
            Surface::Occlusal => "Occlusal",
            Surface::Mesial => "Mesial",
            Surface::Distal => "Distal",
            Surface::Buccal => "Buccal",
            Surface::Lingual => "Lingual",
        }
    }

    /// Parse a single-letter surface code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "O" => Some(Surface::Occlusal),
            "M" => Some(Surface::Mesial),
            "D" => Some(Surface::Distal),
            "B" => Some(Surface::Buccal),
            "L" => Some(Surface::Lingual),
            _ => None,
        }
    }

    /// Mesial or distal.
    pub fn is_proximal(self) -> bool {
        matches!(self, Surface::Mesial | Surface::Distal)
    }

    pub fn is_occlusal(self) -> bool {
        matches!(self, Surface::Occlusal)
    }

    /// Buccal or lingual.
    pub fn is_buccal_lingual(self) -> bool {
        matches!(self, Surface::Buccal | Surface::Lingual)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Clinical state of one tooth surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToothStatus {
    #[default]
    Normal,
    Alert,
    Treated,
}

impl ToothStatus {
    /// Next status in the cycle `normal → alert → treated → normal`.
    pub fn next(self) -> Self {
        match self {
            ToothStatus::Normal => ToothStatus::Alert,
            ToothStatus::Alert => ToothStatus::Treated,
            ToothStatus::Treated => ToothStatus::Normal,
        }
    }

    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            ToothStatus::Normal => "normal",
            ToothStatus::Alert => "alert",
            ToothStatus::Treated => "treated",
        }
    }

    /// Plan ordering rank: alerts first, then treated, then normal.
    pub fn plan_rank(self) -> u8 {
        match self {
            ToothStatus::Alert => 0,
            ToothStatus::Treated => 1,
            ToothStatus::Normal => 2,
        }
    }
}

impl fmt::Display for ToothStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToothStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(ToothStatus::Normal),
            "alert" => Ok(ToothStatus::Alert),
            "treated" => Ok(ToothStatus::Treated),
            other => Err(format!("unknown tooth status: {other}")),
        }
    }
}
