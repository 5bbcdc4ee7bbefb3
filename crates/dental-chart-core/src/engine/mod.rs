//! Clinical engine: recommendation, entry lifecycle and cost estimation.
//!
//! Pipeline on a status change: Odontogram cycle → entry refresh (auto
//! procedure) → cost resync (auto cost)

mod clinical;
mod cost;
mod recommend;

pub use clinical::*;
pub use cost::*;
pub use recommend::*;
