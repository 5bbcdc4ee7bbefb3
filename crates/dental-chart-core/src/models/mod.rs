//! Domain models for the dental chart.

mod clinical;
mod odontogram;
mod patient;
mod plan;
mod tooth;

pub use clinical::*;
pub use odontogram::*;
pub use patient::*;
pub use plan::*;
pub use tooth::*;
