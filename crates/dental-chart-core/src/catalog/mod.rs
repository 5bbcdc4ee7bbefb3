//! Static catalogs: tooth layout, diagnoses, procedures and procedure costs.
//!
//! Immutable lookup tables, built once.

mod clinical;
mod costs;
mod layout;

pub use clinical::*;
pub use costs::*;
pub use layout::*;
