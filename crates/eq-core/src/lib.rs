//! Shared foundation for the equilibrium engine.
//!
//! Contains:
//! - units (temperature-scale conversion)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact ids for species and elements)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{EqError, EqResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
