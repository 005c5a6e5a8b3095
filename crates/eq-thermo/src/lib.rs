//! Thermodynamic-function evaluation: piecewise `G`, `H`, `S`, `Cp`, `F`, `c`
//! for a single species at a given temperature, dispatching between the
//! THERMO and HSC coefficient conventions.

pub mod error;
pub mod eval;
pub mod hsc;
pub mod phase;
pub mod temp_range;
pub mod thermo;

pub use error::{ThermoError, ThermoResult};
pub use eval::{Database, ThermoValues};
pub use phase::Phase;
pub use temp_range::{TempRange, is_within_validity, select_range, validate_ranges};
