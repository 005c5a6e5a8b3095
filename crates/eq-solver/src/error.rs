//! Error types for the equilibrium and adiabatic-temperature solvers.

use eq_core::EqError;
use eq_thermo::ThermoError;
use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("numeric error: {what}")]
    Numeric { what: String },

    #[error("thermodynamic evaluation error: {0}")]
    Thermo(#[from] ThermoError),
}

impl From<SolverError> for EqError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::ProblemSetup { what } => EqError::InvalidArg {
                what: Box::leak(what.into_boxed_str()),
            },
            SolverError::Numeric { what } => EqError::Invariant {
                what: Box::leak(what.into_boxed_str()),
            },
            SolverError::Thermo(err) => err.into(),
        }
    }
}
