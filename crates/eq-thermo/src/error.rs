//! Thermodynamic-evaluation errors.

use eq_core::EqError;
use thiserror::Error;

/// Result type for thermodynamic-function evaluation.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur while evaluating thermodynamic functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// A species has no temperature ranges at all.
    #[error("species has no temperature ranges")]
    NoTempRanges,

    /// Temperature ranges are not sorted or overlap.
    #[error("temperature ranges are not monotonic: {what}")]
    NonMonotonicRanges { what: &'static str },

    /// A computed value is not finite.
    #[error("non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<ThermoError> for EqError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::NoTempRanges => EqError::InvalidArg {
                what: "species has no temperature ranges",
            },
            ThermoError::NonMonotonicRanges { what } => EqError::Invariant { what },
            ThermoError::NonFinite { what, value } => EqError::NonFinite { what, value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::NoTempRanges;
        assert!(err.to_string().contains("no temperature ranges"));
    }

    #[test]
    fn error_to_eq_error() {
        let err = ThermoError::NonFinite {
            what: "Cp",
            value: f64::NAN,
        };
        let eq_err: EqError = err.into();
        assert!(matches!(eq_err, EqError::NonFinite { .. }));
    }
}
