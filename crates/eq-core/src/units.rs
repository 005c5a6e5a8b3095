//! Temperature unit conversion.
//!
//! The solver always works in kelvin internally; this module is the single
//! place input/output temperatures cross that boundary, backed by `uom` so
//! the conversion factors (and the Celsius/Fahrenheit offsets) are not
//! hand-rolled.

use uom::si::f64::ThermodynamicTemperature;
use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};

use crate::numeric::Real;

/// Temperature scale a caller's input/output values are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

/// Convert a value in `unit` to kelvin.
pub fn to_kelvin(value: Real, unit: TemperatureUnit) -> Real {
    let t = match unit {
        TemperatureUnit::Kelvin => ThermodynamicTemperature::new::<kelvin>(value),
        TemperatureUnit::Celsius => ThermodynamicTemperature::new::<degree_celsius>(value),
        TemperatureUnit::Fahrenheit => ThermodynamicTemperature::new::<degree_fahrenheit>(value),
    };
    t.get::<kelvin>()
}

/// Convert a kelvin value to `unit`.
pub fn from_kelvin(value_k: Real, unit: TemperatureUnit) -> Real {
    let t = ThermodynamicTemperature::new::<kelvin>(value_k);
    match unit {
        TemperatureUnit::Kelvin => t.get::<kelvin>(),
        TemperatureUnit::Celsius => t.get::<degree_celsius>(),
        TemperatureUnit::Fahrenheit => t.get::<degree_fahrenheit>(),
    }
}
