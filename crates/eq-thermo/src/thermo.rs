//! THERMO (Gurvich-style) piecewise polynomial formulas.
//!
//! Each function takes temperature in kelvin and the full, sorted coefficient
//! sequence for one species; it selects the applicable range internally.

use crate::temp_range::{TempRange, select_range};

/// Universal gas constant, J/mol·K, matching the tabulated coefficient sets.
pub const R: f64 = 8.314_41;

#[inline]
fn x_of(t: f64) -> f64 {
    t * 1e-4
}

/// Helmholtz-style potential function `F`, J/mol·K.
pub fn f(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    let x = x_of(t);
    r.f1 + r.f2 * x.ln() + r.f3 / (x * x) + r.f4 / x + x * (r.f5 + x * (r.f6 + r.f7 * x))
}

/// Enthalpy, kJ/mol.
pub fn h_kj(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    let x = x_of(t);
    10.0 * ((((3.0 * r.f7 * x + 2.0 * r.f6) * x + r.f5) * x + r.f2) * x - r.f4 - 2.0 * r.f3 / x)
        + r.h_ref
}

/// Entropy, J/mol·K.
pub fn s_j(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    let x = x_of(t);
    r.f1 + r.f2 * (1.0 + x.ln()) - r.f3 / (x * x) + x * (2.0 * r.f5 + x * (3.0 * r.f6 + 4.0 * r.f7 * x))
}

/// Heat capacity at constant pressure, J/mol·K. Clamped to be non-negative.
pub fn cp_j(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    let x = x_of(t);
    let cp = r.f2 + 2.0 * (((2.0 * r.f7 * x + r.f6) * 3.0 * x + r.f5) * x + r.f3 / (x * x));
    cp.max(0.0)
}

/// Gibbs free energy, kJ/mol.
pub fn g_kj(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    r.h_ref - t * f(ranges, t) * 1e-3
}

/// Dimensionless Gibbs potential `c = G·10³/(R·T)`, expressed directly from
/// `H_ref` and `F` to avoid recomputing the range lookup twice.
pub fn c(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    1e3 * r.h_ref / (R * t) - f(ranges, t) / R
}
