//! HSC-convention piecewise formulas: `Cp` given in closed form, `H` and `S`
//! obtained by integrating `Cp` and `Cp/T` outward from the reference
//! temperature `T0`, picking up each range's stored `h_ref`/`s_ref` as a
//! phase-transition offset whenever the integration path crosses into a new
//! range.

use crate::temp_range::{TempRange, select_range};
use crate::thermo::R;

/// Reference temperature, kelvin.
pub const T0: f64 = 298.15;

#[inline]
fn cp_closed_form(r: &TempRange, t: f64) -> f64 {
    let (a, b, c, d, e, fc) = (r.f1, r.f2, r.f3, r.f4, r.f5, r.f6);
    let cp = a + b * t * 1e-3 + c * 1e5 / (t * t) + d * t * t * 1e-6 + e * 1e8 / (t * t * t)
        + fc * t * t * t * 1e-9;
    cp.max(0.0)
}

/// Heat capacity at constant pressure, J/mol·K. Clamped to be non-negative.
pub fn cp_j(ranges: &[TempRange], t: f64) -> f64 {
    let r = select_range(ranges, t);
    cp_closed_form(r, t)
}

#[inline]
fn antideriv_h(r: &TempRange, t: f64) -> f64 {
    let (a, b, c, d, e, fc) = (r.f1, r.f2, r.f3, r.f4, r.f5, r.f6);
    a * t + b * 1e-3 * t * t / 2.0 - c * 1e5 / t + d * 1e-6 * t * t * t / 3.0
        - e * 5e7 / (t * t)
        + fc * 1e-9 * t * t * t * t / 4.0
}

/// Definite integral of `Cp` from `ta` to `tb`, in kJ, using one range's
/// coefficients (the caller is responsible for splitting at range boundaries).
pub fn integral_of_cp_kj(r: &TempRange, ta: f64, tb: f64) -> f64 {
    1e-3 * (antideriv_h(r, tb) - antideriv_h(r, ta))
}

#[inline]
fn antideriv_s(r: &TempRange, t: f64) -> f64 {
    let (a, b, c, d, e, fc) = (r.f1, r.f2, r.f3, r.f4, r.f5, r.f6);
    a * t.ln() + b * 1e-3 * t - c * 5e4 / (t * t) + d * 5e-7 * t * t
        - e * (1e8 / 3.0) / (t * t * t)
        + fc * (1e-9 / 3.0) * t * t * t
}

/// Definite integral of `Cp/T` from `ta` to `tb`, in J/K.
pub fn integral_of_cp_by_t_j(r: &TempRange, ta: f64, tb: f64) -> f64 {
    antideriv_s(r, tb) - antideriv_s(r, ta)
}

/// Index of the range that contains the reference temperature `T0`.
fn base_range_index(ranges: &[TempRange]) -> usize {
    let base = select_range(ranges, T0);
    ranges
        .iter()
        .position(|r| r.t_min == base.t_min && r.t_max == base.t_max)
        .unwrap_or(0)
}

/// Enthalpy, kJ/mol, accumulated from `T0` out to `t` across range boundaries.
pub fn h_kj(ranges: &[TempRange], t: f64) -> f64 {
    let base_idx = base_range_index(ranges);
    let mut h = ranges[base_idx].h_ref;

    if t >= T0 {
        let mut idx = base_idx;
        let mut lo = T0;
        loop {
            let r = &ranges[idx];
            let hi = t.min(r.t_max);
            h += integral_of_cp_kj(r, lo, hi);
            if t <= r.t_max || idx + 1 == ranges.len() {
                break;
            }
            idx += 1;
            h += ranges[idx].h_ref;
            lo = r.t_max;
        }
    } else {
        let mut idx = base_idx;
        let mut hi = T0;
        loop {
            let r = &ranges[idx];
            let lo = t.max(r.t_min);
            h -= integral_of_cp_kj(r, lo, hi);
            if t >= r.t_min || idx == 0 {
                break;
            }
            idx -= 1;
            h -= ranges[idx].h_ref;
            hi = r.t_min;
        }
    }
    h
}

/// Enthalpy, J/mol.
pub fn h_j(ranges: &[TempRange], t: f64) -> f64 {
    h_kj(ranges, t) * 1e3
}

/// Entropy, J/mol·K, accumulated the same way as [`h_kj`] using `s_ref`
/// offsets and `Cp/T` integration.
pub fn s_j(ranges: &[TempRange], t: f64) -> f64 {
    let base_idx = base_range_index(ranges);
    let mut s = ranges[base_idx].s_ref;

    if t >= T0 {
        let mut idx = base_idx;
        let mut lo = T0;
        loop {
            let r = &ranges[idx];
            let hi = t.min(r.t_max);
            s += integral_of_cp_by_t_j(r, lo, hi);
            if t <= r.t_max || idx + 1 == ranges.len() {
                break;
            }
            idx += 1;
            s += ranges[idx].s_ref;
            lo = r.t_max;
        }
    } else {
        let mut idx = base_idx;
        let mut hi = T0;
        loop {
            let r = &ranges[idx];
            let lo = t.max(r.t_min);
            s -= integral_of_cp_by_t_j(r, lo, hi);
            if t >= r.t_min || idx == 0 {
                break;
            }
            idx -= 1;
            s -= ranges[idx].s_ref;
            hi = r.t_min;
        }
    }
    s
}

/// Gibbs free energy, kJ/mol.
pub fn g_kj(ranges: &[TempRange], t: f64) -> f64 {
    h_kj(ranges, t) - 1e-3 * t * s_j(ranges, t)
}

/// Helmholtz-style potential `F`, J/mol·K.
pub fn f_j(ranges: &[TempRange], t: f64) -> f64 {
    let base_idx = base_range_index(ranges);
    let h_j_t0 = ranges[base_idx].h_ref * 1e3;
    -(1e3 * g_kj(ranges, t) - h_j_t0) / t
}

/// Dimensionless Gibbs potential `c = G·10³/(R·T)`.
pub fn c(ranges: &[TempRange], t: f64) -> f64 {
    1e3 * g_kj(ranges, t) / (R * t)
}
