//! The Gibbs-mixing objective `Φ(n)` and its gradient.
//!
//! Species are assumed already reordered into contiguous gas / liquid /
//! individual blocks (see [`crate::problem::build_problem`]); this module
//! only needs the block sizes, not the original species identities.

use core::ops::Range;
use eq_core::numeric::log_eps;
use nalgebra::DVector;

/// Regularization constant for [`eq_core::numeric::log_eps`] inside the
/// objective. Load-bearing: do not replace with a plain `ln` guarded by
/// `n > 0`, the gradient must stay continuous at `n == 0`.
pub const EPS_LOG: f64 = 1e-9;

/// Contiguous block sizes after phase reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseGroups {
    pub n_gas: usize,
    pub n_liq: usize,
    pub n_ind: usize,
}

impl PhaseGroups {
    pub fn total(&self) -> usize {
        self.n_gas + self.n_liq + self.n_ind
    }

    fn gas_range(&self) -> Range<usize> {
        0..self.n_gas
    }

    fn liq_range(&self) -> Range<usize> {
        self.n_gas..self.n_gas + self.n_liq
    }

    fn ind_range(&self) -> Range<usize> {
        self.n_gas + self.n_liq..self.total()
    }
}

/// Gibbs-mixing objective. When `negate` is set (entropy maximization via
/// minimization of `-S`), the whole expression is negated, matching the
/// source behavior rather than negating each term independently.
pub fn objective(n: &DVector<f64>, c: &DVector<f64>, groups: PhaseGroups, negate: bool) -> f64 {
    let sum_gas: f64 = groups.gas_range().map(|i| n[i]).sum();
    let sum_liq: f64 = groups.liq_range().map(|i| n[i]).sum();
    let log_gas = log_eps(sum_gas, EPS_LOG);
    let log_liq = log_eps(sum_liq, EPS_LOG);

    let mut phi = 0.0;
    for i in groups.gas_range() {
        phi += n[i] * (c[i] + log_eps(n[i], EPS_LOG) - log_gas);
    }
    for i in groups.liq_range() {
        phi += n[i] * (c[i] + log_eps(n[i], EPS_LOG) - log_liq);
    }
    for i in groups.ind_range() {
        phi += n[i] * c[i];
    }
    if negate { -phi } else { phi }
}

/// Gradient matching [`objective`] exactly, term for term.
pub fn gradient(n: &DVector<f64>, c: &DVector<f64>, groups: PhaseGroups, negate: bool) -> DVector<f64> {
    let sum_gas: f64 = groups.gas_range().map(|i| n[i]).sum();
    let sum_liq: f64 = groups.liq_range().map(|i| n[i]).sum();
    let log_gas = log_eps(sum_gas, EPS_LOG);
    let log_liq = log_eps(sum_liq, EPS_LOG);

    let mut g = DVector::zeros(groups.total());
    for i in groups.gas_range() {
        g[i] = c[i] + log_eps(n[i], EPS_LOG) - log_gas;
    }
    for i in groups.liq_range() {
        g[i] = c[i] + log_eps(n[i], EPS_LOG) - log_liq;
    }
    for i in groups.ind_range() {
        g[i] = c[i];
    }
    if negate { -g } else { g }
}
