//! Adiabatic-temperature solver (§4.6): bracketed bisection over `T`,
//! repeatedly invoking the equilibrium solver and comparing equilibrium
//! enthalpy to the initial enthalpy.

use tracing::{debug, instrument};

use eq_thermo::{Database, TempRange};

use crate::equilibrium::{EquilibriumInputs, EquilibriumResult, solve_equilibrium};
use crate::error::SolverResult;

/// Lower bracket temperature, kelvin (§6).
pub const T_LO_DEFAULT: f64 = 298.15;
/// Upper bracket temperature, kelvin (§6).
pub const T_HI_DEFAULT: f64 = 10_000.0;

/// Policy for computing the initial enthalpy the bisection targets (§4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HInitialBy {
    /// `H_init = Σ nᵢ · H(T_init)` over the species as given.
    AsChecked,
    /// Each species with nonzero initial moles is substituted by whichever
    /// species sharing its element composition has the lowest `G(T_init)`
    /// before the enthalpy sum.
    ByMinimumGibbsEnergy,
}

/// Outcome of the adiabatic-temperature search.
pub struct AdiabaticResult {
    pub t_current_k: f64,
    pub equilibrium: EquilibriumResult,
    pub h_initial_kj: f64,
    pub h_current_kj: f64,
}

/// Enthalpy of a mixture `n_mol` (in the task's original species order) at
/// `t_k`, summed species by species. Exposed for callers (the task
/// executor) that need `H_current` for an `Equilibrium`-target task, not
/// only for the bisection this module runs internally.
pub fn h_eq_kj(inputs: &EquilibriumInputs<'_>, n_mol: &[f64], t_k: f64) -> f64 {
    inputs
        .coeffs
        .iter()
        .zip(n_mol)
        .map(|(ranges, &n)| n * inputs.database.h_kj(ranges, t_k))
        .sum()
}

/// Compute `H_init` per the selected policy (§4.6).
///
/// `element_comp` and `coeffs` here range over *all* candidate species
/// known for this run (not only those with nonzero initial moles), since
/// `ByMinimumGibbsEnergy` must scan every species sharing an element
/// composition, including ones currently absent from the mixture.
pub fn h_initial_kj(
    database: Database,
    coeffs: &[Vec<TempRange>],
    element_comp: &[Vec<f64>],
    initial_mol: &[f64],
    t_init_k: f64,
    policy: HInitialBy,
) -> f64 {
    match policy {
        HInitialBy::AsChecked => coeffs
            .iter()
            .zip(initial_mol)
            .map(|(ranges, &n)| n * database.h_kj(ranges, t_init_k))
            .sum(),
        HInitialBy::ByMinimumGibbsEnergy => {
            let mut total = 0.0;
            for (i, &n) in initial_mol.iter().enumerate() {
                if n == 0.0 {
                    continue;
                }
                let mut best_idx = i;
                let mut best_g = database.g_kj(&coeffs[i], t_init_k);
                for (j, comp_j) in element_comp.iter().enumerate() {
                    if j == i || comp_j != &element_comp[i] {
                        continue;
                    }
                    let g_j = database.g_kj(&coeffs[j], t_init_k);
                    if g_j < best_g {
                        best_g = g_j;
                        best_idx = j;
                    }
                }
                total += n * database.h_kj(&coeffs[best_idx], t_init_k);
            }
            total
        }
    }
}

/// Bisection accuracy in kelvin for a given number of requested digits
/// (§4.6, §6): `ε_T = 10^(-at_accuracy)/2`.
pub fn bisection_epsilon(at_accuracy: u32) -> f64 {
    10f64.powi(-(at_accuracy as i32)) / 2.0
}

/// Find the adiabatic temperature via bracketed bisection.
#[instrument(skip(inputs), fields(t_init_k))]
pub fn solve_adiabatic(
    inputs: &EquilibriumInputs<'_>,
    all_coeffs: &[Vec<TempRange>],
    all_element_comp: &[Vec<f64>],
    all_initial_mol: &[f64],
    t_init_k: f64,
    policy: HInitialBy,
    at_accuracy: u32,
) -> SolverResult<AdiabaticResult> {
    let h_init = h_initial_kj(inputs.database, all_coeffs, all_element_comp, all_initial_mol, t_init_k, policy);

    let mut t_lo = T_LO_DEFAULT;
    let mut t_hi = T_HI_DEFAULT;

    let eq_lo = solve_equilibrium(inputs, t_lo)?;
    let h_lo = h_eq_kj(inputs, &eq_lo.n_mol, t_lo);
    if h_lo > h_init {
        debug!(t_lo, h_lo, h_init, "system too cold to release; clamped to T_lo");
        return Ok(AdiabaticResult {
            t_current_k: t_lo,
            equilibrium: eq_lo,
            h_initial_kj: h_init,
            h_current_kj: h_lo,
        });
    }

    let eq_hi = solve_equilibrium(inputs, t_hi)?;
    let h_hi = h_eq_kj(inputs, &eq_hi.n_mol, t_hi);
    if h_hi < h_init {
        debug!(t_hi, h_hi, h_init, "never reaches H_init; clamped to T_hi");
        return Ok(AdiabaticResult {
            t_current_k: t_hi,
            equilibrium: eq_hi,
            h_initial_kj: h_init,
            h_current_kj: h_hi,
        });
    }

    let eps_t = bisection_epsilon(at_accuracy);
    let mut last = eq_hi;
    let mut last_h = h_hi;
    let mut last_t = t_hi;

    while t_hi - t_lo > eps_t {
        let t_m = 0.5 * (t_lo + t_hi);
        let eq_m = solve_equilibrium(inputs, t_m)?;
        let h_m = h_eq_kj(inputs, &eq_m.n_mol, t_m);
        if h_m > h_init {
            t_hi = t_m;
        } else {
            t_lo = t_m;
        }
        last = eq_m;
        last_h = h_m;
        last_t = t_m;
    }

    Ok(AdiabaticResult {
        t_current_k: last_t,
        equilibrium: last,
        h_initial_kj: h_init,
        h_current_kj: last_h,
    })
}
