//! Phase reordering and `A`/`b`/`c`/`ub` assembly for one equilibrium call.

use nalgebra::{DMatrix, DVector};

use eq_thermo::Phase;

use crate::objective::PhaseGroups;
use crate::params::{Extrapolation, LiquidSolution};

/// Result of reordering species by phase at the current temperature.
///
/// `order[new_index]` is the index of that species in the caller's
/// original (input) ordering; everything downstream of assembly works in
/// the new, phase-grouped order and is mapped back at the end.
#[derive(Clone, Debug)]
pub struct PhaseOrdering {
    pub order: Vec<usize>,
    pub groups: PhaseGroups,
}

/// Reorder species so gases come first, then liquids, then everything else
/// ("individual": solids and, when `liquid_solution = No`, liquids too).
///
/// `phases` is indexed in the caller's original species order and holds
/// each species' phase tag *at the current temperature* (the tag of
/// whichever `TempRange` is selected there, since a species can change
/// phase as `T` sweeps).
pub fn reorder_by_phase(phases: &[Phase], liquid_solution: LiquidSolution) -> PhaseOrdering {
    let mut gas = Vec::new();
    let mut liq = Vec::new();
    let mut ind = Vec::new();

    for (i, &phase) in phases.iter().enumerate() {
        match phase {
            Phase::Gas => gas.push(i),
            Phase::Liquid => match liquid_solution {
                LiquidSolution::One => liq.push(i),
                LiquidSolution::No => ind.push(i),
            },
            Phase::Solid => ind.push(i),
        }
    }

    let groups = PhaseGroups {
        n_gas: gas.len(),
        n_liq: liq.len(),
        n_ind: ind.len(),
    };

    let mut order = gas;
    order.extend(liq);
    order.extend(ind);

    PhaseOrdering { order, groups }
}

/// The assembled, bound-constrained equality-constrained minimization
/// problem for one equilibrium call, in phase-grouped order.
#[derive(Clone, Debug)]
pub struct EquilibriumProblem {
    pub groups: PhaseGroups,
    /// `order[new_index] = original_index`.
    pub order: Vec<usize>,
    /// `M x N` element-balance matrix, columns in the new order.
    pub a: DMatrix<f64>,
    /// Conserved element totals, length `M`.
    pub b: DVector<f64>,
    /// Per-species objective coefficient, length `N`, new order.
    pub c: DVector<f64>,
    /// Per-species upper bound, length `N`, new order.
    pub ub: DVector<f64>,
}

impl EquilibriumProblem {
    pub fn n(&self) -> usize {
        self.groups.total()
    }

    pub fn m(&self) -> usize {
        self.b.len()
    }
}

/// Assemble `A`, `b`, `c`, `ub` for one equilibrium call.
///
/// - `element_comp[i][j]` is the atom count of element `j` in (original)
///   species `i`.
/// - `initial_mol[i]` is the initial moles of (original) species `i`.
/// - `c_coeffs[i]` is the per-species objective coefficient (Gibbs
///   potential or entropy surrogate, already evaluated at the current
///   temperature).
/// - `out_of_range[i]` marks species outside their tabulated validity
///   domain at the current temperature.
#[allow(clippy::too_many_arguments)]
pub fn build_problem(
    ordering: &PhaseOrdering,
    element_comp: &[Vec<f64>],
    initial_mol: &[f64],
    c_coeffs: &[f64],
    out_of_range: &[bool],
    extrapolation: Extrapolation,
    n_elements: usize,
) -> EquilibriumProblem {
    let n = ordering.order.len();
    let m = n_elements;

    let mut a = DMatrix::<f64>::zeros(m, n);
    for (new_i, &orig_i) in ordering.order.iter().enumerate() {
        for j in 0..m {
            a[(j, new_i)] = element_comp[orig_i][j];
        }
    }

    let mut b = DVector::<f64>::zeros(m);
    for j in 0..m {
        let mut total = 0.0;
        for (orig_i, mol) in initial_mol.iter().enumerate() {
            total += mol * element_comp[orig_i][j];
        }
        b[j] = total;
    }

    let mut c = DVector::<f64>::zeros(n);
    let mut ub = DVector::<f64>::zeros(n);
    for (new_i, &orig_i) in ordering.order.iter().enumerate() {
        c[new_i] = c_coeffs[orig_i];

        let mut bound = f64::INFINITY;
        for j in 0..m {
            let aij = a[(j, new_i)];
            if aij > 0.0 {
                bound = bound.min(b[j] / aij);
            }
        }
        if matches!(extrapolation, Extrapolation::Disable) && out_of_range[orig_i] {
            bound = 0.0;
        }
        ub[new_i] = bound;
    }

    EquilibriumProblem {
        groups: ordering.groups,
        order: ordering.order.clone(),
        a,
        b,
        c,
        ub,
    }
}
