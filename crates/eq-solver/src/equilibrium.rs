//! Single-point equilibrium solve (§4.5): phase classification, problem
//! assembly, and the three-stage SQP → AugLag-EQ → SQP pipeline.

use nalgebra::DVector;
use tracing::{debug, instrument};

use eq_thermo::{Database, TempRange, is_within_validity, select_range, validate_ranges};

use crate::error::SolverResult;
use crate::params::{Extrapolation, LiquidSolution, Minimization};
use crate::problem::{self, EquilibriumProblem};
use crate::sqp::SolveConfig;
use crate::status::SolverStatus;
use crate::{auglag, sqp};

/// Per-species inputs needed to assemble and solve one equilibrium
/// problem, already restricted to the species the caller wants included
/// (the task builder applies `show_phases` filtering upstream).
pub struct EquilibriumInputs<'a> {
    /// Temperature-range coefficient sequence, one per species.
    pub coeffs: &'a [Vec<TempRange>],
    /// `element_comp[i][j]` = atoms of element `j` in species `i`.
    pub element_comp: &'a [Vec<f64>],
    /// Initial moles of each species.
    pub initial_mol: &'a [f64],
    pub database: Database,
    pub minimization: Minimization,
    pub liquid_solution: LiquidSolution,
    pub extrapolation: Extrapolation,
}

/// Result of one equilibrium solve, species in the caller's original order.
pub struct EquilibriumResult {
    /// Equilibrium moles, original species order.
    pub n_mol: Vec<f64>,
    pub result_of_optimization: f64,
    pub status: SolverStatus,
}

/// Per-species objective coefficient at temperature `t` (§4.5): the
/// dimensionless Gibbs potential for `minimization = Gibbs`, or the
/// entropy-per-species surrogate (preserved verbatim from the source,
/// including its documented inaccuracy — see DESIGN.md) for
/// `minimization = Entropy`.
fn objective_coefficient(database: Database, ranges: &[TempRange], t: f64, minimization: Minimization) -> f64 {
    match minimization {
        Minimization::Gibbs => database.c(ranges, t),
        Minimization::Entropy => database.s_j(ranges, t) / eq_thermo::thermo::R,
    }
}

/// Solve the equilibrium at temperature `t_k`.
#[instrument(skip(inputs), fields(n_species = inputs.coeffs.len(), t_k))]
pub fn solve_equilibrium(inputs: &EquilibriumInputs<'_>, t_k: f64) -> SolverResult<EquilibriumResult> {
    let n_species = inputs.coeffs.len();
    let n_elements = inputs.element_comp.first().map(|row| row.len()).unwrap_or(0);

    for ranges in inputs.coeffs {
        validate_ranges(ranges)?;
    }

    let phases: Vec<eq_thermo::Phase> = inputs
        .coeffs
        .iter()
        .map(|ranges| select_range(ranges, t_k).phase)
        .collect();
    let out_of_range: Vec<bool> = inputs
        .coeffs
        .iter()
        .map(|ranges| !is_within_validity(ranges, t_k))
        .collect();
    let c_coeffs: Vec<f64> = inputs
        .coeffs
        .iter()
        .map(|ranges| objective_coefficient(inputs.database, ranges, t_k, inputs.minimization))
        .collect();

    let ordering = problem::reorder_by_phase(&phases, inputs.liquid_solution);
    let eq_problem: EquilibriumProblem = problem::build_problem(
        &ordering,
        inputs.element_comp,
        inputs.initial_mol,
        &c_coeffs,
        &out_of_range,
        inputs.extrapolation,
        n_elements,
    );

    let negate = matches!(inputs.minimization, Minimization::Entropy);
    let config = SolveConfig::default();

    let n0 = DVector::from_iterator(
        eq_problem.n(),
        eq_problem.ub.iter().map(|&u| if u.is_finite() { u / 2.0 } else { 1.0 }),
    );

    let stage1 = sqp::solve(&eq_problem, &n0, negate, &config)?;
    debug!(status = ?stage1.status, stage = 1, "equilibrium solve stage");
    let result = if stage1.status.is_accepted() {
        stage1
    } else {
        let stage2 = auglag::solve(&eq_problem, &stage1.n, negate, &config)?;
        debug!(status = ?stage2.status, stage = 2, "equilibrium solve stage");
        if stage2.status.is_accepted() {
            stage2
        } else {
            let stage3 = sqp::solve(&eq_problem, &stage2.n, negate, &config)?;
            debug!(status = ?stage3.status, stage = 3, "equilibrium solve stage");
            stage3
        }
    };

    let mut n_mol = vec![0.0_f64; n_species];
    for (new_i, &orig_i) in ordering.order.iter().enumerate() {
        n_mol[orig_i] = result.n[new_i];
    }

    Ok(EquilibriumResult {
        n_mol,
        result_of_optimization: result.phi,
        status: result.status,
    })
}
