//! Bounded, equality-constrained SQP stage (§4.5, stage 1 and stage 3).
//!
//! A sequential-quadratic-programming step solves the KKT system of a
//! BFGS-approximated quadratic model of `Φ` under the linearized equality
//! constraint `A*dn = b - A*n`, then backtracks the step until it stays
//! inside the bounds and reduces an `l1` merit function. This plays the
//! role the source pipeline gives to NLopt's SLSQP.

use std::time::{Duration, Instant};

use nalgebra::{DMatrix, DVector};

use crate::error::SolverResult;
use crate::linalg::solve_dense;
use crate::objective::{self, PhaseGroups};
use crate::problem::EquilibriumProblem;
use crate::status::SolverStatus;

/// Tolerances and caps shared by both optimizer stages (§4.5, §6).
#[derive(Clone, Copy, Debug)]
pub struct SolveConfig {
    pub xtol: f64,
    pub ctol: f64,
    pub max_iterations: usize,
    pub timeout: Duration,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            xtol: 1e-6,
            ctol: 1e-6,
            max_iterations: 200,
            timeout: Duration::from_secs(1),
        }
    }
}

/// Outcome of one optimizer stage.
pub struct StageResult {
    pub n: DVector<f64>,
    pub phi: f64,
    pub status: SolverStatus,
}

fn merit(problem: &EquilibriumProblem, n: &DVector<f64>, negate: bool, penalty: f64) -> f64 {
    let phi = objective::objective(n, &problem.c, problem.groups, negate);
    let violation = (&problem.a * n - &problem.b).abs().sum();
    phi + penalty * violation
}

fn clip_to_bounds(n: &DVector<f64>, ub: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(n.len(), n.iter().zip(ub.iter()).map(|(&x, &u)| x.clamp(0.0, u)))
}

/// Run the SQP stage from starting point `n0` (already clipped to bounds
/// by the caller). Returns the best iterate found and its terminal status.
pub fn solve(problem: &EquilibriumProblem, n0: &DVector<f64>, negate: bool, config: &SolveConfig) -> SolverResult<StageResult> {
    let n_vars = problem.n();
    let m = problem.m();
    let started = Instant::now();

    let mut n = clip_to_bounds(n0, &problem.ub);
    let mut h = DMatrix::<f64>::identity(n_vars, n_vars);
    let penalty = 10.0 * (problem.c.amax().max(1.0));

    let mut status = SolverStatus::MaxevalReached;

    for _iter in 0..config.max_iterations {
        if started.elapsed() > config.timeout {
            status = SolverStatus::MaxtimeReached;
            break;
        }

        let g = objective::gradient(&n, &problem.c, problem.groups, negate);
        let residual = &problem.b - &problem.a * &n;

        // KKT system for the equality-constrained QP step:
        // [H  A^T] [dn]     [-g]
        // [A   0 ] [lam]  =  [residual]
        let mut kkt = DMatrix::<f64>::zeros(n_vars + m, n_vars + m);
        kkt.view_mut((0, 0), (n_vars, n_vars)).copy_from(&h);
        kkt.view_mut((0, n_vars), (n_vars, m)).copy_from(&problem.a.transpose());
        kkt.view_mut((n_vars, 0), (m, n_vars)).copy_from(&problem.a);

        let mut rhs = DVector::<f64>::zeros(n_vars + m);
        rhs.rows_mut(0, n_vars).copy_from(&(-&g));
        rhs.rows_mut(n_vars, m).copy_from(&residual);

        let step = solve_dense(&kkt, &rhs)?;
        let dn = step.rows(0, n_vars).clone_owned();

        let base_merit = merit(problem, &n, negate, penalty);
        let mut alpha = 1.0;
        let mut n_trial = clip_to_bounds(&(&n + alpha * &dn), &problem.ub);
        let mut accepted = false;
        for _ls in 0..30 {
            let trial_merit = merit(problem, &n_trial, negate, penalty);
            if trial_merit <= base_merit || alpha < 1e-12 {
                accepted = trial_merit <= base_merit;
                break;
            }
            alpha *= 0.5;
            n_trial = clip_to_bounds(&(&n + alpha * &dn), &problem.ub);
        }

        let g_new = objective::gradient(&n_trial, &problem.c, problem.groups, negate);
        let s = &n_trial - &n;
        let y = &g_new - &g;
        let sy = s.dot(&y);
        if sy > 1e-12 {
            let hs = &h * &s;
            let shs = s.dot(&hs);
            if shs > 1e-12 {
                h = &h - (&hs * hs.transpose()) / shs + (&y * y.transpose()) / sy;
            }
        }

        let step_norm = s.norm();
        let constraint_violation = (&problem.a * &n_trial - &problem.b).abs().max();
        n = n_trial;

        if !accepted {
            status = SolverStatus::Failure;
            break;
        }

        if step_norm < config.xtol && constraint_violation < config.ctol * problem.b.abs().max().max(1.0) {
            status = SolverStatus::XtolReached;
            break;
        }
    }

    let phi = objective::objective(&n, &problem.c, problem.groups, negate);
    Ok(StageResult { n, phi, status })
}
