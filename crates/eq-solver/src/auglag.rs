//! Augmented-Lagrangian-for-equalities stage (§4.5, stage 2).
//!
//! Wraps a bound-constrained inner solve of
//! `L_rho(n) = Φ(n) + λ·(A n - b) + (ρ/2)‖A n - b‖²`
//! with a projected-gradient inner loop, updating the multiplier `λ` and
//! penalty `ρ` after each inner solve. Plays the role the source pipeline
//! gives to NLopt's `AUGLAG_EQ` wrapping an `L-BFGS` inner solver.

use std::time::{Duration, Instant};

use nalgebra::DVector;

use crate::error::SolverResult;
use crate::objective::{self};
use crate::problem::EquilibriumProblem;
use crate::sqp::SolveConfig;
use crate::status::SolverStatus;

fn clip_to_bounds(n: &DVector<f64>, ub: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(n.len(), n.iter().zip(ub.iter()).map(|(&x, &u)| x.clamp(0.0, u)))
}

fn aug_lagrangian(problem: &EquilibriumProblem, n: &DVector<f64>, lambda: &DVector<f64>, rho: f64, negate: bool) -> f64 {
    let phi = objective::objective(n, &problem.c, problem.groups, negate);
    let resid = &problem.a * n - &problem.b;
    phi + lambda.dot(&resid) + 0.5 * rho * resid.dot(&resid)
}

fn aug_lagrangian_grad(
    problem: &EquilibriumProblem,
    n: &DVector<f64>,
    lambda: &DVector<f64>,
    rho: f64,
    negate: bool,
) -> DVector<f64> {
    let g = objective::gradient(n, &problem.c, problem.groups, negate);
    let resid = &problem.a * n - &problem.b;
    let penalty_grad = problem.a.transpose() * (lambda + rho * resid);
    g + penalty_grad
}

/// Projected-gradient inner solve of the bound-constrained subproblem for
/// a fixed `(λ, ρ)`.
fn inner_solve(
    problem: &EquilibriumProblem,
    n0: &DVector<f64>,
    lambda: &DVector<f64>,
    rho: f64,
    negate: bool,
    max_inner_iters: usize,
) -> DVector<f64> {
    let mut n = n0.clone();
    let mut step = 1.0 / rho.max(1.0);

    for _ in 0..max_inner_iters {
        let g = aug_lagrangian_grad(problem, &n, lambda, rho, negate);
        if g.norm() < 1e-10 {
            break;
        }
        let base = aug_lagrangian(problem, &n, lambda, rho, negate);
        let mut alpha = step;
        let mut improved = false;
        for _ in 0..20 {
            let trial = clip_to_bounds(&(&n - alpha * &g), &problem.ub);
            if aug_lagrangian(problem, &trial, lambda, rho, negate) < base {
                n = trial;
                improved = true;
                break;
            }
            alpha *= 0.5;
        }
        if !improved {
            break;
        }
        step = (alpha * 2.0).min(1.0 / rho.max(1.0) * 4.0);
    }
    n
}

/// Run the augmented-Lagrangian stage from `n0`.
pub fn solve(problem: &EquilibriumProblem, n0: &DVector<f64>, negate: bool, config: &SolveConfig) -> SolverResult<crate::sqp::StageResult> {
    let started = Instant::now();
    let mut n = clip_to_bounds(n0, &problem.ub);
    let mut lambda = DVector::<f64>::zeros(problem.m());
    let mut rho = 10.0;

    let b_scale = problem.b.abs().max().max(1.0);
    let mut status = SolverStatus::MaxevalReached;

    for outer in 0..20 {
        if started.elapsed() > config.timeout {
            status = SolverStatus::MaxtimeReached;
            break;
        }

        let n_next = inner_solve(problem, &n, &lambda, rho, negate, 200);
        let resid = &problem.a * &n_next - &problem.b;
        let violation = resid.abs().max();
        let step_norm = (&n_next - &n).norm();
        n = n_next;

        if violation < config.ctol * b_scale && step_norm < config.xtol {
            status = SolverStatus::XtolReached;
            break;
        }

        lambda += rho * &resid;
        if violation > 0.25 * b_scale {
            rho *= 10.0;
        }
        if outer == 19 {
            status = SolverStatus::MaxevalReached;
        }
    }

    let phi = objective::objective(&n, &problem.c, problem.groups, negate);
    Ok(crate::sqp::StageResult { n, phi, status })
}
