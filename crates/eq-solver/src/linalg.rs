//! Dense linear solve shared by the SQP and augmented-Lagrangian stages.

use nalgebra::{DMatrix, DVector};

use crate::error::{SolverError, SolverResult};

/// Solve `a * x = rhs`, falling back to an SVD pseudo-inverse when `a` is
/// singular or ill-conditioned. Mirrors the LU-then-SVD fallback used by the
/// network solver's Newton step.
pub fn solve_dense(a: &DMatrix<f64>, rhs: &DVector<f64>) -> SolverResult<DVector<f64>> {
    if let Some(x) = a.clone().lu().solve(rhs) {
        return Ok(x);
    }
    let svd = a.clone().svd(true, true);
    let threshold = 1e-10 * svd.singular_values.max();
    svd.solve(rhs, threshold).map_err(|_| SolverError::Numeric {
        what: "system is severely ill-conditioned; SVD pseudo-inverse failed".to_string(),
    })
}
