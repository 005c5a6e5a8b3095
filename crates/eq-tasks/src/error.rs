//! Error taxonomy for the task-builder boundary (§7).
//!
//! Structural/configuration problems (invalid input, grid overflow,
//! inconsistent database data) are raised here, before any task is
//! executed. Per-task numerical problems never reach this type — they are
//! localized to `OptimizationTask::solver_status` instead.

use thiserror::Error;

use eq_solver::SolverError;

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Error, Debug)]
pub enum TaskError {
    /// Negative moles, empty species set, empty element set, non-monotonic
    /// temperature ranges.
    #[error("invalid input: {what}")]
    InvalidInput { what: String },

    /// The requested (temperature × composition) grid exceeds the
    /// implementation limit; the exact count is surfaced to the caller
    /// before any allocation (§4.4, §7).
    #[error("task grid has {count} points, exceeding the limit of {limit}")]
    TaskCountOverflow { count: usize, limit: usize },

    /// The species database returned inconsistent data, e.g. a species
    /// with no temperature ranges at all.
    #[error("database fault: {what}")]
    DatabaseFault { what: String },

    /// A solver invocation failed for structural (not per-task numeric)
    /// reasons while building or validating a task.
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}
