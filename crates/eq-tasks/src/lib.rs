//! Grid fan-out, composition bookkeeping, and parallel dispatch around the
//! `eq-solver` core.
//!
//! This is the outermost layer of the equilibrium engine: it owns the
//! configuration bundle ([`params::Parameters`]), the per-species amount
//! bookkeeping ([`amounts::Composition`]), the range tabulator
//! ([`range::tabulate`]), the task builder that expands a parameter set
//! plus initial amounts into an array of independent
//! [`builder::OptimizationTask`]s, the read-only
//! [`database::SpeciesDatabase`] interface the caller's species lookup
//! implements, and the [`executor`] that maps the task array over a
//! bounded worker pool.

pub mod amounts;
pub mod builder;
pub mod database;
pub mod error;
pub mod executor;
pub mod params;
pub mod range;

pub use amounts::{Amount, Composition, Field};
pub use builder::{MAX_TASKS, OptimizationTask, SpeciesInputs, build_tasks, initial_mol};
pub use database::{SpeciesDatabase, SpeciesFilter, SpeciesRecord};
pub use error::{TaskError, TaskResult};
pub use executor::{BatchOutcome, CancellationToken, effective_threads, run_batch};
pub use params::{CompositionUnit, Parameters, RangeSpec, Target, WorkMode};
pub use range::tabulate;

pub use eq_solver::SolverStatus;
