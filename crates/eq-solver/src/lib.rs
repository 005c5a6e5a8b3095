//! Equilibrium and adiabatic-temperature solvers (§4.5, §4.6).
//!
//! This crate owns the nonlinear core: given the per-species thermodynamic
//! coefficients and element composition for one (temperature, composition)
//! point, it classifies species by phase, assembles the bound- and
//! equality-constrained Gibbs-minimization problem, and runs the
//! SQP → AugLag-EQ → SQP pipeline to find the equilibrium composition.
//! [`adiabatic::solve_adiabatic`] wraps the equilibrium solve in a
//! bracketed bisection over temperature.

pub mod adiabatic;
pub mod auglag;
pub mod equilibrium;
pub mod error;
pub mod linalg;
pub mod objective;
pub mod params;
pub mod problem;
pub mod sqp;
pub mod status;

pub use adiabatic::{AdiabaticResult, HInitialBy, bisection_epsilon, h_eq_kj, h_initial_kj, solve_adiabatic};
pub use equilibrium::{EquilibriumInputs, EquilibriumResult, solve_equilibrium};
pub use error::{SolverError, SolverResult};
pub use objective::PhaseGroups;
pub use params::{Extrapolation, LiquidSolution, Minimization};
pub use problem::{EquilibriumProblem, PhaseOrdering, build_problem, reorder_by_phase};
pub use sqp::SolveConfig;
pub use status::SolverStatus;
