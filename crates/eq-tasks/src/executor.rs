//! Parallel executor (§4.7, §5): maps the task array built by
//! [`crate::builder::build_tasks`] over a bounded worker pool, one
//! equilibrium (or adiabatic-temperature) solve per task, reporting
//! monotonic progress and honoring cooperative cancellation.
//!
//! Grounded in the donor's worker/progress split (`tf-app::progress`'s
//! stage-event struct, `tf-ui::run_worker`'s channel-fed background
//! thread): here the "worker" is a `rayon` pool sized from `Parameters`
//! rather than a single `std::thread::spawn`, since §4.7 asks for a
//! fixed-size pool of CPU-bound, mutually independent tasks rather than
//! one long-running background job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::ThreadPoolBuilder;
use tracing::{info, instrument};

use eq_solver::{EquilibriumInputs, SolverStatus, h_eq_kj, solve_adiabatic, solve_equilibrium};

use crate::amounts::{Composition, Field};
use crate::builder::{OptimizationTask, SpeciesInputs, initial_mol};
use crate::params::Target;

/// Cooperative cancellation handle shared between the caller and the pool
/// (§5 "Cancellation semantics"). Cloning shares the same underlying flag.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Already-dispatched tasks still run to
    /// completion; no new tasks are started after this call is observed.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of running one batch through the executor.
pub enum BatchOutcome {
    /// Every task ran (each task's own `solver_status` still distinguishes
    /// success from per-task failure, §7).
    Completed(Vec<OptimizationTask>),
    /// The caller canceled before the batch finished; per §5 the result
    /// vector is treated as empty.
    Canceled,
}

/// Clamp a requested worker count to host parallelism, the donor's
/// `MaxThreadsCount` behavior: `0` means "auto", anything else is capped
/// rather than trusted outright.
pub fn effective_threads(requested: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    if requested == 0 {
        available
    } else {
        requested.min(available)
    }
}

/// Run every task in `tasks`, dispatching up to `threads` at a time
/// (`0` = auto, see [`effective_threads`]). `on_progress(completed, total)`
/// is invoked after each task finishes; intermediate values may be
/// coalesced by the caller but are always monotonically increasing here.
/// `cancel` is polled at each task's dispatch boundary — tasks already
/// executing when cancellation is observed are allowed to finish, but no
/// further tasks start and the batch result is [`BatchOutcome::Canceled`].
#[instrument(skip(tasks, on_progress, cancel), fields(total = tasks.len()))]
pub fn run_batch(
    mut tasks: Vec<OptimizationTask>,
    threads: usize,
    on_progress: impl Fn(usize, usize) + Send + Sync,
    cancel: &CancellationToken,
) -> BatchOutcome {
    let total = tasks.len();
    if total == 0 {
        return BatchOutcome::Completed(tasks);
    }
    if cancel.is_canceled() {
        return BatchOutcome::Canceled;
    }

    if total <= 1 {
        solve_one(&mut tasks[0]);
        on_progress(1, total);
        return BatchOutcome::Completed(tasks);
    }

    let worker_count = effective_threads(threads);
    info!(worker_count, total, "dispatching equilibrium batch");
    let pool = ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .build()
        .expect("a positive thread count always builds a pool");

    let completed = AtomicUsize::new(0);
    pool.install(|| {
        use rayon::prelude::*;
        tasks.par_iter_mut().for_each(|task| {
            if cancel.is_canceled() {
                return;
            }
            solve_one(task);
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            on_progress(done, total);
        });
    });

    if cancel.is_canceled() {
        BatchOutcome::Canceled
    } else {
        BatchOutcome::Completed(tasks)
    }
}

/// Build a `Composition` whose every species sits entirely in group 1
/// (the fixed base), with amounts `n_mol` — the equilibrium composition
/// has no group1/group2 split of its own, so this is the simplest
/// representation that still fills all eight [`crate::amounts::Amount`]
/// fields consistently.
fn composition_from_mol(species: &SpeciesInputs, n_mol: &[f64]) -> Composition {
    let mut comp = Composition::new(species.ids.iter().map(|id| (*id, species.weights.get(id).copied().unwrap_or(0.0))));
    for (id, &n) in species.ids.iter().zip(n_mol) {
        comp.set_species_field(*id, Field::Group1Mol, n)
            .expect("species was just inserted into this composition");
    }
    comp
}

/// Run the solve this task asks for (`Equilibrium` or
/// `AdiabaticTemperature`, §3) and populate its output fields in place.
/// A solver error of any kind is coerced to [`SolverStatus::Failure`]
/// (§7 "Solver exception") rather than aborting the batch.
fn solve_one(task: &mut OptimizationTask) {
    let coeffs = task.species.coeffs_aligned();
    let element_comp = task.species.element_comp_aligned();
    let initial_mol_vec = initial_mol(&task.species, &task.initial);

    let inputs = EquilibriumInputs {
        coeffs: &coeffs,
        element_comp: &element_comp,
        initial_mol: &initial_mol_vec,
        database: task.params.database,
        minimization: task.params.minimization,
        liquid_solution: task.params.liquid_solution,
        extrapolation: task.params.extrapolation,
    };

    match task.params.target {
        Target::Equilibrium => {
            let t_k = task.t_current_k.unwrap_or(task.t_init_k);
            match solve_equilibrium(&inputs, t_k) {
                Ok(result) => {
                    let h_current = h_eq_kj(&inputs, &result.n_mol, t_k);
                    task.equilibrium = Some(composition_from_mol(&task.species, &result.n_mol));
                    task.t_current_k = Some(t_k);
                    task.h_current_kj = Some(h_current);
                    task.result_of_optimization = Some(result.result_of_optimization);
                    task.solver_status = Some(result.status);
                }
                Err(_) => task.solver_status = Some(SolverStatus::Failure),
            }
        }
        Target::AdiabaticTemperature => {
            match solve_adiabatic(
                &inputs,
                &coeffs,
                &element_comp,
                &initial_mol_vec,
                task.t_init_k,
                task.params.h_initial_by,
                task.params.at_accuracy,
            ) {
                Ok(outcome) => {
                    task.equilibrium = Some(composition_from_mol(&task.species, &outcome.equilibrium.n_mol));
                    task.t_current_k = Some(outcome.t_current_k);
                    task.h_initial_kj = outcome.h_initial_kj;
                    task.h_current_kj = Some(outcome.h_current_kj);
                    task.result_of_optimization = Some(outcome.equilibrium.result_of_optimization);
                    task.solver_status = Some(outcome.equilibrium.status);
                }
                Err(_) => task.solver_status = Some(SolverStatus::Failure),
            }
        }
    }
}
