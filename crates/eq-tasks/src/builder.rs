//! Equilibrium task builder (§4.4): expands parameters and initial
//! amounts into the array of independent [`OptimizationTask`]s the
//! parallel executor will process.

use std::collections::HashMap;
use std::sync::Arc;

use eq_core::units::to_kelvin;
use eq_core::{ElementId, SpeciesId};
use eq_solver::{SolverStatus, h_initial_kj};
use eq_thermo::{Phase, TempRange, ThermoError, select_range, validate_ranges};

use crate::amounts::{Composition, scale_groups};
use crate::error::{TaskError, TaskResult};
use crate::params::{CompositionUnit, Parameters, WorkMode};
use crate::range::tabulate;

/// Implementation limit on grid size (§4.4, §7): the builder rejects a
/// task count beyond this before allocating anything.
pub const MAX_TASKS: usize = 20_000;

/// Immutable, batch-wide species data shared by reference across every
/// task (§3 "Ownership").
#[derive(Clone, Debug)]
pub struct SpeciesInputs {
    pub ids: Vec<SpeciesId>,
    pub element_ids: Vec<ElementId>,
    pub weights: HashMap<SpeciesId, f64>,
    pub coeffs: HashMap<SpeciesId, Vec<TempRange>>,
    pub element_comp: HashMap<SpeciesId, HashMap<ElementId, f64>>,
}

impl SpeciesInputs {
    /// Per-species coefficient sequences, aligned with `ids`.
    pub fn coeffs_aligned(&self) -> Vec<Vec<TempRange>> {
        self.ids
            .iter()
            .map(|id| self.coeffs.get(id).cloned().unwrap_or_default())
            .collect()
    }

    /// Per-species element-atom counts, aligned with `ids` and
    /// `element_ids`.
    pub fn element_comp_aligned(&self) -> Vec<Vec<f64>> {
        self.ids
            .iter()
            .map(|id| {
                let row = self.element_comp.get(id);
                self.element_ids
                    .iter()
                    .map(|e| row.and_then(|r| r.get(e)).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }

    fn validate(&self) -> TaskResult<()> {
        if self.ids.is_empty() {
            return Err(TaskError::InvalidInput {
                what: "empty species set".to_string(),
            });
        }
        if self.element_ids.is_empty() {
            return Err(TaskError::InvalidInput {
                what: "empty element set".to_string(),
            });
        }
        for id in &self.ids {
            let ranges = self.coeffs.get(id).ok_or_else(|| TaskError::DatabaseFault {
                what: format!("species {id:?} has no temperature ranges"),
            })?;
            validate_ranges(ranges).map_err(|err| match err {
                ThermoError::NoTempRanges => TaskError::DatabaseFault {
                    what: format!("species {id:?} has no temperature ranges"),
                },
                ThermoError::NonMonotonicRanges { what } => TaskError::InvalidInput {
                    what: format!("non-monotonic temperature ranges for species {id:?}: {what}"),
                },
                ThermoError::NonFinite { what, value } => TaskError::InvalidInput {
                    what: format!("non-finite coefficient for species {id:?}: {what}={value}"),
                },
            })?;
        }
        Ok(())
    }

    /// Keep only species whose phase at `t_k` is in `show_phases` (§3); an
    /// empty `show_phases` means no filtering.
    fn filter_by_phase(&self, show_phases: &[Phase], t_k: f64) -> SpeciesInputs {
        if show_phases.is_empty() {
            return self.clone();
        }
        let mut filtered = self.clone();
        filtered.ids.retain(|id| {
            self.coeffs
                .get(id)
                .is_some_and(|ranges| !ranges.is_empty() && show_phases.contains(&select_range(ranges, t_k).phase))
        });
        filtered
    }
}

/// Scan a species set's initial amounts and reject negative moles or grams
/// at the task-builder boundary, before any task is built (§7).
fn validate_nonnegative_amounts(species: &SpeciesInputs, initial: &Composition) -> TaskResult<()> {
    for id in &species.ids {
        let Some(a) = initial.amount(*id) else {
            continue;
        };
        if a.g1_mol < 0.0 || a.g2_mol < 0.0 || a.g1_g < 0.0 || a.g2_g < 0.0 {
            return Err(TaskError::InvalidInput {
                what: format!("negative initial amount for species {id:?}"),
            });
        }
    }
    Ok(())
}

/// One independent equilibrium (or adiabatic-temperature) work unit.
///
/// Constructed once by [`build_tasks`], processed independently by the
/// parallel executor, and not reused afterward.
#[derive(Clone)]
pub struct OptimizationTask {
    pub species: Arc<SpeciesInputs>,
    pub params: Arc<Parameters>,
    pub initial: Composition,
    pub t_init_k: f64,
    pub comp_sweep_value: Option<f64>,

    /// Enthalpy of the initial mixture, computed eagerly at build time
    /// since it only depends on the initial composition and `t_init_k`
    /// (§4.6).
    pub h_initial_kj: f64,

    pub equilibrium: Option<Composition>,
    pub t_current_k: Option<f64>,
    pub h_current_kj: Option<f64>,
    pub result_of_optimization: Option<f64>,
    pub solver_status: Option<SolverStatus>,
}

fn composition_factors(unit: CompositionUnit, v: f64, g1_mol: f64, g1_g: f64, g2_mol: f64, g2_g: f64) -> Option<(f64, f64)> {
    match unit {
        CompositionUnit::AtPercent => {
            if g1_mol == 0.0 || g2_mol == 0.0 {
                return None;
            }
            let grand = g1_mol + g2_mol;
            let new_g2 = v / 100.0 * grand;
            let new_g1 = grand - new_g2;
            Some((new_g2 / g2_mol, new_g1 / g1_mol))
        }
        CompositionUnit::WtPercent => {
            if g1_g == 0.0 || g2_g == 0.0 {
                return None;
            }
            let grand = g1_g + g2_g;
            let new_g2 = v / 100.0 * grand;
            let new_g1 = grand - new_g2;
            Some((new_g2 / g2_g, new_g1 / g1_g))
        }
        CompositionUnit::Mol => {
            if g2_mol == 0.0 {
                return None;
            }
            Some((v / g2_mol, 1.0))
        }
        CompositionUnit::Gram => {
            if g2_g == 0.0 {
                return None;
            }
            Some((v / g2_g, 1.0))
        }
    }
}

/// Initial moles of every species in `species.ids` order, honoring
/// exclusion (an excluded species contributes zero regardless of its
/// stored amount, §4.3 op 3).
pub fn initial_mol(species: &SpeciesInputs, comp: &Composition) -> Vec<f64> {
    species
        .ids
        .iter()
        .map(|id| {
            if comp.is_included(*id) {
                comp.amount(*id).map(|a| a.sum_mol).unwrap_or(0.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Apply one composition-sweep value `v` to `initial`, per the
/// unit-interpretation table of §4.4. A no-op (returns a clone of
/// `initial`) when the unit's rescale condition is not met.
fn apply_composition_value(initial: &Composition, unit: CompositionUnit, v: f64) -> Composition {
    let (g1_mol, g1_g, g2_mol, g2_g) = initial.group_totals();
    let mut comp = initial.clone();
    if let Some((f2, f1)) = composition_factors(unit, v, g1_mol, g1_g, g2_mol, g2_g) {
        scale_groups(&mut comp, f2, f1);
    }
    comp
}

/// Build the array of optimization tasks for one batch (§4.4).
///
/// `initial` carries the caller's per-species starting amounts, already
/// split into group 1 (fixed base) and group 2 (swept variable).
pub fn build_tasks(params: &Parameters, species: SpeciesInputs, initial: Composition) -> TaskResult<Vec<OptimizationTask>> {
    let t_init_k = to_kelvin(params.t_init, params.temperature_unit);
    let species = species.filter_by_phase(&params.show_phases, t_init_k);
    species.validate()?;
    validate_nonnegative_amounts(&species, &initial)?;

    let total_initial_mol: f64 = species
        .ids
        .iter()
        .filter(|id| initial.is_included(**id))
        .map(|id| initial.amount(*id).map(|a| a.sum_mol).unwrap_or(0.0))
        .sum();
    if total_initial_mol == 0.0 {
        return Ok(Vec::new());
    }

    let t_vec_k: Vec<f64> = if params.workmode.sweeps_temperature() {
        let range = params.temp_range.ok_or_else(|| TaskError::InvalidInput {
            what: "temp_range is required for this workmode".to_string(),
        })?;
        tabulate(range.start, range.stop, range.step)
            .into_iter()
            .map(|t| to_kelvin(t, params.temperature_unit))
            .collect()
    } else {
        vec![to_kelvin(params.t_init, params.temperature_unit)]
    };

    let comp_vec: Vec<(Composition, Option<f64>)> = if params.workmode.sweeps_composition() {
        let range = params.comp_range.ok_or_else(|| TaskError::InvalidInput {
            what: "comp_range is required for this workmode".to_string(),
        })?;
        tabulate(range.start, range.stop, range.step)
            .into_iter()
            .map(|v| (apply_composition_value(&initial, params.composition_unit, v), Some(v)))
            .collect()
    } else {
        vec![(initial.clone(), None)]
    };

    let total = t_vec_k.len() * comp_vec.len();
    if total > MAX_TASKS {
        return Err(TaskError::TaskCountOverflow {
            count: total,
            limit: MAX_TASKS,
        });
    }
    if total == 0 {
        return Ok(Vec::new());
    }

    let species = Arc::new(species);
    let params = Arc::new(params.clone());
    let coeffs_aligned = species.coeffs_aligned();
    let element_comp_aligned = species.element_comp_aligned();

    let mut tasks = Vec::with_capacity(total);
    for &t_k in &t_vec_k {
        for (comp, v) in &comp_vec {
            let initial_mol_vec = initial_mol(&species, comp);

            let h_init = h_initial_kj(
                params.database,
                &coeffs_aligned,
                &element_comp_aligned,
                &initial_mol_vec,
                t_init_k,
                params.h_initial_by,
            );

            tasks.push(OptimizationTask {
                species: species.clone(),
                params: params.clone(),
                initial: comp.clone(),
                t_init_k,
                comp_sweep_value: *v,
                h_initial_kj: h_init,
                equilibrium: None,
                t_current_k: Some(t_k),
                h_current_kj: None,
                result_of_optimization: None,
                solver_status: None,
            });
        }
    }

    Ok(tasks)
}
