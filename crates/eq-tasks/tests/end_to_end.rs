//! Regression scenarios exercising the full task-builder → executor
//! pipeline against synthetic but thermodynamically directed coefficient
//! sets (no real species database is wired in at this layer, §6).

mod common;

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use eq_core::{ElementId, SpeciesId, TemperatureUnit};
use eq_tasks::amounts::{Composition, Field};
use eq_tasks::builder::SpeciesInputs;
use eq_tasks::executor::{BatchOutcome, CancellationToken};
use eq_tasks::params::{CompositionUnit, Parameters, RangeSpec, Target, WorkMode};
use eq_tasks::{SolverStatus, build_tasks, run_batch};
use eq_solver::{Extrapolation, HInitialBy, LiquidSolution, Minimization};
use eq_thermo::{Database, Phase};

use common::{InMemoryDatabase, range, species_inputs_from_database};

fn base_params() -> Parameters {
    Parameters {
        workmode: WorkMode::SinglePoint,
        target: Target::Equilibrium,
        database: Database::Thermo,
        minimization: Minimization::Gibbs,
        liquid_solution: LiquidSolution::One,
        extrapolation: Extrapolation::Enable,
        h_initial_by: HInitialBy::AsChecked,
        temperature_unit: TemperatureUnit::Kelvin,
        composition_unit: CompositionUnit::AtPercent,
        t_init: 300.0,
        temp_range: None,
        comp_range: None,
        at_accuracy: 2,
        threads: 2,
        show_phases: Vec::new(),
    }
}

fn element_conserved(species: &SpeciesInputs, initial_mol: &[f64], eq_mol: &[f64]) -> bool {
    for (j, _e) in species.element_ids.iter().enumerate() {
        let b: f64 = species
            .ids
            .iter()
            .zip(initial_mol)
            .map(|(id, &n)| species.element_comp[id].get(&species.element_ids[j]).copied().unwrap_or(0.0) * n)
            .sum();
        let a: f64 = species
            .ids
            .iter()
            .zip(eq_mol)
            .map(|(id, &n)| species.element_comp[id].get(&species.element_ids[j]).copied().unwrap_or(0.0) * n)
            .sum();
        if (a - b).abs() > 5e-2 * b.abs().max(1.0) {
            return false;
        }
    }
    true
}

/// S1 — a single inert gas species at a single (T, composition) point
/// undergoes no reaction: the only feasible point under element
/// conservation is its own initial amount.
#[test]
fn single_inert_species_no_reaction() {
    let mut db = InMemoryDatabase::new();
    let ar = SpeciesId::from_index(0);
    let ar_elem = ElementId::from_index(0);
    db.add_species(
        ar,
        "Ar(g)",
        39.95,
        vec![range(200.0, 6000.0, 0.0, 154.8, Phase::Gas)],
        HashMap::from([(ar_elem, 1.0)]),
        &["Ar"],
    );
    let species = species_inputs_from_database(&db, &[ar], &[ar_elem]);

    let mut initial = Composition::new([(ar, db.weight_of(ar))]);
    initial.set_species_field(ar, Field::Group1Mol, 1.0).unwrap();

    let params = Parameters {
        t_init: 300.0,
        ..base_params()
    };
    let tasks = build_tasks(&params, species, initial).unwrap();
    assert_eq!(tasks.len(), 1);

    let token = CancellationToken::new();
    let BatchOutcome::Completed(tasks) = run_batch(tasks, 1, |_, _| {}, &token) else {
        panic!("single task must complete");
    };
    let task = &tasks[0];
    assert_eq!(task.solver_status, Some(SolverStatus::XtolReached));
    let eq = task.equilibrium.as_ref().unwrap();
    let n_ar = eq.amount(ar).unwrap().sum_mol;
    assert!((n_ar - 1.0).abs() < 1e-3, "n_Ar = {n_ar}");
}

fn h2_o2_h2o_species() -> (SpeciesInputs, SpeciesId, SpeciesId, SpeciesId, ElementId, ElementId) {
    let h2 = SpeciesId::from_index(0);
    let o2 = SpeciesId::from_index(1);
    let h2o = SpeciesId::from_index(2);
    let h = ElementId::from_index(0);
    let o = ElementId::from_index(1);

    let ids = vec![h2, o2, h2o];
    let weights = HashMap::from([(h2, 2.0), (o2, 32.0), (h2o, 18.0)]);
    let coeffs = HashMap::from([
        (h2, vec![range(200.0, 6000.0, 0.0, 130.7, Phase::Gas)]),
        (o2, vec![range(200.0, 6000.0, 0.0, 205.2, Phase::Gas)]),
        (h2o, vec![range(200.0, 6000.0, -241.8, 188.8, Phase::Gas)]),
    ]);
    let element_comp = HashMap::from([
        (h2, HashMap::from([(h, 2.0)])),
        (o2, HashMap::from([(o, 2.0)])),
        (h2o, HashMap::from([(h, 2.0), (o, 1.0)])),
    ]);
    let species = SpeciesInputs {
        ids,
        element_ids: vec![h, o],
        weights,
        coeffs,
        element_comp,
    };
    (species, h2, o2, h2o, h, o)
}

/// S2 — hydrogen/oxygen combustion: the adiabatic-temperature bisection
/// must terminate inside its bracket and conserve both elements.
#[test]
fn hydrogen_combustion_adiabatic_temperature_within_bracket() {
    let (species, h2, o2, _h2o, _h, _o) = h2_o2_h2o_species();
    let mut initial = Composition::new([(h2, species.weights[&h2]), (o2, species.weights[&o2]), (species.ids[2], species.weights[&species.ids[2]])]);
    initial.set_species_field(h2, Field::Group1Mol, 2.0).unwrap();
    initial.set_species_field(o2, Field::Group1Mol, 1.0).unwrap();

    let params = Parameters {
        target: Target::AdiabaticTemperature,
        t_init: 298.15,
        at_accuracy: 2,
        ..base_params()
    };
    let initial_mol: Vec<f64> = species.ids.iter().map(|id| initial.amount(*id).unwrap().sum_mol).collect();
    let tasks = build_tasks(&params, species.clone(), initial).unwrap();
    assert_eq!(tasks.len(), 1);

    let token = CancellationToken::new();
    let BatchOutcome::Completed(tasks) = run_batch(tasks, 1, |_, _| {}, &token) else {
        panic!("single task must complete");
    };
    let task = &tasks[0];
    let t_current = task.t_current_k.expect("adiabatic solve sets t_current_k");
    assert!(t_current >= 298.15 - 1e-6 && t_current <= 10_000.0 + 1e-6, "T* = {t_current}");

    let eq = task.equilibrium.as_ref().unwrap();
    let eq_mol: Vec<f64> = species.ids.iter().map(|id| eq.amount(*id).unwrap().sum_mol).collect();
    assert!(element_conserved(&species, &initial_mol, &eq_mol));
}

/// S3 — carbon burns with oxygen across a temperature sweep; oxygen (not
/// thermodynamically favored relative to the strongly exothermic CO/CO2)
/// is driven to (near) zero at every grid point, and elements are
/// conserved throughout.
#[test]
fn carbon_oxygen_temperature_sweep_consumes_oxygen() {
    let c = SpeciesId::from_index(0);
    let o2 = SpeciesId::from_index(1);
    let co = SpeciesId::from_index(2);
    let co2 = SpeciesId::from_index(3);
    let carbon = ElementId::from_index(0);
    let oxygen = ElementId::from_index(1);

    let ids = vec![c, o2, co, co2];
    let weights = HashMap::from([(c, 12.0), (o2, 32.0), (co, 28.0), (co2, 44.0)]);
    let coeffs = HashMap::from([
        (c, vec![range(200.0, 6000.0, 0.0, 5.7, Phase::Solid)]),
        (o2, vec![range(200.0, 6000.0, 0.0, 205.2, Phase::Gas)]),
        (co, vec![range(200.0, 6000.0, -110.5, 197.7, Phase::Gas)]),
        (co2, vec![range(200.0, 6000.0, -393.5, 213.8, Phase::Gas)]),
    ]);
    let element_comp = HashMap::from([
        (c, HashMap::from([(carbon, 1.0)])),
        (o2, HashMap::from([(oxygen, 2.0)])),
        (co, HashMap::from([(carbon, 1.0), (oxygen, 1.0)])),
        (co2, HashMap::from([(carbon, 1.0), (oxygen, 2.0)])),
    ]);
    let species = SpeciesInputs {
        ids: ids.clone(),
        element_ids: vec![carbon, oxygen],
        weights,
        coeffs,
        element_comp,
    };

    let mut initial = Composition::new(ids.iter().map(|id| (*id, species.weights[id])));
    initial.set_species_field(c, Field::Group1Mol, 1.0).unwrap();
    initial.set_species_field(o2, Field::Group1Mol, 1.0).unwrap();
    let initial_mol: Vec<f64> = ids.iter().map(|id| initial.amount(*id).unwrap().sum_mol).collect();

    let params = Parameters {
        workmode: WorkMode::TempRange,
        temp_range: Some(RangeSpec {
            start: 500.0,
            stop: 3000.0,
            step: 500.0,
        }),
        ..base_params()
    };
    let tasks = build_tasks(&params, species.clone(), initial).unwrap();
    assert_eq!(tasks.len(), 6);

    let token = CancellationToken::new();
    let BatchOutcome::Completed(tasks) = run_batch(tasks, 2, |_, _| {}, &token) else {
        panic!("batch must complete");
    };
    for task in &tasks {
        let eq = task.equilibrium.as_ref().expect("equilibrium populated");
        let n_o2 = eq.amount(o2).unwrap().sum_mol;
        assert!(n_o2 < 0.2, "O2 left over at T={:?}: {n_o2}", task.t_current_k);

        let eq_mol: Vec<f64> = ids.iter().map(|id| eq.amount(*id).unwrap().sum_mol).collect();
        assert!(element_conserved(&species, &initial_mol, &eq_mol));
    }
}

/// S4 — a Ti + C system swept across group-2 at%: at the pure extremes
/// (0% or 100% carbon) one of the two elements is entirely absent from
/// the mixture, so TiC's upper bound — and hence its equilibrium amount
/// — is forced to zero; only the interior point can form TiC.
#[test]
fn titanium_carbide_vanishes_at_pure_composition_extremes() {
    let ti = SpeciesId::from_index(0);
    let c = SpeciesId::from_index(1);
    let tic = SpeciesId::from_index(2);
    let ti_elem = ElementId::from_index(0);
    let c_elem = ElementId::from_index(1);

    let ids = vec![ti, c, tic];
    let weights = HashMap::from([(ti, 47.9), (c, 12.0), (tic, 59.9)]);
    let coeffs = HashMap::from([
        (ti, vec![range(200.0, 6000.0, 0.0, 30.7, Phase::Solid)]),
        (c, vec![range(200.0, 6000.0, 0.0, 5.7, Phase::Solid)]),
        (tic, vec![range(200.0, 6000.0, -184.1, 24.2, Phase::Solid)]),
    ]);
    let element_comp = HashMap::from([
        (ti, HashMap::from([(ti_elem, 1.0)])),
        (c, HashMap::from([(c_elem, 1.0)])),
        (tic, HashMap::from([(ti_elem, 1.0), (c_elem, 1.0)])),
    ]);
    let species = SpeciesInputs {
        ids: ids.clone(),
        element_ids: vec![ti_elem, c_elem],
        weights,
        coeffs,
        element_comp,
    };

    let mut initial = Composition::new(ids.iter().map(|id| (*id, species.weights[id])));
    initial.set_species_field(ti, Field::Group1Mol, 1.0).unwrap();
    initial.set_species_field(c, Field::Group2Mol, 1.0).unwrap();

    let params = Parameters {
        workmode: WorkMode::CompRange,
        comp_range: Some(RangeSpec {
            start: 0.0,
            stop: 100.0,
            step: 50.0,
        }),
        composition_unit: CompositionUnit::AtPercent,
        ..base_params()
    };
    let tasks = build_tasks(&params, species, initial).unwrap();
    assert_eq!(tasks.len(), 3);

    let token = CancellationToken::new();
    let BatchOutcome::Completed(tasks) = run_batch(tasks, 1, |_, _| {}, &token) else {
        panic!("batch must complete");
    };

    let tic_mol_by_sweep: Vec<(f64, f64)> = tasks
        .iter()
        .map(|t| {
            let v = t.comp_sweep_value.expect("composition sweep value recorded");
            let n = t.equilibrium.as_ref().unwrap().amount(tic).unwrap().sum_mol;
            (v, n)
        })
        .collect();

    for (v, n) in &tic_mol_by_sweep {
        if *v == 0.0 || *v == 100.0 {
            assert!(*n < 1e-6, "TiC should vanish at the pure extreme {v}at%, got {n}");
        }
    }
    let mid = tic_mol_by_sweep.iter().find(|(v, _)| (*v - 50.0).abs() < 1e-9).unwrap().1;
    assert!(mid > 0.05, "TiC should form at the stoichiometric midpoint, got {mid}");
}

/// S5 — cancellation observed before any task starts discards the whole
/// batch: the caller must see [`BatchOutcome::Canceled`], never a partial
/// result vector.
#[test]
fn cancellation_of_large_batch_returns_canceled() {
    let ar = SpeciesId::from_index(0);
    let ar_elem = ElementId::from_index(0);
    let species = SpeciesInputs {
        ids: vec![ar],
        element_ids: vec![ar_elem],
        weights: HashMap::from([(ar, 39.95)]),
        coeffs: HashMap::from([(ar, vec![range(200.0, 12_000.0, 0.0, 154.8, Phase::Gas)])]),
        element_comp: HashMap::from([(ar, HashMap::from([(ar_elem, 1.0)]))]),
    };
    let mut initial = Composition::new([(ar, 39.95)]);
    initial.set_species_field(ar, Field::Group1Mol, 1.0).unwrap();

    let params = Parameters {
        workmode: WorkMode::TempRange,
        temp_range: Some(RangeSpec {
            start: 300.0,
            stop: 10_000.0,
            step: 5.0,
        }),
        ..base_params()
    };
    let tasks = build_tasks(&params, species, initial).unwrap();
    assert!(tasks.len() > 1_000, "need a large batch to exercise the pool, got {}", tasks.len());

    let token = CancellationToken::new();
    token.cancel();

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let outcome = run_batch(tasks, 4, |_, _| {}, &token);
        tx.send(matches!(outcome, BatchOutcome::Canceled)).unwrap();
    });
    let was_canceled = rx.recv_timeout(Duration::from_secs(5)).expect("executor thread responded");
    handle.join().unwrap();
    assert!(was_canceled);
}

/// S6 — a species whose validity range excludes the requested temperature
/// gets an upper bound of zero under `extrapolation = Disable`, so its
/// equilibrium amount is exactly zero.
#[test]
fn extrapolation_disabled_clamps_out_of_range_species() {
    let s = SpeciesId::from_index(0);
    let e = ElementId::from_index(0);
    let species = SpeciesInputs {
        ids: vec![s],
        element_ids: vec![e],
        weights: HashMap::from([(s, 28.0)]),
        coeffs: HashMap::from([(s, vec![range(400.0, 2000.0, -50.0, 100.0, Phase::Gas)])]),
        element_comp: HashMap::from([(s, HashMap::from([(e, 1.0)]))]),
    };
    let mut initial = Composition::new([(s, 28.0)]);
    initial.set_species_field(s, Field::Group1Mol, 1.0).unwrap();

    let params = Parameters {
        t_init: 300.0,
        extrapolation: Extrapolation::Disable,
        ..base_params()
    };
    let tasks = build_tasks(&params, species, initial).unwrap();
    let token = CancellationToken::new();
    let BatchOutcome::Completed(tasks) = run_batch(tasks, 1, |_, _| {}, &token) else {
        panic!("single task must complete");
    };
    let eq = tasks[0].equilibrium.as_ref().unwrap();
    assert_eq!(eq.amount(s).unwrap().sum_mol, 0.0);
}
