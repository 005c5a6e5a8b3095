//! Shared test fixtures for the integration suite.
//!
//! Includes a thin in-memory [`SpeciesDatabase`] implementation standing in
//! for the external species lookup (§6) — test-only, not a product surface.

use std::collections::{BTreeSet, HashMap};

use eq_core::{ElementId, SpeciesId};
use eq_tasks::{SpeciesDatabase, SpeciesFilter, SpeciesInputs, SpeciesRecord};
use eq_thermo::{Phase, TempRange};

#[derive(Clone)]
pub struct InMemoryDatabase {
    records: Vec<SpeciesRecord>,
    elements: BTreeSet<String>,
    temp_ranges: HashMap<SpeciesId, Vec<TempRange>>,
    element_comp: HashMap<SpeciesId, HashMap<ElementId, f64>>,
    phase_at_t0: HashMap<SpeciesId, Phase>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            elements: BTreeSet::new(),
            temp_ranges: HashMap::new(),
            element_comp: HashMap::new(),
            phase_at_t0: HashMap::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_species(
        &mut self,
        id: SpeciesId,
        formula: &str,
        molar_mass: f64,
        ranges: Vec<TempRange>,
        composition: HashMap<ElementId, f64>,
        element_symbols: &[&str],
    ) {
        let t_min = ranges.first().map(|r| r.t_min).unwrap_or(0.0);
        let t_max = ranges.last().map(|r| r.t_max).unwrap_or(0.0);
        let phase = ranges.first().map(|r| r.phase).unwrap_or(Phase::Solid);
        self.phase_at_t0.insert(id, phase);
        self.records.push(SpeciesRecord {
            id,
            formula: formula.to_string(),
            name: formula.to_string(),
            molar_mass,
            t_min,
            t_max,
        });
        self.temp_ranges.insert(id, ranges);
        self.element_comp.insert(id, composition);
        for sym in element_symbols {
            self.elements.insert((*sym).to_string());
        }
    }

    pub fn weight_of(&self, id: SpeciesId) -> f64 {
        self.records.iter().find(|r| r.id == id).map(|r| r.molar_mass).unwrap_or(0.0)
    }
}

impl SpeciesDatabase for InMemoryDatabase {
    fn available_elements(&self) -> BTreeSet<String> {
        self.elements.clone()
    }

    fn species_data(&self, filter: &SpeciesFilter) -> Vec<SpeciesRecord> {
        self.records
            .iter()
            .filter(|r| {
                let phase_ok = filter.phases.is_empty()
                    || self.phase_at_t0.get(&r.id).is_some_and(|p| filter.phases.contains(p));
                phase_ok
            })
            .cloned()
            .collect()
    }

    fn species_temp_ranges(&self, ids: &[SpeciesId]) -> HashMap<SpeciesId, Vec<TempRange>> {
        ids.iter()
            .filter_map(|id| self.temp_ranges.get(id).map(|r| (*id, r.clone())))
            .collect()
    }

    fn species_element_composition(&self, ids: &[SpeciesId]) -> HashMap<SpeciesId, HashMap<ElementId, f64>> {
        ids.iter()
            .filter_map(|id| self.element_comp.get(id).map(|c| (*id, c.clone())))
            .collect()
    }

    fn available_elements_for(&self, ids: &[SpeciesId]) -> BTreeSet<ElementId> {
        ids.iter()
            .filter_map(|id| self.element_comp.get(id))
            .flat_map(|c| c.keys().copied())
            .collect()
    }
}

/// Build the batch-wide [`SpeciesInputs`] the task builder wants, the way
/// an embedding application does once per batch, before fan-out (§6).
pub fn species_inputs_from_database(db: &InMemoryDatabase, ids: &[SpeciesId], element_ids: &[ElementId]) -> SpeciesInputs {
    let weights = ids.iter().map(|id| (*id, db.weight_of(*id))).collect();
    let coeffs = db.species_temp_ranges(ids);
    let element_comp = db.species_element_composition(ids);
    SpeciesInputs {
        ids: ids.to_vec(),
        element_ids: element_ids.to_vec(),
        weights,
        coeffs,
        element_comp,
    }
}

pub fn range(t_min: f64, t_max: f64, h_ref: f64, s_ref: f64, phase: Phase) -> TempRange {
    TempRange {
        t_min,
        t_max,
        h_ref,
        s_ref,
        f1: 25.0,
        f2: 6.0,
        f3: 0.1,
        f4: 0.2,
        f5: -0.5,
        f6: 0.05,
        f7: -0.01,
        phase,
    }
}
