//! Read-only species-database interface (§6).
//!
//! Consumed once per batch, before fan-out; the task builder never
//! retains a handle to the database during task execution.

use std::collections::{BTreeSet, HashMap, HashSet};

use eq_core::{ElementId, SpeciesId};
use eq_thermo::{Phase, TempRange};

/// Filter applied by [`SpeciesDatabase::species_data`]: only species whose
/// element set is a subset of `elements` and whose phase is in `phases`
/// are returned.
#[derive(Clone, Debug, Default)]
pub struct SpeciesFilter {
    pub elements: BTreeSet<String>,
    pub phases: HashSet<Phase>,
}

/// One row of summary data about a candidate species.
#[derive(Clone, Debug)]
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub formula: String,
    pub name: String,
    pub molar_mass: f64,
    pub t_min: f64,
    pub t_max: f64,
}

/// The five read-only operations the core needs from a species database
/// (§6). Implemented externally (e.g. by an embedded lookup table); the
/// core only ever sees this trait.
pub trait SpeciesDatabase {
    fn available_elements(&self) -> BTreeSet<String>;
    fn species_data(&self, filter: &SpeciesFilter) -> Vec<SpeciesRecord>;
    fn species_temp_ranges(&self, ids: &[SpeciesId]) -> HashMap<SpeciesId, Vec<TempRange>>;
    fn species_element_composition(&self, ids: &[SpeciesId]) -> HashMap<SpeciesId, HashMap<ElementId, f64>>;
    fn available_elements_for(&self, ids: &[SpeciesId]) -> BTreeSet<ElementId>;
}
