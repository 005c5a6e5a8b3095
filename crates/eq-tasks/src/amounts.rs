//! Composition bookkeeping (§3, §4.3): per-species amounts in four coupled
//! mol/gram × group1/group2 representations plus a derived sum row,
//! renormalized on user edits.

use std::collections::HashMap;

use eq_core::SpeciesId;

use crate::error::{TaskError, TaskResult};

/// The eight coupled scalars tracked per species (§3).
///
/// Invariant: `sum_mol = g1_mol + g2_mol`, `sum_g = g1_g + g2_g`, and
/// `gi_g = gi_mol * weight`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Amount {
    pub g1_mol: f64,
    pub g1_g: f64,
    pub g2_mol: f64,
    pub g2_g: f64,
    pub sum_mol: f64,
    pub sum_g: f64,
    pub sum_at_pct: f64,
    pub sum_wt_pct: f64,
}

impl Amount {
    fn resum(&mut self) {
        self.sum_mol = self.g1_mol + self.g2_mol;
        self.sum_g = self.g1_g + self.g2_g;
    }
}

/// Which of the raw (non-derived) per-species fields an edit targets.
///
/// `sum_at_pct`/`sum_wt_pct` are always-derived outputs recomputed by
/// [`Composition::recompute_percentages`], not independently settable —
/// see DESIGN.md for why the spec's "eight settable fields" collapses to
/// these six here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Group1Mol,
    Group1Gram,
    Group2Mol,
    Group2Gram,
    SumMol,
    SumGram,
}

/// Per-species initial amounts, keyed by [`SpeciesId`], with species
/// weights for the mol↔gram conversion and an include/exclude flag.
#[derive(Clone, Debug)]
pub struct Composition {
    order: Vec<SpeciesId>,
    weight: HashMap<SpeciesId, f64>,
    amount: HashMap<SpeciesId, Amount>,
    included: HashMap<SpeciesId, bool>,
}

impl Composition {
    /// Build a composition with every species initially at zero amount
    /// and included.
    pub fn new(weights: impl IntoIterator<Item = (SpeciesId, f64)>) -> Self {
        let mut order = Vec::new();
        let mut weight = HashMap::new();
        let mut amount = HashMap::new();
        let mut included = HashMap::new();
        for (id, w) in weights {
            order.push(id);
            weight.insert(id, w);
            amount.insert(id, Amount::default());
            included.insert(id, true);
        }
        Self {
            order,
            weight,
            amount,
            included,
        }
    }

    pub fn species(&self) -> &[SpeciesId] {
        &self.order
    }

    pub fn amount(&self, id: SpeciesId) -> Option<&Amount> {
        self.amount.get(&id)
    }

    pub fn weight(&self, id: SpeciesId) -> Option<f64> {
        self.weight.get(&id).copied()
    }

    pub fn is_included(&self, id: SpeciesId) -> bool {
        self.included.get(&id).copied().unwrap_or(false)
    }

    /// Set one raw field of one species, propagating to the coupled
    /// fields of that species, then recomputing percentages across the
    /// whole composition (§4.3, op 1).
    pub fn set_species_field(&mut self, id: SpeciesId, field: Field, value: f64) -> TaskResult<()> {
        let w = *self
            .weight
            .get(&id)
            .ok_or_else(|| TaskError::InvalidInput {
                what: format!("unknown species in composition edit: {id:?}"),
            })?;
        let a = self
            .amount
            .get_mut(&id)
            .ok_or_else(|| TaskError::InvalidInput {
                what: format!("unknown species in composition edit: {id:?}"),
            })?;

        match field {
            Field::Group1Mol => {
                a.g1_mol = value;
                a.g1_g = value * w;
            }
            Field::Group1Gram => {
                a.g1_g = value;
                a.g1_mol = if w > 0.0 { value / w } else { 0.0 };
            }
            Field::Group2Mol => {
                a.g2_mol = value;
                a.g2_g = value * w;
            }
            Field::Group2Gram => {
                a.g2_g = value;
                a.g2_mol = if w > 0.0 { value / w } else { 0.0 };
            }
            Field::SumMol => rescale_groups_to_sum(a, value, w, true),
            Field::SumGram => rescale_groups_to_sum(a, value, w, false),
        }
        a.resum();
        self.recompute_percentages();
        Ok(())
    }

    /// Edit an aggregate "sum row" cell: scale that column proportionally
    /// across every species so the new column total is `new_total`, then
    /// re-derive the coupled fields and percentages (§4.3, op 2).
    ///
    /// A zero prior total is left unscaled — there is no ratio to
    /// preserve across species when every species currently contributes
    /// zero to that column.
    pub fn set_sum_row(&mut self, field: Field, new_total: f64) {
        let old_total: f64 = self
            .order
            .iter()
            .map(|id| column_value(&self.amount[id], field))
            .sum();

        if old_total == 0.0 {
            return;
        }
        let factor = new_total / old_total;

        for id in &self.order {
            let w = self.weight[id];
            let a = self.amount.get_mut(id).expect("species present");
            match field {
                Field::Group1Mol => {
                    a.g1_mol *= factor;
                    a.g1_g = a.g1_mol * w;
                }
                Field::Group1Gram => {
                    a.g1_g *= factor;
                    a.g1_mol = if w > 0.0 { a.g1_g / w } else { 0.0 };
                }
                Field::Group2Mol => {
                    a.g2_mol *= factor;
                    a.g2_g = a.g2_mol * w;
                }
                Field::Group2Gram => {
                    a.g2_g *= factor;
                    a.g2_mol = if w > 0.0 { a.g2_g / w } else { 0.0 };
                }
                Field::SumMol => {
                    a.g1_mol *= factor;
                    a.g2_mol *= factor;
                    a.g1_g = a.g1_mol * w;
                    a.g2_g = a.g2_mol * w;
                }
                Field::SumGram => {
                    a.g1_g *= factor;
                    a.g2_g *= factor;
                    a.g1_mol = if w > 0.0 { a.g1_g / w } else { 0.0 };
                    a.g2_mol = if w > 0.0 { a.g2_g / w } else { 0.0 };
                }
            }
            a.resum();
        }
        self.recompute_percentages();
    }

    /// Exclude a species: zero its amounts but keep it in the table.
    pub fn exclude(&mut self, id: SpeciesId) {
        if let Some(a) = self.amount.get_mut(&id) {
            *a = Amount::default();
        }
        self.included.insert(id, false);
        self.recompute_percentages();
    }

    /// Re-include a previously excluded species (amounts stay zero until
    /// explicitly set again).
    pub fn include(&mut self, id: SpeciesId) {
        self.included.insert(id, true);
    }

    /// Recompute `sum_at_pct`/`sum_wt_pct` against the current composition
    /// total; zeroes cleanly when the denominator vanishes (§4.3, op 4).
    pub fn recompute_percentages(&mut self) {
        let total_mol: f64 = self.order.iter().map(|id| self.amount[id].sum_mol).sum();
        let total_g: f64 = self.order.iter().map(|id| self.amount[id].sum_g).sum();

        for id in &self.order {
            let a = self.amount.get_mut(id).expect("species present");
            a.sum_at_pct = if total_mol != 0.0 {
                100.0 * a.sum_mol / total_mol
            } else {
                0.0
            };
            a.sum_wt_pct = if total_g != 0.0 {
                100.0 * a.sum_g / total_g
            } else {
                0.0
            };
        }
    }

    /// Grand totals across all species, `(mol_group1, g_group1, mol_group2, g_group2)`.
    pub fn group_totals(&self) -> (f64, f64, f64, f64) {
        let mut g1_mol = 0.0;
        let mut g1_g = 0.0;
        let mut g2_mol = 0.0;
        let mut g2_g = 0.0;
        for id in &self.order {
            let a = &self.amount[id];
            g1_mol += a.g1_mol;
            g1_g += a.g1_g;
            g2_mol += a.g2_mol;
            g2_g += a.g2_g;
        }
        (g1_mol, g1_g, g2_mol, g2_g)
    }
}

fn column_value(a: &Amount, field: Field) -> f64 {
    match field {
        Field::Group1Mol => a.g1_mol,
        Field::Group1Gram => a.g1_g,
        Field::Group2Mol => a.g2_mol,
        Field::Group2Gram => a.g2_g,
        Field::SumMol => a.sum_mol,
        Field::SumGram => a.sum_g,
    }
}

/// Rescale a single species' group1/group2 split so its own sum hits
/// `new_sum`, preserving the existing group1:group2 ratio. When the prior
/// sum is zero the whole amount is assigned to group 2, the sweepable
/// partition (§3 glossary).
fn rescale_groups_to_sum(a: &mut Amount, new_sum: f64, weight: f64, in_mol: bool) {
    let old_sum = if in_mol { a.sum_mol } else { a.sum_g };
    if old_sum != 0.0 {
        let factor = new_sum / old_sum;
        a.g1_mol *= factor;
        a.g2_mol *= factor;
        a.g1_g *= factor;
        a.g2_g *= factor;
    } else if in_mol {
        a.g2_mol = new_sum;
        a.g2_g = new_sum * weight;
    } else {
        a.g2_g = new_sum;
        a.g2_mol = if weight > 0.0 { new_sum / weight } else { 0.0 };
    }
}

/// Scale group 2 of every species by `factor`, and group 1 by
/// `group1_factor`, leaving percentages stale until the caller calls
/// [`Composition::recompute_percentages`]. Used by the task builder's
/// composition sweep (§4.4), which needs to apply the same factor pair to
/// many species at once without per-field dispatch overhead.
pub fn scale_groups(comp: &mut Composition, group2_factor: f64, group1_factor: f64) {
    for id in comp.order.clone() {
        let w = comp.weight[&id];
        let a = comp.amount.get_mut(&id).expect("species present");
        a.g1_mol *= group1_factor;
        a.g1_g = a.g1_mol * w;
        a.g2_mol *= group2_factor;
        a.g2_g = a.g2_mol * w;
        a.sum_mol = a.g1_mol + a.g2_mol;
        a.sum_g = a.g1_g + a.g2_g;
    }
    comp.recompute_percentages();
}
