//! Tagged dispatch between the two coefficient conventions.

use crate::temp_range::TempRange;
use crate::{hsc, thermo};

/// Which coefficient convention a species' temperature ranges are tabulated
/// in. Bound once per batch (see the module docs) rather than re-inspected
/// per evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Database {
    Thermo,
    Hsc,
}

/// All six thermodynamic outputs at one temperature, bundled so a caller
/// that wants more than one of them pays for the range lookup once.
#[derive(Clone, Copy, Debug)]
pub struct ThermoValues {
    pub g_kj: f64,
    pub h_kj: f64,
    pub s_j: f64,
    pub cp_j: f64,
    pub f_j: f64,
    pub c: f64,
}

impl Database {
    pub fn g_kj(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::g_kj(ranges, t),
            Database::Hsc => hsc::g_kj(ranges, t),
        }
    }

    pub fn h_kj(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::h_kj(ranges, t),
            Database::Hsc => hsc::h_kj(ranges, t),
        }
    }

    pub fn s_j(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::s_j(ranges, t),
            Database::Hsc => hsc::s_j(ranges, t),
        }
    }

    pub fn cp_j(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::cp_j(ranges, t),
            Database::Hsc => hsc::cp_j(ranges, t),
        }
    }

    pub fn f_j(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::f(ranges, t),
            Database::Hsc => hsc::f_j(ranges, t),
        }
    }

    /// Dimensionless Gibbs potential, the coefficient the equilibrium
    /// objective uses directly.
    pub fn c(self, ranges: &[TempRange], t: f64) -> f64 {
        match self {
            Database::Thermo => thermo::c(ranges, t),
            Database::Hsc => hsc::c(ranges, t),
        }
    }

    /// All six outputs computed together.
    pub fn evaluate_all(self, ranges: &[TempRange], t: f64) -> ThermoValues {
        ThermoValues {
            g_kj: self.g_kj(ranges, t),
            h_kj: self.h_kj(ranges, t),
            s_j: self.s_j(ranges, t),
            cp_j: self.cp_j(ranges, t),
            f_j: self.f_j(ranges, t),
            c: self.c(ranges, t),
        }
    }
}
