//! Configuration bundle (§3). `Parameters` is a plain struct constructed by
//! the caller; this crate never reads it from a file or environment —
//! config loading is out of scope (§1).

use eq_core::TemperatureUnit;
use eq_solver::{Extrapolation, HInitialBy, LiquidSolution, Minimization};
use eq_thermo::{Database as ThermoConvention, Phase};

/// Grid shape requested by the caller (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkMode {
    SinglePoint,
    TempRange,
    CompRange,
    TempCompRange,
}

impl WorkMode {
    pub fn sweeps_temperature(self) -> bool {
        matches!(self, WorkMode::TempRange | WorkMode::TempCompRange)
    }

    pub fn sweeps_composition(self) -> bool {
        matches!(self, WorkMode::CompRange | WorkMode::TempCompRange)
    }
}

/// What the solver should compute for each task (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Equilibrium,
    AdiabaticTemperature,
}

/// How a composition-sweep value `v` is interpreted against group 2 (§4.4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositionUnit {
    AtPercent,
    WtPercent,
    Mol,
    Gram,
}

/// A `(start, stop, step)` sweep, expressed in the caller's chosen unit
/// (temperature unit for a temperature sweep, composition unit for a
/// composition sweep) — conversion to the solver's native units (kelvin,
/// absolute mol/gram) happens in the task builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

/// The full configuration bundle for one batch (§3).
#[derive(Clone, Debug)]
pub struct Parameters {
    pub workmode: WorkMode,
    pub target: Target,
    pub database: ThermoConvention,
    pub minimization: Minimization,
    pub liquid_solution: LiquidSolution,
    pub extrapolation: Extrapolation,
    pub h_initial_by: HInitialBy,
    pub temperature_unit: TemperatureUnit,
    pub composition_unit: CompositionUnit,
    /// Initial/single-point temperature, in `temperature_unit`.
    pub t_init: f64,
    /// Temperature sweep, in `temperature_unit`; required when
    /// `workmode.sweeps_temperature()`.
    pub temp_range: Option<RangeSpec>,
    /// Composition sweep, in `composition_unit`; required when
    /// `workmode.sweeps_composition()`.
    pub comp_range: Option<RangeSpec>,
    /// Digits of temperature precision for the adiabatic bisection (§4.6).
    pub at_accuracy: u32,
    /// Worker-pool size; `0` means "auto" (clamp to host parallelism).
    pub threads: usize,
    /// Species phases to include; empty means no filtering.
    pub show_phases: Vec<Phase>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            workmode: WorkMode::SinglePoint,
            target: Target::Equilibrium,
            database: ThermoConvention::Thermo,
            minimization: Minimization::Gibbs,
            liquid_solution: LiquidSolution::One,
            extrapolation: Extrapolation::Enable,
            h_initial_by: HInitialBy::AsChecked,
            temperature_unit: TemperatureUnit::Kelvin,
            composition_unit: CompositionUnit::AtPercent,
            t_init: 298.15,
            temp_range: None,
            comp_range: None,
            at_accuracy: 2,
            threads: 0,
            show_phases: Vec::new(),
        }
    }
}
