//! Piecewise coefficient blocks and range selection.

use crate::error::{ThermoError, ThermoResult};
use crate::phase::Phase;

/// A coefficient block valid on `[t_min, t_max]` kelvin.
#[derive(Clone, Copy, Debug)]
pub struct TempRange {
    pub t_min: f64,
    pub t_max: f64,
    /// Reference enthalpy, kJ/mol.
    pub h_ref: f64,
    /// Reference entropy, J/mol·K.
    pub s_ref: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
    pub f5: f64,
    pub f6: f64,
    pub f7: f64,
    pub phase: Phase,
}

/// Select the coefficient block that applies at temperature `t`.
///
/// Returns the first range whose `t_max > t`; if `t` is below the first
/// range's `t_min`, returns the first range; if `t` exceeds every range's
/// `t_max`, returns the last range. `ranges` must be sorted by `t_min` and
/// non-empty.
pub fn select_range<'a>(ranges: &'a [TempRange], t: f64) -> &'a TempRange {
    debug_assert!(!ranges.is_empty());
    if t < ranges[0].t_min {
        return &ranges[0];
    }
    for range in ranges {
        if range.t_max > t {
            return range;
        }
    }
    ranges.last().expect("ranges is non-empty")
}

/// Validate that a species' coefficient blocks are non-empty and sorted
/// into contiguous, non-overlapping ranges, the precondition [`select_range`]
/// and [`is_within_validity`] assume and only `debug_assert!` in release.
pub fn validate_ranges(ranges: &[TempRange]) -> ThermoResult<()> {
    if ranges.is_empty() {
        return Err(ThermoError::NoTempRanges);
    }
    for r in ranges {
        if !(r.t_min < r.t_max) {
            return Err(ThermoError::NonMonotonicRanges {
                what: "t_min must be less than t_max",
            });
        }
    }
    for w in ranges.windows(2) {
        if w[0].t_max > w[1].t_min {
            return Err(ThermoError::NonMonotonicRanges {
                what: "ranges must be sorted, contiguous, and non-overlapping",
            });
        }
    }
    Ok(())
}

/// Whether `t` falls within a species' overall validity domain, i.e. within
/// some range's `[t_min, t_max]` without needing extrapolation.
pub fn is_within_validity(ranges: &[TempRange], t: f64) -> bool {
    ranges
        .first()
        .map(|r| r.t_min)
        .is_some_and(|t_min| t >= t_min)
        && ranges
            .last()
            .map(|r| r.t_max)
            .is_some_and(|t_max| t <= t_max)
}
