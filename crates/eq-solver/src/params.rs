//! Small solver-level option enums.
//!
//! These are the options that change the *math* of the equilibrium solve,
//! as opposed to grid shape or I/O units, which live one layer up in
//! `eq-tasks`.

/// Which quantity the optimizer minimizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Minimization {
    /// Minimize Gibbs energy.
    Gibbs,
    /// Maximize entropy, implemented as minimizing `-S`.
    Entropy,
}

/// Whether liquid species are treated as mutually ideal or independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiquidSolution {
    /// Liquids are pure, independent condensed phases.
    No,
    /// All liquid species form a single ideal solution.
    One,
}

/// Whether species outside their tabulated validity range still compete
/// in the equilibrium.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extrapolation {
    /// Out-of-range species keep a normal upper bound.
    Enable,
    /// Out-of-range species get an upper bound of zero.
    Disable,
}
