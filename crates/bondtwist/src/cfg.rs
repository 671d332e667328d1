//! Tolerance and default constants.
//!
//! Policy
//! - Defaults are fixed constants to avoid tolerance juggling at call sites.
//!   Per-run overrides go through `TwistCfg`.

/// Pivot vectors at or below this length mean `a` and `b` sit on the same site.
pub const PIVOT_EPS: f64 = 1e-12;
/// Projections at or below this length are colinear with the pivot.
pub const PROJECTION_EPS: f64 = 1e-9;
/// Neighbor count per atom for the proximity policies (tetrahedral coordination).
pub const DEFAULT_K: usize = 4;
/// Center of the traced angle window, in degrees.
pub const TRACE_CENTER_DEG: f64 = 30.0;
/// Half width of the traced angle window, in degrees.
pub const TRACE_HALF_WIDTH_DEG: f64 = 1.0;
/// Harmonic used by the circular average (three-fold symmetry about the bond).
pub const HARMONIC: f64 = 3.0;
/// Below this many bins per axis the cell list degenerates and we enumerate all pairs.
pub(crate) const MIN_GRID_BINS: usize = 3;
