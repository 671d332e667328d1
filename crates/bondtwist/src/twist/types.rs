//! Outcome, error and configuration types for the per-bond engine.

use std::fmt;

use nalgebra::Complex;

use crate::cfg::{PIVOT_EPS, PROJECTION_EPS, TRACE_CENTER_DEG, TRACE_HALF_WIDTH_DEG};

/// Third circular moment of the neighbor-pair twist angles around one bond.
///
/// Invariants:
/// - `pairs >= 1` and `value.norm() <= 1` up to rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderParameter {
    pub value: Complex<f64>,
    /// Number of neighbor pairs averaged.
    pub pairs: usize,
}

impl OrderParameter {
    /// 1 for perfect three-fold alignment, 0 for no preferred twist.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.value.norm()
    }

    /// Phase in degrees, in (−180, 180].
    pub fn phase_degrees(&self) -> f64 {
        let deg = self.value.arg().to_degrees();
        if deg <= -180.0 {
            deg + 360.0
        } else {
            deg
        }
    }

    /// Preferred relative twist angle (phase / 3), defined modulo 120°.
    #[inline]
    pub fn twist_degrees(&self) -> f64 {
        self.phase_degrees() / 3.0
    }

    /// Mean of `sin 3θ`: the scalar twist of the older real-valued variant.
    #[inline]
    pub fn sine_form(&self) -> f64 {
        self.value.im
    }
}

/// Why a bond has no order parameter. Never a zero value in disguise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// `a` or `b` is missing from the union of both neighbor sets.
    EndpointNotNeighbor,
    /// The ends are not among each other's nearest neighbors.
    NotMutual,
    /// No neighbor pair survived the exclusions.
    NoAnglePairs,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EndpointNotNeighbor => "endpoint_not_neighbor",
            SkipReason::NotMutual => "not_mutual",
            SkipReason::NoAnglePairs => "no_angle_pairs",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one bond.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TwistOutcome {
    Measured(OrderParameter),
    NotApplicable(SkipReason),
}

impl TwistOutcome {
    #[inline]
    pub fn measured(&self) -> Option<&OrderParameter> {
        match self {
            TwistOutcome::Measured(op) => Some(op),
            TwistOutcome::NotApplicable(_) => None,
        }
    }

    #[inline]
    pub fn is_applicable(&self) -> bool {
        matches!(self, TwistOutcome::Measured(_))
    }
}

/// Fatal per-bond failures.
#[derive(Debug, Clone, PartialEq)]
pub enum TwistError {
    /// `a` and `b` coincide (same site or periodic images), so the bond has no axis.
    DegeneratePivot { a: usize, b: usize },
}

impl fmt::Display for TwistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwistError::DegeneratePivot { a, b } => write!(
                f,
                "bond ({a}, {b}) has zero length: atom {a} and atom {b} occupy the same periodic site"
            ),
        }
    }
}

impl std::error::Error for TwistError {}

/// Engine tolerances and tracing window.
#[derive(Clone, Copy, Debug)]
pub struct TwistCfg {
    pub pivot_eps: f64,
    pub projection_eps: f64,
    /// Angles within `trace_half_width_deg` of this value raise an observer event.
    pub trace_center_deg: f64,
    pub trace_half_width_deg: f64,
}

impl Default for TwistCfg {
    fn default() -> Self {
        Self {
            pivot_eps: PIVOT_EPS,
            projection_eps: PROJECTION_EPS,
            trace_center_deg: TRACE_CENTER_DEG,
            trace_half_width_deg: TRACE_HALF_WIDTH_DEG,
        }
    }
}
