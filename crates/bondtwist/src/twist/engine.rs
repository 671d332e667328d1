//! Per-bond evaluation.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Complex, Vector3};

use crate::cfg::HARMONIC;
use crate::neighbors::{NeighborGraph, NeighborPolicy};
use crate::periodic::Frame;

use super::observe::{NoopObserver, TwistEvent, TwistObserver};
use super::types::{OrderParameter, SkipReason, TwistCfg, TwistError, TwistOutcome};

/// Computes bond-twist order parameters on one frame and its neighbor graph.
///
/// Holds only shared borrows, so one engine can serve many threads.
#[derive(Clone, Copy)]
pub struct BondTwistEngine<'a> {
    frame: &'a Frame,
    graph: &'a NeighborGraph,
    cfg: TwistCfg,
    observer: &'a dyn TwistObserver,
}

impl<'a> BondTwistEngine<'a> {
    pub fn new(frame: &'a Frame, graph: &'a NeighborGraph) -> Self {
        Self {
            frame,
            graph,
            cfg: TwistCfg::default(),
            observer: &NoopObserver,
        }
    }

    pub fn with_cfg(mut self, cfg: TwistCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn TwistObserver) -> Self {
        self.observer = observer;
        self
    }

    #[inline]
    pub fn frame(&self) -> &'a Frame {
        self.frame
    }

    #[inline]
    pub fn graph(&self) -> &'a NeighborGraph {
        self.graph
    }

    /// Order parameter of bond `(a, b)`.
    ///
    /// Pre: `a`, `b` index atoms of the frame.
    /// Post: `Measured` carries the mean of `exp(3iθ)` over neighbor pairs
    /// `(i, j)`, `i` from `a`'s side and `j` from `b`'s, with θ the signed angle
    /// from `i` to `j` about the axis `a → b`.
    pub fn evaluate(&self, a: usize, b: usize) -> Result<TwistOutcome, TwistError> {
        let g = self.graph;
        let na = g.neighbors(a);
        let nb = g.neighbors(b);
        let vertices: BTreeSet<usize> = na.iter().chain(nb.iter()).copied().collect();
        match g.policy() {
            NeighborPolicy::Explicit => {}
            NeighborPolicy::ProximityK { .. } => {
                if !vertices.contains(&a) || !vertices.contains(&b) {
                    return Ok(TwistOutcome::NotApplicable(SkipReason::EndpointNotNeighbor));
                }
            }
            NeighborPolicy::MutualNearest { .. } => {
                if !g.is_mutual(a, b) {
                    return Ok(TwistOutcome::NotApplicable(SkipReason::NotMutual));
                }
            }
        }

        // Bond axis; the displacement of `a` from itself is zero.
        let axis = self.frame.displacement(a, b);
        let len = axis.norm();
        if !(len > self.cfg.pivot_eps) {
            return Err(TwistError::DegeneratePivot { a, b });
        }
        let pivot = axis / len;

        // Unit in-plane directions of every participating neighbor.
        let mut proj: BTreeMap<usize, Vector3<f64>> = BTreeMap::new();
        for &v in vertices.iter().filter(|&&v| v != a && v != b) {
            let r = self.frame.displacement(a, v);
            let p = r - pivot * pivot.dot(&r);
            let norm = p.norm();
            if norm <= self.cfg.projection_eps {
                self.observer
                    .observe(&TwistEvent::DegenerateProjection { a, b, vertex: v });
                continue;
            }
            proj.insert(v, p / norm);
        }

        let mut sum = Complex::new(0.0, 0.0);
        let mut n = 0usize;
        for &i in na.iter().filter(|&&i| i != a && i != b) {
            let Some(pi) = proj.get(&i) else { continue };
            for &j in nb.iter().filter(|&&j| j != a && j != b) {
                // shared neighbor: a three-ring, not a twist
                if i == j {
                    continue;
                }
                let Some(pj) = proj.get(&j) else { continue };
                let sine = pi.cross(pj).dot(&pivot);
                let cosine = pi.dot(pj);
                let theta = sine.atan2(cosine);
                self.trace_angle(a, b, i, j, theta, sine, cosine, len);
                sum += Complex::cis(HARMONIC * theta);
                n += 1;
            }
        }
        if n == 0 {
            return Ok(TwistOutcome::NotApplicable(SkipReason::NoAnglePairs));
        }
        Ok(TwistOutcome::Measured(OrderParameter {
            value: sum / n as f64,
            pairs: n,
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn trace_angle(
        &self,
        a: usize,
        b: usize,
        i: usize,
        j: usize,
        theta: f64,
        sine: f64,
        cosine: f64,
        dist_ab: f64,
    ) {
        let degrees = theta.to_degrees();
        if (degrees - self.cfg.trace_center_deg).abs() >= self.cfg.trace_half_width_deg {
            return;
        }
        self.observer.observe(&TwistEvent::NearThirtyDegrees {
            a,
            b,
            i,
            j,
            degrees,
            cosine,
            chord: sine.hypot(cosine),
            dist_ai: self.frame.displacement(a, i).norm(),
            dist_ab,
            dist_bj: self.frame.displacement(b, j).norm(),
        });
    }
}
