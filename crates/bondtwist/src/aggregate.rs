//! Iteration over every bond of a neighbor graph.
//!
//! `BondTwists::iter` is lazy and restartable: each call walks the graph's edge
//! list from the start and evaluates on demand. `par_collect` fans the same work
//! out over rayon and returns records in edge order.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Complex, Vector3};
use rayon::prelude::*;
use tracing::info_span;

use crate::neighbors::{build_graph, GraphError, NeighborPolicy};
use crate::pairs::GridPairs;
use crate::periodic::Frame;
use crate::twist::{BondTwistEngine, SkipReason, TwistCfg, TwistError, TwistOutcome};

/// One evaluated bond.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BondRecord {
    pub a: usize,
    pub b: usize,
    /// Cartesian midpoint of the minimum-image bond, folded into the cell.
    pub midpoint: Vector3<f64>,
    pub outcome: TwistOutcome,
}

/// All bond twists of one frame.
#[derive(Clone, Copy)]
pub struct BondTwists<'a> {
    engine: BondTwistEngine<'a>,
}

impl<'a> BondTwists<'a> {
    pub fn new(engine: BondTwistEngine<'a>) -> Self {
        Self { engine }
    }

    /// Every edge in graph order, including not-applicable ones.
    pub fn iter(&self) -> impl Iterator<Item = Result<BondRecord, TwistError>> + 'a {
        let engine = self.engine;
        engine
            .graph()
            .edges()
            .iter()
            .map(move |&(a, b)| record(&engine, a, b))
    }

    /// Only bonds with an order parameter; sentinel edges are dropped.
    pub fn measured(&self) -> impl Iterator<Item = Result<BondRecord, TwistError>> + 'a {
        self.iter().filter(|r| match r {
            Ok(rec) => rec.outcome.is_applicable(),
            Err(_) => true,
        })
    }

    /// Evaluate all edges in parallel; the first fatal error aborts.
    pub fn par_collect(&self) -> Result<Vec<BondRecord>, TwistError> {
        let engine = self.engine;
        let edges = engine.graph().edges();
        let _span = info_span!("par_collect", edges = edges.len()).entered();
        edges
            .par_iter()
            .map(|&(a, b)| record(&engine, a, b))
            .collect()
    }

    /// Evaluate every edge in parallel and reduce to summary statistics.
    pub fn summary(&self) -> Result<TwistSummary, TwistError> {
        Ok(TwistSummary::from_records(&self.par_collect()?))
    }
}

fn record(engine: &BondTwistEngine<'_>, a: usize, b: usize) -> Result<BondRecord, TwistError> {
    let outcome = engine.evaluate(a, b)?;
    Ok(BondRecord {
        a,
        b,
        midpoint: engine.frame().midpoint(a, b),
        outcome,
    })
}

/// Aggregate statistics over a set of records.
#[derive(Clone, Debug, PartialEq)]
pub struct TwistSummary {
    pub edges: usize,
    pub measured: usize,
    pub skipped_by_reason: BTreeMap<SkipReason, usize>,
    /// Mean `|op|` over measured bonds.
    pub mean_magnitude: Option<f64>,
    /// Mean complex `op` over measured bonds (global chiral order).
    pub mean_value: Option<Complex<f64>>,
}

impl TwistSummary {
    pub fn from_records(records: &[BondRecord]) -> Self {
        let mut skipped = BTreeMap::new();
        let mut measured = 0usize;
        let mut mag = 0.0;
        let mut val = Complex::new(0.0, 0.0);
        for r in records {
            match r.outcome {
                TwistOutcome::Measured(op) => {
                    measured += 1;
                    mag += op.magnitude();
                    val += op.value;
                }
                TwistOutcome::NotApplicable(reason) => {
                    *skipped.entry(reason).or_insert(0) += 1;
                }
            }
        }
        let denom = measured as f64;
        Self {
            edges: records.len(),
            measured,
            skipped_by_reason: skipped,
            mean_magnitude: (measured > 0).then(|| mag / denom),
            mean_value: (measured > 0).then(|| val / denom),
        }
    }
}

/// Failure of a whole-frame analysis.
#[derive(Debug)]
pub enum AnalysisError {
    Graph(GraphError),
    Twist(TwistError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Graph(e) => write!(f, "neighbor graph: {e}"),
            AnalysisError::Twist(e) => write!(f, "bond twist: {e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Graph(e) => Some(e),
            AnalysisError::Twist(e) => Some(e),
        }
    }
}

impl From<GraphError> for AnalysisError {
    fn from(e: GraphError) -> Self {
        AnalysisError::Graph(e)
    }
}

impl From<TwistError> for AnalysisError {
    fn from(e: TwistError) -> Self {
        AnalysisError::Twist(e)
    }
}

/// Build the graph with the built-in cell list and evaluate every bond.
pub fn analyze(
    frame: &Frame,
    policy: NeighborPolicy,
    cfg: TwistCfg,
) -> Result<Vec<BondRecord>, AnalysisError> {
    let graph = build_graph(frame, policy, &GridPairs)?;
    let engine = BondTwistEngine::new(frame, &graph).with_cfg(cfg);
    Ok(BondTwists::new(engine).par_collect()?)
}
