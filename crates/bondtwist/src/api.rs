//! Curated internal API for experiment drivers (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI and
//!   benches. Breaking changes are allowed and expected.

// Geometry
pub use crate::periodic::{wrap, wrap_delta, Cell, CellError, Frame};
// Pair search
pub use crate::pairs::{GridPairs, Pair, PairSource};
// Neighbor graphs
pub use crate::neighbors::{build_graph, GraphError, NeighborGraph, NeighborPolicy};
// Engine
pub use crate::twist::{
    BondTwistEngine, NoopObserver, OrderParameter, SkipReason, TwistCfg, TwistError, TwistEvent,
    TwistObserver, TwistOutcome,
};
// Aggregation
pub use crate::aggregate::{analyze, AnalysisError, BondRecord, BondTwists, TwistSummary};
// Reference lattices
pub use crate::lattice::{
    diamond, diamond_bond_length, jittered, rigid_motion, LatticeError, ICE_IC_LATTICE_NM,
};
