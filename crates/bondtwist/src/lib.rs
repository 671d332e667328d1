//! Bond-twist chirality order parameter for periodic molecular networks.
//!
//! For every bond (a, b) of a four-coordinated network the engine projects the
//! neighbors of both ends onto the plane perpendicular to the bond, measures the
//! signed angles between neighbor pairs, and averages `exp(3iθ)`. The result is a
//! complex number whose magnitude measures three-fold coherence and whose phase
//! gives the preferred twist (Matsumoto, Yagasaki & Tanaka, PRL 115, 197801).
//!
//! Layout
//! - `periodic`: cell matrix, minimum-image displacements.
//! - `pairs`: the pair-enumeration seam and a periodic cell list.
//! - `neighbors`: the three neighbor policies and the graph builder.
//! - `twist`: the per-edge engine, its outcome types and observer events.
//! - `aggregate`: lazy and parallel iteration over all edges.
//! - `lattice`: ideal reference frames and rigid motions for experiments.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer
//!   clarity over compatibility.

pub mod aggregate;
pub mod api;
pub mod cfg;
pub mod lattice;
pub mod neighbors;
pub mod pairs;
pub mod periodic;
pub mod twist;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use aggregate::{analyze, AnalysisError, BondRecord, BondTwists, TwistSummary};
pub use nalgebra::{Complex, Matrix3 as Mat3, Vector3 as Vec3};
pub use neighbors::{build_graph, GraphError, NeighborGraph, NeighborPolicy};
pub use periodic::{wrap, wrap_delta, Cell, CellError, Frame};
pub use twist::{
    BondTwistEngine, OrderParameter, SkipReason, TwistCfg, TwistError, TwistEvent, TwistObserver,
    TwistOutcome,
};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aggregate::{analyze, BondRecord, BondTwists};
    pub use crate::neighbors::{build_graph, NeighborGraph, NeighborPolicy};
    pub use crate::pairs::{GridPairs, Pair, PairSource};
    pub use crate::periodic::{wrap, wrap_delta, Cell, Frame};
    pub use crate::twist::{OrderParameter, SkipReason, TwistCfg, TwistOutcome};
    pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};
}
