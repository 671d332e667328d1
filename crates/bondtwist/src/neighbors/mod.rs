//! Neighbor graphs: which atoms take part in each bond's twist.
//!
//! Three policies share one builder and one engine:
//! - `Explicit`: neighbors are bond partners (hydrogen-bond topology).
//! - `ProximityK`: the k nearest atoms within a cutoff, no bond information needed.
//! - `MutualNearest`: as `ProximityK`, but a bond only counts when both ends pick
//!   each other.
//!
//! Split: `types.rs` (policy, graph, errors) and `build.rs` (construction).

mod build;
mod types;

pub use build::build_graph;
pub use types::{GraphError, NeighborGraph, NeighborPolicy};

#[cfg(test)]
mod tests;
