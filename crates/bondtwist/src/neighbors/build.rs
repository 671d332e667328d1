//! Graph construction for the three neighbor policies.

use tracing::{debug, info_span};

use crate::pairs::{Pair, PairSource};
use crate::periodic::Frame;

use super::types::{GraphError, NeighborGraph, NeighborPolicy};

/// Build the neighbor graph of `frame` under `policy`.
///
/// Proximity policies call `pairs` once with the neighbor cutoff; the result is
/// cached in the returned graph and reused by every edge evaluation.
pub fn build_graph<P: PairSource + ?Sized>(
    frame: &Frame,
    policy: NeighborPolicy,
    pairs: &P,
) -> Result<NeighborGraph, GraphError> {
    let _span = info_span!("build_graph", policy = policy.name(), n_atoms = frame.len()).entered();
    let graph = match policy {
        NeighborPolicy::Explicit => {
            let bonds = frame.bonds.as_deref().ok_or(GraphError::MissingBonds)?;
            let edges = canonical_edges(bonds, frame.len())?;
            let neighbors = adjacency(&edges, frame.len());
            NeighborGraph {
                policy,
                neighbors,
                edges,
            }
        }
        NeighborPolicy::ProximityK {
            cutoff,
            k,
            bond_cutoff,
        } => {
            check_proximity(frame, cutoff, k)?;
            let bond_cutoff = bond_cutoff.unwrap_or(cutoff);
            if !(bond_cutoff > 0.0 && bond_cutoff <= cutoff) {
                return Err(GraphError::invalid(format!(
                    "bond_cutoff {bond_cutoff} must lie in (0, cutoff={cutoff}]"
                )));
            }
            let found = pairs.pairs(frame, cutoff);
            let neighbors = k_nearest(&found, frame.len(), k)?;
            let edges = edge_source(frame, &found, bond_cutoff)?;
            NeighborGraph {
                policy,
                neighbors,
                edges,
            }
        }
        NeighborPolicy::MutualNearest { cutoff, k } => {
            check_proximity(frame, cutoff, k)?;
            let found = pairs.pairs(frame, cutoff);
            let neighbors = k_nearest(&found, frame.len(), k)?;
            let edges = edge_source(frame, &found, cutoff)?;
            NeighborGraph {
                policy,
                neighbors,
                edges,
            }
        }
    };
    debug!(edges = graph.edges.len(), "neighbor graph built");
    Ok(graph)
}

/// Positive cutoff, `k >= 1`, and a single minimum image for every pair.
fn check_proximity(frame: &Frame, cutoff: f64, k: usize) -> Result<(), GraphError> {
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(GraphError::invalid(format!("cutoff must be > 0, got {cutoff}")));
    }
    let min_width = frame.cell.perpendicular_widths().min();
    if 2.0 * cutoff > min_width {
        return Err(GraphError::invalid(format!(
            "cutoff {cutoff} exceeds half the smallest cell width ({min_width})"
        )));
    }
    if k == 0 {
        return Err(GraphError::invalid("k must be at least 1"));
    }
    Ok(())
}

/// Frame bonds when present, otherwise every pair within `bond_cutoff`.
fn edge_source(
    frame: &Frame,
    found: &[Pair],
    bond_cutoff: f64,
) -> Result<Vec<(usize, usize)>, GraphError> {
    match frame.bonds.as_deref() {
        Some(bonds) => canonical_edges(bonds, frame.len()),
        None => Ok(found
            .iter()
            .filter(|p| p.distance <= bond_cutoff)
            .map(|p| (p.i, p.j))
            .collect()),
    }
}

fn canonical_edges(
    bonds: &[(usize, usize)],
    len: usize,
) -> Result<Vec<(usize, usize)>, GraphError> {
    let mut edges = Vec::with_capacity(bonds.len());
    for &(a, b) in bonds {
        for atom in [a, b] {
            if atom >= len {
                return Err(GraphError::AtomOutOfRange { atom, len });
            }
        }
        if a == b {
            return Err(GraphError::SelfBond { atom: a });
        }
        edges.push((a.min(b), a.max(b)));
    }
    edges.sort_unstable();
    edges.dedup();
    Ok(edges)
}

fn adjacency(edges: &[(usize, usize)], len: usize) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); len];
    for &(a, b) in edges {
        adj[a].push(b);
        adj[b].push(a);
    }
    for list in adj.iter_mut() {
        list.sort_unstable();
    }
    adj
}

/// Keep the `k` nearest candidates of every atom (ties broken by index).
fn k_nearest(found: &[Pair], len: usize, k: usize) -> Result<Vec<Vec<usize>>, GraphError> {
    let mut cand: Vec<Vec<(f64, usize)>> = vec![Vec::new(); len];
    for p in found {
        cand[p.i].push((p.distance, p.j));
        cand[p.j].push((p.distance, p.i));
    }
    let mut out = Vec::with_capacity(len);
    for (atom, mut list) in cand.into_iter().enumerate() {
        if list.len() < k {
            return Err(GraphError::InsufficientNeighbors {
                atom,
                found: list.len(),
                required: k,
            });
        }
        list.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
        let mut kept: Vec<usize> = list.into_iter().take(k).map(|(_, j)| j).collect();
        kept.sort_unstable();
        out.push(kept);
    }
    Ok(out)
}
