//! Data types for neighbor policies and the built graph.

use std::fmt;

use crate::cfg::DEFAULT_K;

/// How the neighbor set of each atom is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NeighborPolicy {
    /// Neighbors are the frame's bond partners.
    Explicit,
    /// The `k` nearest atoms within `cutoff`. Edges come from the frame's bonds
    /// when given, else from pairs within `bond_cutoff` (defaults to `cutoff`).
    ProximityK {
        cutoff: f64,
        k: usize,
        bond_cutoff: Option<f64>,
    },
    /// As `ProximityK`, but an edge counts only when both ends are among each
    /// other's `k` nearest.
    MutualNearest { cutoff: f64, k: usize },
}

impl NeighborPolicy {
    pub fn proximity(cutoff: f64) -> Self {
        Self::ProximityK {
            cutoff,
            k: DEFAULT_K,
            bond_cutoff: None,
        }
    }

    pub fn mutual(cutoff: f64) -> Self {
        Self::MutualNearest {
            cutoff,
            k: DEFAULT_K,
        }
    }

    /// Short lowercase name, used in logs and provenance.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::ProximityK { .. } => "proximity",
            Self::MutualNearest { .. } => "mutual",
        }
    }
}

/// Errors raised while building a neighbor graph. All are fatal for the run.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// `Explicit` needs a bond list and the frame has none.
    MissingBonds,
    /// A bond references an atom index past the end of the coordinates.
    AtomOutOfRange { atom: usize, len: usize },
    /// A bond joins an atom to itself.
    SelfBond { atom: usize },
    /// An atom has fewer candidates within the cutoff than the policy keeps.
    InsufficientNeighbors {
        atom: usize,
        found: usize,
        required: usize,
    },
    InvalidPolicy { reason: String },
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::MissingBonds => {
                write!(f, "explicit neighbor policy requires a bond list")
            }
            GraphError::AtomOutOfRange { atom, len } => {
                write!(f, "bond references atom {atom} but the frame has {len} atoms")
            }
            GraphError::SelfBond { atom } => write!(f, "atom {atom} is bonded to itself"),
            GraphError::InsufficientNeighbors {
                atom,
                found,
                required,
            } => write!(
                f,
                "atom {atom} has {found} neighbors within the cutoff, {required} required; \
                 increase the cutoff or use another policy"
            ),
            GraphError::InvalidPolicy { reason } => write!(f, "invalid neighbor policy: {reason}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Per-atom neighbor sets plus the edges to evaluate.
///
/// Invariants:
/// - `neighbors[i]` is sorted, deduplicated and never contains `i`.
/// - `edges` holds canonical `(min, max)` pairs in lexicographic order.
#[derive(Clone, Debug)]
pub struct NeighborGraph {
    pub(crate) policy: NeighborPolicy,
    pub(crate) neighbors: Vec<Vec<usize>>,
    pub(crate) edges: Vec<(usize, usize)>,
}

impl NeighborGraph {
    #[inline]
    pub fn policy(&self) -> NeighborPolicy {
        self.policy
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.neighbors[atom]
    }

    #[inline]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// `true` when `b` is in the neighbor set of `a`.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }

    /// Both ends list each other.
    #[inline]
    pub fn is_mutual(&self, a: usize, b: usize) -> bool {
        self.contains(a, b) && self.contains(b, a)
    }
}
