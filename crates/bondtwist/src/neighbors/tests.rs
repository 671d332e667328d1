//! Builder tests for the three neighbor policies.

use super::*;
use crate::lattice::diamond;
use crate::pairs::GridPairs;
use crate::periodic::{Cell, Frame};
use nalgebra::Vector3;

/// Points given in Cartesian units inside a 10×10×10 box, shifted to its center.
fn boxed(points: &[[f64; 3]]) -> Frame {
    let cell = Cell::orthorhombic(10.0, 10.0, 10.0).unwrap();
    let coords = points
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]) / 10.0 + Vector3::repeat(0.5))
        .collect();
    Frame::new(cell, coords)
}

fn tetrahedron() -> Frame {
    boxed(&[
        [1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
    ])
}

#[test]
fn explicit_dedups_and_canonicalizes() {
    let frame = tetrahedron().with_bonds(vec![(1, 0), (0, 1), (2, 0), (3, 2)]);
    let g = build_graph(&frame, NeighborPolicy::Explicit, &GridPairs).unwrap();
    assert_eq!(g.edges(), &[(0, 1), (0, 2), (2, 3)]);
    assert_eq!(g.neighbors(0), &[1, 2]);
    assert_eq!(g.neighbors(2), &[0, 3]);
    assert!(g.is_mutual(0, 2));
    assert!(!g.contains(1, 3));
}

#[test]
fn explicit_errors() {
    let frame = tetrahedron();
    assert_eq!(
        build_graph(&frame, NeighborPolicy::Explicit, &GridPairs).unwrap_err(),
        GraphError::MissingBonds
    );
    let bad = tetrahedron().with_bonds(vec![(0, 7)]);
    assert_eq!(
        build_graph(&bad, NeighborPolicy::Explicit, &GridPairs).unwrap_err(),
        GraphError::AtomOutOfRange { atom: 7, len: 4 }
    );
    let selfie = tetrahedron().with_bonds(vec![(2, 2)]);
    assert_eq!(
        build_graph(&selfie, NeighborPolicy::Explicit, &GridPairs).unwrap_err(),
        GraphError::SelfBond { atom: 2 }
    );
}

#[test]
fn proximity_with_three_candidates_is_fatal() {
    // every vertex of an isolated tetrahedron sees only three others
    let err = build_graph(&tetrahedron(), NeighborPolicy::proximity(4.0), &GridPairs).unwrap_err();
    assert_eq!(
        err,
        GraphError::InsufficientNeighbors {
            atom: 0,
            found: 3,
            required: 4
        }
    );
    assert!(err.to_string().contains("atom 0"));
}

#[test]
fn proximity_keeps_k_nearest() {
    // center atom with five neighbors at increasing distance
    let frame = boxed(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.1, 0.0],
        [0.0, 0.0, 1.2],
        [-1.3, 0.0, 0.0],
        [0.0, -1.4, 0.0],
    ]);
    let policy = NeighborPolicy::ProximityK {
        cutoff: 4.0,
        k: 4,
        bond_cutoff: Some(1.25),
    };
    let g = build_graph(&frame, policy, &GridPairs).unwrap();
    assert_eq!(g.neighbors(0), &[1, 2, 3, 4]);
    // edges come from the shorter bond cutoff
    assert_eq!(g.edges(), &[(0, 1), (0, 2), (0, 3)]);
    assert_eq!(g.policy(), policy);
}

#[test]
fn frame_bonds_override_proximity_edges() {
    let frame = diamond(2, 1.0).unwrap();
    let bonds = frame.bonds.clone().unwrap();
    let g = build_graph(&frame, NeighborPolicy::mutual(0.5), &GridPairs).unwrap();
    assert_eq!(g.edges(), bonds.as_slice());
    let sub = frame.clone().with_bonds(bonds[..5].to_vec());
    let g = build_graph(&sub, NeighborPolicy::mutual(0.5), &GridPairs).unwrap();
    assert_eq!(g.edges().len(), 5);
    // neighbor sets still come from proximity
    assert!(g.neighbors(0).len() == 4);
}

#[test]
fn invalid_policies_rejected() {
    let frame = diamond(2, 1.0).unwrap();
    for policy in [
        NeighborPolicy::ProximityK {
            cutoff: 0.5,
            k: 4,
            bond_cutoff: Some(0.6),
        },
        NeighborPolicy::MutualNearest { cutoff: 0.5, k: 0 },
        NeighborPolicy::MutualNearest {
            cutoff: -1.0,
            k: 4,
        },
        // the cell is 2 wide: a 1.1 cutoff reaches two images of some pairs
        NeighborPolicy::mutual(1.1),
        NeighborPolicy::proximity(1.1),
    ] {
        let err = build_graph(&frame, policy, &GridPairs).unwrap_err();
        assert!(matches!(err, GraphError::InvalidPolicy { .. }), "{policy:?}");
    }
}

#[test]
fn diamond_graphs_agree_across_policies() {
    let frame = diamond(2, 1.0).unwrap();
    let explicit = build_graph(&frame, NeighborPolicy::Explicit, &GridPairs).unwrap();
    let bare = Frame::new(frame.cell, frame.coords.clone());
    let prox = build_graph(&bare, NeighborPolicy::proximity(0.5), &GridPairs).unwrap();
    let mutual = build_graph(&bare, NeighborPolicy::mutual(0.5), &GridPairs).unwrap();
    assert_eq!(explicit.edges(), prox.edges());
    assert_eq!(explicit.edges(), mutual.edges());
    for atom in 0..frame.len() {
        assert_eq!(explicit.neighbors(atom), prox.neighbors(atom));
        assert_eq!(explicit.neighbors(atom), mutual.neighbors(atom));
    }
}

#[test]
fn tiny_cutoff_reports_the_first_lonely_atom() {
    let frame = diamond(2, 1.0).unwrap();
    let bare = Frame::new(frame.cell, frame.coords.clone());
    for policy in [NeighborPolicy::proximity(1e-7), NeighborPolicy::mutual(1e-300)] {
        let err = build_graph(&bare, policy, &GridPairs).unwrap_err();
        assert_eq!(
            err,
            GraphError::InsufficientNeighbors {
                atom: 0,
                found: 0,
                required: 4
            }
        );
    }
}
