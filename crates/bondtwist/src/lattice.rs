//! Reference frames for experiments and tests.
//!
//! Purpose
//! - Ideal four-coordinated lattices (oxygen sites of cubic ice Ic, i.e. the
//!   diamond lattice) where every bond has exact tetrahedral geometry.
//! - Reproducible thermal-like noise (`jittered`) and rigid motions
//!   (`rigid_motion`) to probe robustness and frame invariance.
//!
//! Determinism: jitter draws from `StdRng::seed_from_u64(seed)` only.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pairs::{GridPairs, PairSource};
use crate::periodic::{wrap, Cell, CellError, Frame};

/// Cubic ice lattice constant in nm (O–O distance ≈ 0.2753 nm).
pub const ICE_IC_LATTICE_NM: f64 = 0.6358;

/// Fractional sites of one conventional diamond cell (fcc + shifted fcc).
const DIAMOND_BASIS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
    [0.25, 0.25, 0.25],
    [0.25, 0.75, 0.75],
    [0.75, 0.25, 0.75],
    [0.75, 0.75, 0.25],
];

/// Errors raised while building reference frames.
#[derive(Debug, Clone, PartialEq)]
pub enum LatticeError {
    Cell(CellError),
    /// Jitter amplitude is NaN or infinite.
    NonFiniteAmplitude { amplitude: f64 },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeError::Cell(e) => write!(f, "lattice cell: {e}"),
            LatticeError::NonFiniteAmplitude { amplitude } => {
                write!(f, "jitter amplitude must be finite, got {amplitude}")
            }
        }
    }
}

impl std::error::Error for LatticeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LatticeError::Cell(e) => Some(e),
            LatticeError::NonFiniteAmplitude { .. } => None,
        }
    }
}

impl From<CellError> for LatticeError {
    fn from(e: CellError) -> Self {
        LatticeError::Cell(e)
    }
}

/// Nearest-neighbor distance of the diamond lattice in units of the lattice constant.
pub fn diamond_bond_length(a: f64) -> f64 {
    a * 3f64.sqrt() / 4.0
}

/// `reps³` conventional diamond cells with lattice constant `a`, bonds included.
///
/// Every atom has exactly four bonds. `reps = 0` is treated as 1. Proximity
/// policies need `reps >= 2` to reach the second shell under minimum image.
pub fn diamond(reps: usize, a: f64) -> Result<Frame, LatticeError> {
    let reps = reps.max(1);
    let n = reps as f64;
    let cell = Cell::orthorhombic(n * a, n * a, n * a)?;
    let mut coords = Vec::with_capacity(8 * reps * reps * reps);
    for i in 0..reps {
        for j in 0..reps {
            for k in 0..reps {
                let offset = Vector3::new(i as f64, j as f64, k as f64);
                for site in DIAMOND_BASIS {
                    coords.push((Vector3::from(site) + offset) / n);
                }
            }
        }
    }
    let frame = Frame::new(cell, coords);
    // past the first shell (0.433 a) and below half of a single cell
    let bond_cutoff = 0.45 * a;
    let bonds = GridPairs
        .pairs(&frame, bond_cutoff)
        .into_iter()
        .map(|p| (p.i, p.j))
        .collect();
    Ok(frame.with_bonds(bonds))
}

/// Copy of `frame` with every atom displaced uniformly within `±amplitude`
/// (Cartesian units) along each axis. Bonds are kept.
pub fn jittered(frame: &Frame, amplitude: f64, seed: u64) -> Result<Frame, LatticeError> {
    if !amplitude.is_finite() {
        return Err(LatticeError::NonFiniteAmplitude { amplitude });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let coords = frame
        .coords
        .iter()
        .map(|x| {
            if amplitude <= 0.0 {
                return *x;
            }
            let dr = Vector3::new(
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
            );
            wrap(&(x + frame.cell.to_fractional(&dr)))
        })
        .collect();
    Ok(Frame {
        cell: frame.cell,
        coords,
        bonds: frame.bonds.clone(),
    })
}

/// Rotate the whole configuration by `rot` and translate it by the fractional
/// vector `shift`. Relative geometry is unchanged.
pub fn rigid_motion(
    frame: &Frame,
    rot: &Matrix3<f64>,
    shift: &Vector3<f64>,
) -> Result<Frame, CellError> {
    Ok(Frame {
        cell: frame.cell.rotated(rot)?,
        coords: frame.coords.iter().map(|x| wrap(&(x + shift))).collect(),
        bonds: frame.bonds.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_is_four_coordinated() {
        let frame = diamond(2, 1.0).unwrap();
        assert_eq!(frame.len(), 64);
        let bonds = frame.bonds.as_ref().unwrap();
        assert_eq!(bonds.len(), 64 * 4 / 2);
        let mut degree = vec![0usize; frame.len()];
        for &(a, b) in bonds {
            degree[a] += 1;
            degree[b] += 1;
            let d = frame.cell.min_image_distance(&frame.coords[a], &frame.coords[b]);
            assert!((d - diamond_bond_length(1.0)).abs() < 1e-12);
        }
        assert!(degree.iter().all(|&d| d == 4));
    }

    #[test]
    fn jitter_is_reproducible_and_bounded() {
        let frame = diamond(2, 1.0).unwrap();
        let j1 = jittered(&frame, 0.02, 5).unwrap();
        let j2 = jittered(&frame, 0.02, 5).unwrap();
        assert_eq!(j1.coords, j2.coords);
        for (x, y) in frame.coords.iter().zip(&j1.coords) {
            let d = frame.cell.to_cartesian(&crate::periodic::wrap_delta(x, y));
            assert!(d.amax() <= 0.02 + 1e-12);
        }
        let j3 = jittered(&frame, 0.02, 6).unwrap();
        assert_ne!(j1.coords, j3.coords);
    }

    #[test]
    fn single_cell_diamond_has_unique_bonds() {
        let frame = diamond(1, 1.0).unwrap();
        assert_eq!(frame.len(), 8);
        let bonds = frame.bonds.as_ref().unwrap();
        assert_eq!(bonds.len(), 16);
        let mut degree = vec![0usize; frame.len()];
        for &(a, b) in bonds {
            degree[a] += 1;
            degree[b] += 1;
        }
        assert!(degree.iter().all(|&d| d == 4));
    }

    #[test]
    fn non_finite_jitter_is_rejected() {
        let frame = diamond(2, 1.0).unwrap();
        for amplitude in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = jittered(&frame, amplitude, 1).unwrap_err();
            assert!(matches!(err, LatticeError::NonFiniteAmplitude { .. }));
        }
        let same = jittered(&frame, 0.0, 1).unwrap();
        assert_eq!(same.coords, frame.coords);
    }
}
