//! Periodic geometry: cell matrix, wrapping, and minimum-image displacements.
//!
//! Conventions
//! - Coordinates are fractional row vectors; `v · cell` is Cartesian.
//! - `cell` rows are the three lattice vectors (need not be orthogonal).

use std::fmt;

use nalgebra::{Matrix3, Vector3};

/// Errors raised when building a [`Cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellError {
    /// Some matrix entry is NaN or infinite.
    NonFinite,
    /// The lattice vectors are linearly dependent.
    Singular { det: f64 },
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::NonFinite => write!(f, "cell matrix has non-finite entries"),
            CellError::Singular { det } => {
                write!(f, "cell matrix is singular (det={det:e})")
            }
        }
    }
}

impl std::error::Error for CellError {}

/// Simulation cell mapping fractional to Cartesian coordinates.
///
/// Invariants:
/// - `rows` is finite and invertible; `inv` is its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    rows: Matrix3<f64>,
    inv: Matrix3<f64>,
}

impl Cell {
    /// Build from a matrix whose rows are the lattice vectors.
    pub fn new(rows: Matrix3<f64>) -> Result<Self, CellError> {
        if rows.iter().any(|x| !x.is_finite()) {
            return Err(CellError::NonFinite);
        }
        let det = rows.determinant();
        if det.abs() <= f64::EPSILON * rows.norm().powi(3) {
            return Err(CellError::Singular { det });
        }
        let inv = rows.try_inverse().ok_or(CellError::Singular { det })?;
        Ok(Self { rows, inv })
    }

    /// Orthorhombic box with edge lengths `a`, `b`, `c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<Self, CellError> {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, b, c)))
    }

    #[inline]
    pub fn rows(&self) -> &Matrix3<f64> {
        &self.rows
    }

    /// `v · cell`.
    #[inline]
    pub fn to_cartesian(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rows.tr_mul(v)
    }

    /// Inverse of [`Cell::to_cartesian`].
    #[inline]
    pub fn to_fractional(&self, r: &Vector3<f64>) -> Vector3<f64> {
        self.inv.tr_mul(r)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.rows.determinant().abs()
    }

    /// Distances between opposite faces; a cutoff below half of the smallest
    /// width keeps minimum images unique.
    pub fn perpendicular_widths(&self) -> Vector3<f64> {
        let a: Vector3<f64> = self.rows.row(0).transpose();
        let b: Vector3<f64> = self.rows.row(1).transpose();
        let c: Vector3<f64> = self.rows.row(2).transpose();
        let vol = self.volume();
        Vector3::new(
            vol / b.cross(&c).norm(),
            vol / c.cross(&a).norm(),
            vol / a.cross(&b).norm(),
        )
    }

    /// Cartesian length of the minimum-image displacement from `a` to `b`.
    #[inline]
    pub fn min_image_distance(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        self.to_cartesian(&wrap_delta(a, b)).norm()
    }

    /// Cell rotated rigidly by `rot` (Cartesian frame), fractional coords unchanged.
    pub fn rotated(&self, rot: &Matrix3<f64>) -> Result<Self, CellError> {
        Self::new(self.rows * rot.transpose())
    }
}

/// Minimum-image fractional displacement `b − a`, each component in [−0.5, 0.5).
#[inline]
pub fn wrap_delta(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (b - a).map(|d| d - (d + 0.5).floor())
}

/// Fold a fractional position into the unit cell `[0, 1)³`.
#[inline]
pub fn wrap(v: &Vector3<f64>) -> Vector3<f64> {
    v.map(|x| x - x.floor())
}

/// One immutable configuration: cell, fractional coordinates, optional bonds.
#[derive(Clone, Debug)]
pub struct Frame {
    pub cell: Cell,
    pub coords: Vec<Vector3<f64>>,
    /// Undirected bond list, e.g. a hydrogen-bond topology.
    pub bonds: Option<Vec<(usize, usize)>>,
}

impl Frame {
    pub fn new(cell: Cell, coords: Vec<Vector3<f64>>) -> Self {
        Self {
            cell,
            coords,
            bonds: None,
        }
    }

    pub fn with_bonds(mut self, bonds: Vec<(usize, usize)>) -> Self {
        self.bonds = Some(bonds);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Cartesian minimum-image vector from atom `a` to atom `b`.
    #[inline]
    pub fn displacement(&self, a: usize, b: usize) -> Vector3<f64> {
        self.cell
            .to_cartesian(&wrap_delta(&self.coords[a], &self.coords[b]))
    }

    /// Cartesian bond midpoint folded into the cell.
    pub fn midpoint(&self, a: usize, b: usize) -> Vector3<f64> {
        let xa = &self.coords[a];
        let half = wrap_delta(xa, &self.coords[b]) * 0.5;
        self.cell.to_cartesian(&wrap(&(xa + half)))
    }
}
