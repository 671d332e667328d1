//! Periodic pair enumeration.
//!
//! The neighbor builders only need "all pairs within a cutoff, with distances";
//! `PairSource` is that seam. `GridPairs` is a fractional cell list: the cell is
//! split into `floor(width / cutoff)` bins per axis so every pair within the cutoff
//! sits in adjacent bins. Thin cells (fewer than three bins on an axis) fall back
//! to checking all pairs.
//!
//! Precondition for both paths: `cutoff` is at most half the smallest
//! perpendicular cell width, so each pair has a single minimum image.

use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::cfg::MIN_GRID_BINS;
use crate::periodic::{wrap, Frame};

/// Unordered atom pair with `i < j` and its minimum-image distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pair {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
}

/// Enumerates all atom pairs of a frame within a cutoff radius.
pub trait PairSource {
    /// Pairs sorted by `(i, j)`, each listed once.
    fn pairs(&self, frame: &Frame, cutoff: f64) -> Vec<Pair>;
}

/// Cell-list pair search under periodic boundary conditions.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridPairs;

impl GridPairs {
    /// Bins per axis for `cutoff`; `None` when the grid is too coarse to help.
    ///
    /// Each axis is capped near `cbrt(n_atoms)`, so the bin count stays of the
    /// order of the atom count however small the cutoff. Wider bins only add
    /// candidates; every pair within the cutoff still sits in adjacent bins.
    pub fn grid_shape(frame: &Frame, cutoff: f64) -> Option<[usize; 3]> {
        let cap = max_bins_per_axis(frame.len());
        let widths = frame.cell.perpendicular_widths();
        let n = widths.map(|w| ((w / cutoff).floor() as usize).min(cap));
        if n.iter().any(|&k| k < MIN_GRID_BINS) {
            return None;
        }
        n.x.checked_mul(n.y)?.checked_mul(n.z)?;
        Some([n.x, n.y, n.z])
    }
}

impl PairSource for GridPairs {
    fn pairs(&self, frame: &Frame, cutoff: f64) -> Vec<Pair> {
        let _span = info_span!("pairs", n_atoms = frame.len(), cutoff).entered();
        let widths = frame.cell.perpendicular_widths();
        if 2.0 * cutoff > widths.min() {
            warn!(
                cutoff,
                min_width = widths.min(),
                "cutoff exceeds half the cell width; minimum images are ambiguous"
            );
        }
        let out = match Self::grid_shape(frame, cutoff) {
            Some(shape) => grid_pairs(frame, cutoff, shape),
            None => all_pairs(frame, cutoff),
        };
        debug!(pairs = out.len(), "pair search done");
        out
    }
}

fn all_pairs(frame: &Frame, cutoff: f64) -> Vec<Pair> {
    let n = frame.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            ((i + 1)..n).filter_map(move |j| within(frame, i, j, cutoff))
        })
        .collect()
}

fn grid_pairs(frame: &Frame, cutoff: f64, shape: [usize; 3]) -> Vec<Pair> {
    let bin_of = |x: &Vector3<f64>| -> [usize; 3] {
        let u = wrap(x);
        let mut b = [0usize; 3];
        for d in 0..3 {
            b[d] = ((u[d] * shape[d] as f64) as usize).min(shape[d] - 1);
        }
        b
    };
    let linear = |b: [usize; 3]| b[0] + shape[0] * (b[1] + shape[1] * b[2]);

    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); shape[0] * shape[1] * shape[2]];
    let atom_bins: Vec<[usize; 3]> = frame.coords.iter().map(bin_of).collect();
    for (idx, b) in atom_bins.iter().enumerate() {
        bins[linear(*b)].push(idx);
    }

    let mut out: Vec<Pair> = (0..frame.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let home = atom_bins[i];
            let mut found = Vec::new();
            for dx in -1i64..=1 {
                for dy in -1i64..=1 {
                    for dz in -1i64..=1 {
                        let b = [
                            shift(home[0], dx, shape[0]),
                            shift(home[1], dy, shape[1]),
                            shift(home[2], dz, shape[2]),
                        ];
                        for &j in &bins[linear(b)] {
                            if j <= i {
                                continue;
                            }
                            if let Some(p) = within(frame, i, j, cutoff) {
                                found.push(p);
                            }
                        }
                    }
                }
            }
            found.sort_by_key(|p| p.j);
            found
        })
        .collect();
    out.sort_by_key(|p| (p.i, p.j));
    out
}

fn max_bins_per_axis(n_atoms: usize) -> usize {
    ((n_atoms as f64).cbrt().ceil() as usize).max(MIN_GRID_BINS)
}

#[inline]
fn shift(b: usize, d: i64, n: usize) -> usize {
    (b as i64 + d).rem_euclid(n as i64) as usize
}

#[inline]
fn within(frame: &Frame, i: usize, j: usize, cutoff: f64) -> Option<Pair> {
    let distance = frame
        .cell
        .min_image_distance(&frame.coords[i], &frame.coords[j]);
    (distance <= cutoff).then_some(Pair { i, j, distance })
}
