//! JSON frame files.
//!
//! Layout: `cell` holds the three lattice vectors as rows, `coords` are
//! fractional, `bonds` (optional) are index pairs.

use anyhow::{Context, Result};
use bondtwist::{Cell, Frame, Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameFile {
    pub cell: [[f64; 3]; 3],
    pub coords: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<Vec<(usize, usize)>>,
}

impl FrameFile {
    pub fn from_frame(frame: &Frame) -> Self {
        let m = frame.cell.rows();
        let cell = [0, 1, 2].map(|r| [m[(r, 0)], m[(r, 1)], m[(r, 2)]]);
        Self {
            cell,
            coords: frame.coords.iter().map(|v| [v.x, v.y, v.z]).collect(),
            bonds: frame.bonds.clone(),
        }
    }

    pub fn into_frame(self) -> Result<Frame> {
        let [r0, r1, r2] = self.cell;
        let rows = Mat3::new(
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        );
        let cell = Cell::new(rows).context("invalid cell")?;
        let coords = self
            .coords
            .into_iter()
            .map(|[x, y, z]| Vec3::new(x, y, z))
            .collect();
        let frame = Frame::new(cell, coords);
        Ok(match self.bonds {
            Some(bonds) => frame.with_bonds(bonds),
            None => frame,
        })
    }
}

pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: FrameFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing frame {}", path.display()))?;
    file.into_frame()
        .with_context(|| format!("frame {}", path.display()))
}

pub fn write_frame<P: AsRef<Path>>(path: P, frame: &Frame) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let doc = FrameFile::from_frame(frame);
    fs::write(path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondtwist::api::diamond;
    use tempfile::tempdir;

    #[test]
    fn lattice_survives_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/ice.json");
        let frame = diamond(2, 0.6358).unwrap();
        write_frame(&path, &frame).unwrap();
        let back = read_frame(&path).unwrap();
        assert_eq!(back.bonds, frame.bonds);
        assert!((back.cell.rows() - frame.cell.rows()).norm() < 1e-12);
        for (p, q) in back.coords.iter().zip(&frame.coords) {
            assert!((p - q).norm() < 1e-12);
        }
    }

    #[test]
    fn bonds_are_optional() {
        let json = r#"{"cell": [[2,0,0],[0,2,0],[0,0,2]], "coords": [[0.1,0.2,0.3]]}"#;
        let file: FrameFile = serde_json::from_str(json).unwrap();
        let frame = file.into_frame().unwrap();
        assert_eq!(frame.len(), 1);
        assert!(frame.bonds.is_none());
    }

    #[test]
    fn flat_cell_is_rejected() {
        let file = FrameFile {
            cell: [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            coords: vec![],
            bonds: None,
        };
        let err = file.into_frame().unwrap_err();
        assert!(format!("{err:#}").contains("singular"));
    }
}
