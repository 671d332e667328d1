//! Result tables: one row per bond, written with polars.

use anyhow::{bail, Context, Result};
use bondtwist::{BondRecord, TwistOutcome};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Columns: `a, b, x, y, z, re, im, magnitude, phase_deg, pairs, status`.
/// Skipped bonds have nulls in the order-parameter columns and the skip
/// reason in `status`.
pub fn records_frame(records: &[BondRecord]) -> PolarsResult<DataFrame> {
    let n = records.len();
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut z = Vec::with_capacity(n);
    let mut re = Vec::with_capacity(n);
    let mut im = Vec::with_capacity(n);
    let mut magnitude = Vec::with_capacity(n);
    let mut phase = Vec::with_capacity(n);
    let mut pairs = Vec::with_capacity(n);
    let mut status = Vec::with_capacity(n);
    for r in records {
        a.push(r.a as u64);
        b.push(r.b as u64);
        x.push(r.midpoint.x);
        y.push(r.midpoint.y);
        z.push(r.midpoint.z);
        let op = r.outcome.measured();
        re.push(op.map(|op| op.value.re));
        im.push(op.map(|op| op.value.im));
        magnitude.push(op.map(|op| op.magnitude()));
        phase.push(op.map(|op| op.phase_degrees()));
        pairs.push(op.map(|op| op.pairs as u64));
        status.push(match r.outcome {
            TwistOutcome::Measured(_) => "measured",
            TwistOutcome::NotApplicable(reason) => reason.as_str(),
        });
    }
    df!(
        "a" => a,
        "b" => b,
        "x" => x,
        "y" => y,
        "z" => z,
        "re" => re,
        "im" => im,
        "magnitude" => magnitude,
        "phase_deg" => phase,
        "pairs" => pairs,
        "status" => status
    )
}

/// Write as CSV or Parquet, chosen by the file extension.
pub fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let ext = out.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "csv" => {
            let mut file =
                File::create(out).with_context(|| format!("creating {}", out.display()))?;
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        "parquet" => {
            let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
            ParquetWriter::new(file).finish(df)?;
        }
        other => bail!("unsupported output extension {other:?} (expected csv or parquet)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondtwist::api::{analyze, diamond, NeighborPolicy, TwistCfg};
    use tempfile::tempdir;

    fn ice_records() -> Vec<BondRecord> {
        let frame = diamond(2, 0.6358).unwrap();
        analyze(&frame, NeighborPolicy::Explicit, TwistCfg::default()).unwrap()
    }

    #[test]
    fn one_row_per_record() {
        let records = ice_records();
        let df = records_frame(&records).unwrap();
        assert_eq!(df.height(), records.len());
        assert_eq!(df.width(), 11);
        assert_eq!(df.column("re").unwrap().null_count(), 0);
        let mag = df.column("magnitude").unwrap().f64().unwrap();
        assert!(mag.into_iter().all(|m| (m.unwrap() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn csv_reads_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("twist.csv");
        let mut df = records_frame(&ice_records()).unwrap();
        write_table(&mut df, &out).unwrap();
        let back = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(back.shape(), df.shape());
        let status = back.column("status").unwrap().str().unwrap();
        assert_eq!(status.get(0), Some("measured"));
    }

    #[test]
    fn parquet_reads_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("twist.parquet");
        let mut df = records_frame(&ice_records()).unwrap();
        write_table(&mut df, &out).unwrap();
        let back = ParquetReader::new(File::open(&out).unwrap())
            .finish()
            .unwrap();
        assert_eq!(back.shape(), df.shape());
    }

    #[test]
    fn unknown_extension_fails() {
        let dir = tempdir().unwrap();
        let mut df = records_frame(&ice_records()).unwrap();
        let err = write_table(&mut df, &dir.path().join("twist.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }
}
