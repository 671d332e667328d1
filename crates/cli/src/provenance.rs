//! Provenance sidecars next to written artifacts.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the parameters of the run and the files it read.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
    pub summary: Value,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            summary: Value::Null,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }
}

/// Write `<stem>.provenance.json` beside `artifact`; returns the sidecar path.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let mut doc = header();
    doc["params"] = payload.params;
    doc["inputs"] = json!(payload.inputs);
    doc["summary"] = payload.summary;
    doc["outputs"] = json!([artifact.to_string_lossy()]);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Code revision and library version.
pub fn header() -> Value {
    json!({
        "code_rev": current_git_rev(),
        "bondtwist_version": bondtwist::VERSION,
    })
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/out/twist.parquet"));
        assert_eq!(derived, Path::new("/tmp/out/twist.provenance.json"));
    }

    #[test]
    fn sidecar_records_params_and_io() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("twist.csv");
        fs::write(&artifact, "a,b\n").unwrap();
        let payload = Payload::new(json!({"policy": "mutual", "cutoff": 0.35}))
            .with_input("frame.json")
            .with_summary(json!({"edges": 3}));
        let path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0], "frame.json");
        assert_eq!(parsed["params"]["policy"], "mutual");
        assert_eq!(parsed["summary"]["edges"], 3);
        assert_eq!(parsed["bondtwist_version"], bondtwist::VERSION);
        assert!(parsed["code_rev"].is_string());
    }
}
