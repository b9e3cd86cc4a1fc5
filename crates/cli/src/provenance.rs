//! Provenance sidecars for CLI artifacts.
//!
//! Every file written by `batch` gets a `<stem>.provenance.json` next to it
//! recording the code revision, library version, call site and parameters, so
//! a CSV found later can be regenerated.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Parameters recorded in a sidecar.
pub struct Payload {
    pub params: Value,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self { params }
    }
}

/// Provenance document for `outputs`, without writing anything.
#[track_caller]
pub fn provenance_doc(outputs: &[&Path], payload: &Payload) -> Value {
    let callsite = Location::caller();
    let outputs: Vec<String> = outputs
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    json!({
        "code_rev": current_git_rev(),
        "moldcast_version": moldcast::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = provenance_doc(&[artifact], &payload);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|r| !r.is_empty()) {
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
    fn provenance_path_replaces_extension() {
        let base = Path::new("/tmp/output/top_edges.csv");
        assert_eq!(
            provenance_path(base),
            Path::new("/tmp/output/top_edges.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("")),
            Path::new("artifact.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_outputs_and_params() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("run.csv");
        fs::write(&artifact, "file\n").unwrap();
        let prov = write_sidecar(&artifact, Payload::new(json!({"kernel": "integer"}))).unwrap();
        assert!(prov.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["kernel"], "integer");
        assert_eq!(parsed["moldcast_version"], moldcast::VERSION);
        assert!(parsed["callsite"]["file"]
            .as_str()
            .unwrap()
            .ends_with("provenance.rs"));
    }
}
