use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
    goldens: HashMap<String, GoldenEntry>,
}

#[derive(Debug, Deserialize)]
struct GoldenEntry {
    rig: String,
    cases: String,
}

/// One recorded solve: slider input and the expected shape weights.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenCase {
    #[serde(default)]
    pub label: Option<String>,
    pub input: Vec<f64>,
    pub output: Vec<f64>,
    #[serde(default)]
    pub exact: bool,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod rigs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.rigs.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Raw schema text, as the solver consumes it.
    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        read_to_string(rel)
    }
}

pub mod goldens {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.goldens.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Name of the rig fixture a golden set was recorded against.
    pub fn rig(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.goldens, "golden", name)?;
        Ok(entry.rig.clone())
    }

    pub fn cases(name: &str) -> Result<Vec<GoldenCase>> {
        let entry = lookup(&MANIFEST.goldens, "golden", name)?;
        super::load_json(&entry.cases)
    }
}
