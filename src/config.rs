use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub run_id: String,
    /// Text postcli prints when every checked label is valid.
    pub success_marker: String,
    /// Text postcli prints before describing the first invalid label.
    pub failure_marker: String,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p).with_context(|| format!("reading config {}", p.display()))?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let mut config: Config = serde_yaml::from_slice(&bytes)?;
    if config.success_marker.is_empty() || config.failure_marker.is_empty() {
        bail!("config markers must not be empty");
    }
    if config.run_id.trim().is_empty() {
        config.run_id = generate_run_id();
    }

    let config_hash = config_digest(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

/// Hex SHA-256 of the config bytes, carried into the run summary so a
/// report can be tied to the markers it was judged with.
fn config_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `<UTC timestamp>_<pid>`, unique per concurrent run on one host.
fn generate_run_id() -> String {
    let started = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("{started}_{}", std::process::id())
}
