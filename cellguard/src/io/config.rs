//! Configuration stored under `.cellguard/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::Address;

/// Cellguard configuration (TOML).
///
/// Edited by humans. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CellguardConfig {
    /// Caller used when a command omits `--caller`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_caller: Option<Address>,

    /// Append a receipt per call to `.cellguard/receipts.jsonl`.
    pub record_receipts: bool,

    /// Upper bound on the number of calls in one `replay` script.
    pub max_replay_calls: usize,
}

impl Default for CellguardConfig {
    fn default() -> Self {
        Self {
            default_caller: None,
            record_receipts: true,
            max_replay_calls: 1024,
        }
    }
}

impl CellguardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_replay_calls == 0 {
            return Err(anyhow!("max_replay_calls must be > 0"));
        }
        if self.default_caller.is_some_and(|caller| caller.is_zero()) {
            return Err(anyhow!("default_caller must not be the zero address"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CellguardConfig::default()`.
pub fn load_config(path: &Path) -> Result<CellguardConfig> {
    if !path.exists() {
        let cfg = CellguardConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CellguardConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &CellguardConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
