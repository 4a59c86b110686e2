//! Initialization helpers for `.cellguard/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{CellguardConfig, write_config};
use super::state_store::{PersistedState, write_state};
use crate::core::types::Address;
use crate::host::StateSnapshot;

/// All canonical paths within `.cellguard/` for a project root.
#[derive(Debug, Clone)]
pub struct CellguardPaths {
    pub root: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub receipts_path: PathBuf,
}

impl CellguardPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state_dir = root.join(".cellguard");
        Self {
            root,
            config_path: state_dir.join("config.toml"),
            state_path: state_dir.join("state.json"),
            receipts_path: state_dir.join("receipts.jsonl"),
            state_dir,
        }
    }
}

/// Options for `init_cellguard`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Identity recorded as the store owner.
    pub owner: Address,
    /// If true, overwrite existing state, config, and receipts.
    pub force: bool,
}

/// Create `.cellguard/` scaffolding in `root`.
///
/// Fails if `.cellguard/` already exists unless `options.force` is set.
pub fn init_cellguard(root: &Path, options: &InitOptions) -> Result<CellguardPaths> {
    let paths = CellguardPaths::new(root);
    if paths.state_dir.exists() && !paths.state_dir.is_dir() {
        return Err(anyhow!(
            "cellguard init: .cellguard exists but is not a directory"
        ));
    }
    if paths.state_dir.exists() && !options.force {
        return Err(anyhow!(
            "cellguard init: .cellguard already exists (use --force to overwrite)"
        ));
    }
    if options.owner.is_zero() {
        return Err(anyhow!("cellguard init: owner must not be the zero address"));
    }

    fs::create_dir_all(&paths.state_dir)
        .with_context(|| format!("create directory {}", paths.state_dir.display()))?;

    write_config(&paths.config_path, &CellguardConfig::default())?;
    write_state(
        &paths.state_path,
        &PersistedState::new(0, StateSnapshot::genesis(options.owner)),
    )?;
    fs::write(&paths.receipts_path, "")
        .with_context(|| format!("write file {}", paths.receipts_path.display()))?;

    info!(owner = %options.owner, root = %root.display(), "initialized state directory");
    Ok(paths)
}
