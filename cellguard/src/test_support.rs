//! Test-only helpers: fixed identities and a scratch `.cellguard/` root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::call::Call;
use crate::core::types::{ADDRESS_LEN, Address};
use crate::invoke::{InvokeOutcome, ScriptedCall, invoke};
use crate::io::init::{CellguardPaths, InitOptions, init_cellguard};
use crate::io::state_store::{PersistedState, load_state};

/// Identity used as the store owner throughout the tests.
pub fn owner() -> Address {
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes[ADDRESS_LEN - 1] = 0x01;
    Address::new(bytes)
}

/// Identity that never owns anything.
pub fn stranger() -> Address {
    Address::new([0xee; ADDRESS_LEN])
}

/// Temporary project root initialized with [`owner`].
pub struct TestRoot {
    temp: TempDir,
    paths: CellguardPaths,
}

impl TestRoot {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let paths = init_cellguard(
            temp.path(),
            &InitOptions {
                owner: owner(),
                force: false,
            },
        )?;
        Ok(Self { temp, paths })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn paths(&self) -> &CellguardPaths {
        &self.paths
    }

    pub fn state(&self) -> Result<PersistedState> {
        load_state(&self.paths.state_path)
    }

    pub fn invoke(&self, caller: Option<Address>, call: Call) -> Result<InvokeOutcome> {
        invoke(self.path(), caller, call)
    }

    /// Write a replay script under the root and return its path.
    pub fn write_script(&self, calls: &[ScriptedCall]) -> Result<PathBuf> {
        let path = self.path().join("script.json");
        let buf = serde_json::to_string_pretty(calls).context("serialize script")?;
        fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
