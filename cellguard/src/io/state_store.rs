//! Persisted contract state (`.cellguard/state.json`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::host::StateSnapshot;

const STATE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/state/v1.schema.json"
));

/// Current on-disk layout version.
pub const STATE_VERSION: u32 = 1;

/// On-disk state: every contract cell plus host bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    /// Calls dispatched so far, reverted ones included.
    pub nonce: u64,
    #[serde(flatten)]
    pub snapshot: StateSnapshot,
}

impl PersistedState {
    pub fn new(nonce: u64, snapshot: StateSnapshot) -> Self {
        Self {
            version: STATE_VERSION,
            nonce,
            snapshot,
        }
    }
}

/// Load state from disk and validate it against the embedded schema.
pub fn load_state(path: &Path) -> Result<PersistedState> {
    debug!(path = %path.display(), "loading state");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read state {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse state {}", path.display()))?;
    validate_schema(&value)?;
    let state: PersistedState = serde_json::from_value(value)
        .with_context(|| format!("deserialize state {}", path.display()))?;
    if state.snapshot.store.owner().is_zero() {
        return Err(anyhow!("state {} has a zero owner", path.display()));
    }
    debug!(nonce = state.nonce, "state loaded");
    Ok(state)
}

/// Atomically write state to disk (temp file + rename).
pub fn write_state(path: &Path, state: &PersistedState) -> Result<()> {
    debug!(path = %path.display(), nonce = state.nonce, "writing state");
    let mut buf = serde_json::to_string_pretty(state).context("serialize state")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

fn validate_schema(state: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(STATE_SCHEMA).context("parse state schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(state) {
        let messages = compiled
            .iter_errors(state)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "state schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
