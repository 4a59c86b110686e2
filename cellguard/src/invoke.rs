//! Orchestration for `cellguard` call commands.
//!
//! Loads persisted state into a [`Host`], dispatches calls in order, then
//! writes the new state and receipts back. Contract reverts are part of the
//! outcome, not an `Err`; `Err` is reserved for I/O and configuration
//! failures.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::call::{Call, CallReturn};
use crate::core::error::ContractError;
use crate::core::types::Address;
use crate::host::Host;
use crate::io::config::{CellguardConfig, load_config};
use crate::io::init::CellguardPaths;
use crate::io::receipt_log::{Receipt, append_receipts};
use crate::io::state_store::{PersistedState, load_state, write_state};

/// One entry of a replay script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedCall {
    pub caller: Address,
    pub call: Call,
}

/// Result of one dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeOutcome {
    /// Nonce assigned to the call.
    pub nonce: u64,
    pub caller: Address,
    pub result: Result<CallReturn, ContractError>,
}

impl InvokeOutcome {
    pub fn reverted(&self) -> bool {
        self.result.is_err()
    }
}

/// Dispatch a single call, resolving the caller from `config.toml` when
/// `caller` is `None`.
pub fn invoke(root: &Path, caller: Option<Address>, call: Call) -> Result<InvokeOutcome> {
    let paths = CellguardPaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config.toml")?;
    let caller = resolve_caller(caller, &cfg)?;
    let mut outcomes = run_batch(&paths, &cfg, vec![ScriptedCall { caller, call }])?;
    outcomes
        .pop()
        .ok_or_else(|| anyhow!("call produced no outcome"))
}

/// Execute every call in a JSON script, in order.
///
/// A reverted call does not stop the script; each call commits or reverts
/// on its own.
pub fn replay(root: &Path, script_path: &Path) -> Result<Vec<InvokeOutcome>> {
    let paths = CellguardPaths::new(root);
    let cfg = load_config(&paths.config_path).context("load config.toml")?;
    let raw = fs::read_to_string(script_path)
        .with_context(|| format!("read script {}", script_path.display()))?;
    let script: Vec<ScriptedCall> = serde_json::from_str(&raw)
        .with_context(|| format!("parse script {}", script_path.display()))?;
    if script.len() > cfg.max_replay_calls {
        return Err(anyhow!(
            "script has {} calls, limit is {} (max_replay_calls)",
            script.len(),
            cfg.max_replay_calls
        ));
    }
    run_batch(&paths, &cfg, script)
}

fn resolve_caller(explicit: Option<Address>, cfg: &CellguardConfig) -> Result<Address> {
    explicit.or(cfg.default_caller).ok_or_else(|| {
        anyhow!("no caller: pass --caller or set default_caller in .cellguard/config.toml")
    })
}

fn run_batch(
    paths: &CellguardPaths,
    cfg: &CellguardConfig,
    calls: Vec<ScriptedCall>,
) -> Result<Vec<InvokeOutcome>> {
    let state = load_state(&paths.state_path).context("load state.json")?;
    let host = Host::from_snapshot(state.snapshot);
    let mut nonce = state.nonce;

    let mut outcomes = Vec::with_capacity(calls.len());
    let mut receipts = Vec::with_capacity(calls.len());
    for ScriptedCall { caller, call } in calls {
        let next = nonce
            .checked_add(1)
            .ok_or_else(|| anyhow!("nonce {nonce} is exhausted; no further calls can be recorded"))?;
        debug!(%caller, nonce, method = call.method(), "dispatching call");
        let result = host.execute(caller, &call);
        match &result {
            Ok(output) => info!(nonce, method = call.method(), %output, "call committed"),
            Err(err) => warn!(nonce, method = call.method(), error = %err, "call reverted"),
        }
        receipts.push(Receipt::new(nonce, caller, call, &result));
        outcomes.push(InvokeOutcome {
            nonce,
            caller,
            result,
        });
        nonce = next;
    }

    // Receipts go first: a failed append leaves state.json untouched.
    if cfg.record_receipts {
        append_receipts(&paths.receipts_path, &receipts).context("append receipts")?;
    }
    write_state(
        &paths.state_path,
        &PersistedState::new(nonce, host.snapshot()),
    )
    .context("write state.json")?;
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Outcome, Record};
    use crate::io::config::write_config;
    use crate::io::receipt_log::{ReceiptStatus, read_receipts};
    use crate::test_support::{TestRoot, owner, stranger};

    #[test]
    fn invoke_commits_and_advances_nonce() {
        let root = TestRoot::new().expect("root");

        let outcome = root
            .invoke(Some(owner()), Call::SetScalar { value: 5 })
            .expect("invoke");
        assert_eq!(outcome.nonce, 0);
        assert_eq!(outcome.result, Ok(CallReturn::Unit));

        let state = root.state().expect("state");
        assert_eq!(state.nonce, 1);
        assert_eq!(state.snapshot.store.scalar(), 5);
    }

    /// Reverts keep contract cells but still consume a nonce and a receipt.
    #[test]
    fn reverted_invoke_keeps_cells_and_logs_receipt() {
        let root = TestRoot::new().expect("root");
        let before = root.state().expect("state");

        let outcome = root
            .invoke(Some(stranger()), Call::SetScalar { value: 5 })
            .expect("invoke");
        assert!(outcome.reverted());

        let after = root.state().expect("state");
        assert_eq!(after.snapshot, before.snapshot);
        assert_eq!(after.nonce, before.nonce + 1);

        let receipts = read_receipts(&root.paths().receipts_path).expect("receipts");
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].status, ReceiptStatus::Reverted);
        assert_eq!(receipts[0].caller, stranger());
    }

    #[test]
    fn invoke_without_caller_uses_config_default() {
        let root = TestRoot::new().expect("root");
        let err = root
            .invoke(None, Call::SetScalar { value: 1 })
            .unwrap_err();
        assert!(err.to_string().contains("no caller"));

        let cfg = CellguardConfig {
            default_caller: Some(owner()),
            ..CellguardConfig::default()
        };
        write_config(&root.paths().config_path, &cfg).expect("write config");
        let outcome = root
            .invoke(None, Call::SetScalar { value: 1 })
            .expect("invoke");
        assert_eq!(outcome.caller, owner());
        assert!(!outcome.reverted());
    }

    #[test]
    fn receipts_can_be_disabled() {
        let root = TestRoot::new().expect("root");
        let cfg = CellguardConfig {
            record_receipts: false,
            ..CellguardConfig::default()
        };
        write_config(&root.paths().config_path, &cfg).expect("write config");

        root.invoke(Some(owner()), Call::Evaluate { x: 500, y: 200, z: 300 })
            .expect("invoke");
        let receipts = read_receipts(&root.paths().receipts_path).expect("receipts");
        assert!(receipts.is_empty());
    }

    #[test]
    fn replay_runs_every_call_in_order() {
        let root = TestRoot::new().expect("root");
        let script = vec![
            ScriptedCall {
                caller: owner(),
                call: Call::UpdateRecord {
                    input: Record::new(0, 0),
                },
            },
            ScriptedCall {
                caller: stranger(),
                call: Call::UpdateRecord {
                    input: Record::new(0, 0),
                },
            },
            ScriptedCall {
                caller: stranger(),
                call: Call::Classify { a: 42, b: 2, c: -1 },
            },
        ];
        let script_path = root.write_script(&script).expect("script");

        let outcomes = replay(root.path(), &script_path).expect("replay");
        let nonces: Vec<u64> = outcomes.iter().map(|outcome| outcome.nonce).collect();
        assert_eq!(nonces, vec![0, 1, 2]);
        assert_eq!(outcomes[0].result, Ok(CallReturn::Word(21)));
        assert!(outcomes[1].reverted());
        assert_eq!(
            outcomes[2].result,
            Ok(CallReturn::Outcome(Outcome::HighSumLowC))
        );

        let state = root.state().expect("state");
        assert_eq!(state.nonce, 3);
        assert_eq!(state.snapshot.store.record(), Record::new(10, 40));
    }

    #[test]
    fn exhausted_nonce_refuses_call_without_writing() {
        let root = TestRoot::new().expect("root");
        let state = root.state().expect("state");
        write_state(
            &root.paths().state_path,
            &PersistedState::new(u64::MAX, state.snapshot.clone()),
        )
        .expect("write state");

        let err = root
            .invoke(Some(owner()), Call::SetScalar { value: 1 })
            .unwrap_err();
        assert!(err.to_string().contains("exhausted"));

        let after = root.state().expect("state");
        assert_eq!(after.nonce, u64::MAX);
        assert_eq!(after.snapshot, state.snapshot);
        let receipts = read_receipts(&root.paths().receipts_path).expect("receipts");
        assert!(receipts.is_empty());
    }

    #[test]
    fn failed_receipt_append_leaves_state_uncommitted() {
        let root = TestRoot::new().expect("root");
        let receipts_path = &root.paths().receipts_path;
        fs::remove_file(receipts_path).expect("remove receipts");
        fs::create_dir(receipts_path).expect("receipts dir");

        let err = root
            .invoke(Some(owner()), Call::SetScalar { value: 9 })
            .unwrap_err();
        assert!(format!("{err:#}").contains("append receipts"));

        let state = root.state().expect("state");
        assert_eq!(state.nonce, 0);
        assert_eq!(state.snapshot.store.scalar(), 0);
    }

    #[test]
    fn replay_enforces_call_limit() {
        let root = TestRoot::new().expect("root");
        let cfg = CellguardConfig {
            max_replay_calls: 1,
            ..CellguardConfig::default()
        };
        write_config(&root.paths().config_path, &cfg).expect("write config");
        let call = ScriptedCall {
            caller: owner(),
            call: Call::SetScalar { value: 1 },
        };
        let script_path = root
            .write_script(&[call.clone(), call])
            .expect("script");

        let err = replay(root.path(), &script_path).unwrap_err();
        assert!(err.to_string().contains("limit is 1"));
        assert_eq!(root.state().expect("state").nonce, 0);
    }
}
