//! In-memory host for the three components.
//!
//! Each component sits behind its own mutex so that concurrent callers are
//! serialized per component instance. Components never panic mid-commit, so
//! a poisoned lock still guards consistent state and is recovered.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::call::{Call, CallReturn};
use crate::core::classifier::BranchClassifier;
use crate::core::error::ContractError;
use crate::core::formula::FormulaEvaluator;
use crate::core::store::AccessControlledStore;
use crate::core::types::Address;

/// Point-in-time copy of every state cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub store: AccessControlledStore,
    pub formula: FormulaEvaluator,
    pub classifier: BranchClassifier,
}

impl StateSnapshot {
    /// Fresh state with `owner` recorded by the store.
    pub fn genesis(owner: Address) -> Self {
        Self {
            store: AccessControlledStore::initialize(owner),
            formula: FormulaEvaluator::default(),
            classifier: BranchClassifier::default(),
        }
    }
}

#[derive(Debug)]
pub struct Host {
    store: Mutex<AccessControlledStore>,
    formula: Mutex<FormulaEvaluator>,
    classifier: Mutex<BranchClassifier>,
}

impl Host {
    pub fn new(owner: Address) -> Self {
        Self::from_snapshot(StateSnapshot::genesis(owner))
    }

    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            store: Mutex::new(snapshot.store),
            formula: Mutex::new(snapshot.formula),
            classifier: Mutex::new(snapshot.classifier),
        }
    }

    /// Copy out every state cell. Locks are taken one component at a time.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            store: lock(&self.store).clone(),
            formula: lock(&self.formula).clone(),
            classifier: lock(&self.classifier).clone(),
        }
    }

    /// Dispatch `call` on behalf of `caller`.
    ///
    /// Only the targeted component is locked, for the whole call.
    pub fn execute(&self, caller: Address, call: &Call) -> Result<CallReturn, ContractError> {
        let result = match call {
            Call::SetScalar { value } => lock(&self.store)
                .set_scalar(caller, *value)
                .map(|()| CallReturn::Unit),
            Call::UpdateRecord { input } => lock(&self.store)
                .update_record_and_derive(caller, *input)
                .map(CallReturn::Word),
            Call::BumpArray { values } => lock(&self.store)
                .bump_array_and_counter(values.clone())
                .map(CallReturn::Words),
            Call::Evaluate { x, y, z } => lock(&self.formula)
                .run(*x, *y, *z)
                .map(CallReturn::Word),
            Call::Classify { a, b, c } => lock(&self.classifier)
                .classify(*a, *b, *c)
                .map(CallReturn::Outcome),
        };
        if let Err(err) = &result {
            debug!(%caller, method = call.method(), kind = err.kind(), "call reverted");
        }
        result
    }
}

fn lock<T>(cell: &Mutex<T>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
