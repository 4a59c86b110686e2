//! Owner-gated record store.
//!
//! Holds three cells: the immutable `owner`, a two-field `record`, and a
//! `scalar` counter. `record.c` and `scalar` are unrelated cells.

use serde::{Deserialize, Serialize};

use crate::core::arith;
use crate::core::error::ContractError;
use crate::core::types::{Address, Record, Word};

/// Pair written into the record by every `update_record_and_derive`.
pub const FIXED_PAIR: Record = Record::new(10, 20);

/// Amount each record helper adds to `record.d`, and the bump applied to
/// the caller's copy.
pub const RECORD_BUMP: Word = 10;

/// `bump_array_and_counter` requires strictly more elements than this.
pub const MIN_LEN_EXCLUSIVE: usize = 3;

/// Element touched by `bump_array_and_counter`.
pub const BUMP_INDEX: usize = 6;

/// Added to the element at `BUMP_INDEX`, twice per call.
pub const ELEMENT_BUMP: Word = 10;

/// Added to `scalar` per `bump_array_and_counter` call.
pub const COUNTER_BUMP: Word = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlledStore {
    owner: Address,
    record: Record,
    scalar: Word,
}

impl AccessControlledStore {
    /// Record `caller` as the owner. The record and scalar start at zero.
    pub fn initialize(caller: Address) -> Self {
        Self {
            owner: caller,
            record: Record::default(),
            scalar: 0,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn record(&self) -> Record {
        self.record
    }

    pub fn scalar(&self) -> Word {
        self.scalar
    }

    pub fn set_scalar(&mut self, caller: Address, value: Word) -> Result<(), ContractError> {
        self.ensure_owner(caller)?;
        self.scalar = value;
        Ok(())
    }

    /// Reset the record from the fixed pair, derive a value from it, and
    /// fold both bumps into the caller's copy of `input`.
    ///
    /// Returns the final `input.d`. The stored record ends at
    /// `{10, 40}` regardless of prior state.
    pub fn update_record_and_derive(
        &mut self,
        caller: Address,
        input: Record,
    ) -> Result<Word, ContractError> {
        self.ensure_owner(caller)?;

        let mut record = self.record;
        load_fixed_pair(&mut record)?;

        let mut local = input;
        local.d = arith::add(local.d, RECORD_BUMP)?;

        let derived = derive_successor(&mut record)?;
        local.d = arith::add(local.d, derived)?;

        self.record = record;
        Ok(local.d)
    }

    /// Add 20 to `values[6]` (as two bumps of 10) and 10 to `scalar`.
    ///
    /// Open to any caller. Sequences of length 4..=6 pass the length guard
    /// but lack index 6 and fail with `IndexOutOfRange`.
    pub fn bump_array_and_counter(
        &mut self,
        mut values: Vec<Word>,
    ) -> Result<Vec<Word>, ContractError> {
        if values.len() <= MIN_LEN_EXCLUSIVE {
            return Err(ContractError::InvalidLength {
                len: values.len(),
                min_exclusive: MIN_LEN_EXCLUSIVE,
            });
        }
        let len = values.len();
        let slot = values
            .get_mut(BUMP_INDEX)
            .ok_or(ContractError::IndexOutOfRange {
                index: BUMP_INDEX,
                len,
            })?;

        let bumped = arith::add(arith::add(*slot, ELEMENT_BUMP)?, ELEMENT_BUMP)?;
        let scalar = arith::add(self.scalar, COUNTER_BUMP)?;

        *slot = bumped;
        self.scalar = scalar;
        Ok(values)
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), ContractError> {
        if caller != self.owner {
            return Err(ContractError::Unauthorized {
                caller,
                owner: self.owner,
            });
        }
        Ok(())
    }
}

/// Overwrite `record` with `FIXED_PAIR`, then bump `record.d`.
fn load_fixed_pair(record: &mut Record) -> Result<(), ContractError> {
    *record = FIXED_PAIR;
    record.d = arith::add(record.d, RECORD_BUMP)?;
    Ok(())
}

/// Return `record.c + 1`, bumping `record.d` on the way.
fn derive_successor(record: &mut Record) -> Result<Word, ContractError> {
    record.d = arith::add(record.d, RECORD_BUMP)?;
    arith::add(record.c, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{owner, stranger};

    /// Non-owner writes are rejected and leave every cell untouched.
    #[test]
    fn non_owner_cannot_mutate() {
        let mut store = AccessControlledStore::initialize(owner());
        store.set_scalar(owner(), 7).expect("owner set");
        let before = store.clone();

        let err = store.set_scalar(stranger(), 99).unwrap_err();
        assert_eq!(
            err,
            ContractError::Unauthorized {
                caller: stranger(),
                owner: owner(),
            }
        );
        let err = store
            .update_record_and_derive(stranger(), Record::new(0, 0))
            .unwrap_err();
        assert_eq!(err.kind(), "unauthorized");

        assert_eq!(store, before);
    }

    #[test]
    fn owner_sets_scalar_without_touching_record() {
        let mut store = AccessControlledStore::initialize(owner());
        store.set_scalar(owner(), 123).expect("set");
        assert_eq!(store.scalar(), 123);
        assert_eq!(store.record(), Record::default());
    }

    /// Reference trace: x.d 0 -> 10 -> 21, record (10,20) -> d 30 -> d 40.
    #[test]
    fn update_record_reference_trace() {
        let mut store = AccessControlledStore::initialize(owner());
        let out = store
            .update_record_and_derive(owner(), Record::new(0, 0))
            .expect("update");
        assert_eq!(out, 21);
        assert_eq!(store.record(), Record::new(10, 40));
        assert_eq!(store.scalar(), 0);
    }

    /// The record is reset on every call; only the caller's `d` feeds the result.
    #[test]
    fn update_record_is_independent_of_prior_calls() {
        let mut store = AccessControlledStore::initialize(owner());
        store
            .update_record_and_derive(owner(), Record::new(5, 100))
            .expect("first");
        let out = store
            .update_record_and_derive(owner(), Record::new(999, 4))
            .expect("second");
        assert_eq!(out, 4 + 10 + 11);
        assert_eq!(store.record(), Record::new(10, 40));
    }

    #[test]
    fn update_record_overflow_leaves_record_unchanged() {
        let mut store = AccessControlledStore::initialize(owner());
        let err = store
            .update_record_and_derive(owner(), Record::new(0, Word::MAX - 5))
            .unwrap_err();
        assert_eq!(err, ContractError::ArithmeticOverflow { op: "add" });
        assert_eq!(store.record(), Record::default());
    }

    #[test]
    fn bump_rejects_short_sequences() {
        let mut store = AccessControlledStore::initialize(owner());
        for len in 0..=3 {
            let err = store.bump_array_and_counter(vec![1; len]).unwrap_err();
            assert_eq!(
                err,
                ContractError::InvalidLength {
                    len,
                    min_exclusive: 3
                }
            );
        }
        assert_eq!(store.scalar(), 0);
    }

    /// Lengths 4..=6 clear the length guard but have no index 6.
    #[test]
    fn bump_reports_missing_index_without_mutation() {
        let mut store = AccessControlledStore::initialize(owner());
        for len in 4..=6 {
            let err = store.bump_array_and_counter(vec![0; len]).unwrap_err();
            assert_eq!(err, ContractError::IndexOutOfRange { index: 6, len });
        }
        assert_eq!(store.scalar(), 0);
    }

    #[test]
    fn bump_adds_twenty_and_ten_per_call() {
        let mut store = AccessControlledStore::initialize(owner());
        let values = vec![0, 1, 2, 3, 4, 5, 6, 7];

        let once = store.bump_array_and_counter(values).expect("bump");
        assert_eq!(once, vec![0, 1, 2, 3, 4, 5, 26, 7]);
        assert_eq!(store.scalar(), 10);

        let twice = store.bump_array_and_counter(once).expect("bump");
        assert_eq!(twice[6], 46);
        assert_eq!(store.scalar(), 20);
    }

    /// Anyone may bump; ownership is not checked.
    #[test]
    fn bump_is_open_to_any_caller() {
        let mut store = AccessControlledStore::initialize(owner());
        store.set_scalar(owner(), 5).expect("set");
        store.bump_array_and_counter(vec![0; 7]).expect("bump");
        assert_eq!(store.scalar(), 15);
        assert_eq!(store.owner(), owner());
    }

    #[test]
    fn bump_overflow_is_atomic() {
        let mut store = AccessControlledStore::initialize(owner());
        store.set_scalar(owner(), Word::MAX).expect("set");
        let err = store.bump_array_and_counter(vec![0; 7]).unwrap_err();
        assert_eq!(err.kind(), "arithmetic_overflow");
        assert_eq!(store.scalar(), Word::MAX);

        let mut store = AccessControlledStore::initialize(owner());
        let mut values = vec![0; 7];
        values[6] = Word::MAX - 15;
        assert!(store.bump_array_and_counter(values).is_err());
        assert_eq!(store.scalar(), 0);
    }
}
