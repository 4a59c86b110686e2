//! Deterministic classification of signed triples.

use serde::{Deserialize, Serialize};

use crate::core::arith;
use crate::core::error::ContractError;
use crate::core::types::{Outcome, OutcomeFlags, SignedWord};

/// Value of `a` that selects `LowSumMatchedA`.
pub const MATCHED_A: SignedWord = 42;

/// Branch threshold for `b` when the sum is low.
pub const LOW_B_THRESHOLD: SignedWord = 3;

/// Branch threshold for `c` when the sum is high.
pub const LOW_C_THRESHOLD: SignedWord = 42;

/// Records which outcomes have ever fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchClassifier {
    flags: OutcomeFlags,
}

impl BranchClassifier {
    pub fn flags(&self) -> &OutcomeFlags {
        &self.flags
    }

    /// Classify `(a, b, c)` and mark the matching flag.
    pub fn classify(
        &mut self,
        a: SignedWord,
        b: SignedWord,
        c: SignedWord,
    ) -> Result<Outcome, ContractError> {
        let outcome = decide(a, b, c)?;
        self.flags.mark(outcome);
        Ok(outcome)
    }
}

/// Classify into one of five outcomes.
///
/// - `b + c < 1`: `LowSumLowB` if `b < 3`, else `LowSumMatchedA` if
///   `a == 42`, else `LowSumOther`.
/// - `b + c >= 1`: `HighSumLowC` if `c < 42`, else `HighSumHighC`.
///
/// Fails only when `b + c` overflows.
pub fn decide(a: SignedWord, b: SignedWord, c: SignedWord) -> Result<Outcome, ContractError> {
    let sum = arith::signed_add(b, c)?;
    let outcome = if sum < 1 {
        if b < LOW_B_THRESHOLD {
            Outcome::LowSumLowB
        } else if a == MATCHED_A {
            Outcome::LowSumMatchedA
        } else {
            Outcome::LowSumOther
        }
    } else if c < LOW_C_THRESHOLD {
        Outcome::HighSumLowC
    } else {
        Outcome::HighSumHighC
    };
    Ok(outcome)
}
