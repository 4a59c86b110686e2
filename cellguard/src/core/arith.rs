//! Checked fixed-width arithmetic.
//!
//! Overflow is surfaced as `ArithmeticOverflow` instead of wrapping.

use crate::core::error::ContractError;
use crate::core::types::{SignedWord, Word};

pub fn add(lhs: Word, rhs: Word) -> Result<Word, ContractError> {
    lhs.checked_add(rhs)
        .ok_or(ContractError::ArithmeticOverflow { op: "add" })
}

pub fn mul(lhs: Word, rhs: Word) -> Result<Word, ContractError> {
    lhs.checked_mul(rhs)
        .ok_or(ContractError::ArithmeticOverflow { op: "mul" })
}

/// Truncating division.
pub fn div(lhs: Word, rhs: Word) -> Result<Word, ContractError> {
    lhs.checked_div(rhs).ok_or(ContractError::DivisionByZero)
}

pub fn signed_add(lhs: SignedWord, rhs: SignedWord) -> Result<SignedWord, ContractError> {
    lhs.checked_add(rhs)
        .ok_or(ContractError::ArithmeticOverflow { op: "signed add" })
}
