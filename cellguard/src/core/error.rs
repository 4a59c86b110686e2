//! Contract-level failures.
//!
//! Every variant is raised before any state cell is written, so a caller
//! that receives one can assume the component is unchanged.

use thiserror::Error;

use crate::core::types::{Address, Word};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("caller {caller} is not the owner {owner}")]
    Unauthorized { caller: Address, owner: Address },
    #[error("sequence length {len} must be greater than {min_exclusive}")]
    InvalidLength { len: usize, min_exclusive: usize },
    #[error("input {name}={value} {rule}")]
    InvalidInput {
        name: &'static str,
        value: Word,
        rule: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow in {op}")]
    ArithmeticOverflow { op: &'static str },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ContractError {
    /// Stable snake_case tag used in receipts.
    pub fn kind(&self) -> &'static str {
        match self {
            ContractError::Unauthorized { .. } => "unauthorized",
            ContractError::InvalidLength { .. } => "invalid_length",
            ContractError::InvalidInput { .. } => "invalid_input",
            ContractError::DivisionByZero => "division_by_zero",
            ContractError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            ContractError::IndexOutOfRange { .. } => "index_out_of_range",
        }
    }
}
