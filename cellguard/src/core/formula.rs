//! Range-checked formula evaluation.

use serde::{Deserialize, Serialize};

use crate::core::arith;
use crate::core::error::ContractError;
use crate::core::types::Word;

/// Every input must be strictly greater than this.
pub const INPUT_MIN_EXCLUSIVE: Word = 100;

/// Every input must be strictly less than this.
pub const INPUT_MAX_EXCLUSIVE: Word = 1_000_000;

/// Holds the result of the last successful `run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaEvaluator {
    derived: Word,
}

impl FormulaEvaluator {
    pub fn derived(&self) -> Word {
        self.derived
    }

    /// Evaluate `(x*x) * (x/y) / (z*y)` and store the result.
    pub fn run(&mut self, x: Word, y: Word, z: Word) -> Result<Word, ContractError> {
        let result = evaluate(x, y, z)?;
        self.derived = result;
        Ok(result)
    }
}

/// Pure form of [`FormulaEvaluator::run`].
pub fn evaluate(x: Word, y: Word, z: Word) -> Result<Word, ContractError> {
    check_inputs(x, y, z)?;

    let a = arith::mul(x, x)?;
    let b = arith::div(x, y)?;
    let c = arith::mul(z, y)?;
    // Unreachable given the range checks above; kept as an assertion.
    if c < 1 {
        return Err(ContractError::DivisionByZero);
    }
    arith::div(arith::mul(a, b)?, c)
}

/// Check preconditions in a fixed order, reporting the first violation.
fn check_inputs(x: Word, y: Word, z: Word) -> Result<(), ContractError> {
    if y < 1 {
        return Err(invalid("y", y, "must be >= 1"));
    }
    for (name, value) in [("x", x), ("y", y), ("z", z)] {
        if value >= INPUT_MAX_EXCLUSIVE {
            return Err(invalid(name, value, "must be < 1000000"));
        }
    }
    for (name, value) in [("x", x), ("y", y), ("z", z)] {
        if value <= INPUT_MIN_EXCLUSIVE {
            return Err(invalid(name, value, "must be > 100"));
        }
    }
    Ok(())
}

fn invalid(name: &'static str, value: Word, rule: &'static str) -> ContractError {
    ContractError::InvalidInput { name, value, rule }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a = 250000, b = 2, c = 60000 -> 500000 / 60000 = 8.
    #[test]
    fn run_reference_values() {
        let mut evaluator = FormulaEvaluator::default();
        assert_eq!(evaluator.run(500, 200, 300), Ok(8));
        assert_eq!(evaluator.derived(), 8);
    }

    #[test]
    fn run_rejects_small_x_and_keeps_previous_result() {
        let mut evaluator = FormulaEvaluator::default();
        evaluator.run(500, 200, 300).expect("run");

        let err = evaluator.run(50, 200, 300).unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidInput {
                name: "x",
                value: 50,
                rule: "must be > 100"
            }
        );
        assert_eq!(evaluator.derived(), 8);
    }

    /// Upper bounds are checked before lower bounds.
    #[test]
    fn first_violation_wins() {
        let err = evaluate(50, 200, 2_000_000).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InvalidInput { name: "z", .. }
        ));

        let err = evaluate(500, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InvalidInput { name: "y", value: 0, .. }
        ));
    }

    #[test]
    fn bounds_are_exclusive() {
        assert!(evaluate(100, 200, 300).is_err());
        assert!(evaluate(1_000_000, 200, 300).is_err());
        assert!(evaluate(101, 101, 101).is_ok());
        assert!(evaluate(999_999, 999_999, 999_999).is_ok());
    }

    /// x/y truncates to zero when y > x, so the result is zero.
    #[test]
    fn truncating_division_can_zero_the_result() {
        assert_eq!(evaluate(200, 500, 300), Ok(0));
    }

    /// The largest admissible inputs stay inside the 64-bit domain.
    #[test]
    fn maximal_inputs_do_not_overflow() {
        let result = evaluate(999_999, 101, 101).expect("evaluate");
        let expected = (999_999u64 * 999_999) * (999_999 / 101) / (101 * 101);
        assert_eq!(result, expected);
    }
}
