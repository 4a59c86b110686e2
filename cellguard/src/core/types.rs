//! Shared deterministic types for the contract core.
//!
//! These types define stable contracts between the components and the host.
//! They must not depend on external state or I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Fixed-width unsigned domain for every unsigned state cell and argument.
pub type Word = u64;

/// Fixed-width signed domain used by the classifier.
pub type SignedWord = i64;

/// Number of bytes in a caller identity.
pub const ADDRESS_LEN: usize = 20;

/// Caller identity presented with every call.
///
/// Rendered as `0x` followed by 40 lowercase hex digits. Parsing accepts
/// either case, with or without the `0x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressParseError {
    #[error("address must be {expected} hex digits (got {actual})")]
    Length { expected: usize, actual: usize },
    #[error("address is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressParseError::Length {
                expected: ADDRESS_LEN * 2,
                actual: digits.len(),
            });
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Two-field record owned by the access-controlled store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub c: Word,
    pub d: Word,
}

impl Record {
    pub const fn new(c: Word, d: Word) -> Self {
        Self { c, d }
    }
}

/// One of the five mutually exclusive classification branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `b + c < 1` and `b < 3`.
    LowSumLowB,
    /// `b + c < 1`, `b >= 3`, `a == 42`.
    LowSumMatchedA,
    /// `b + c < 1`, `b >= 3`, `a != 42`.
    LowSumOther,
    /// `b + c >= 1` and `c < 42`.
    HighSumLowC,
    /// `b + c >= 1` and `c >= 42`.
    HighSumHighC,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::LowSumLowB,
        Outcome::LowSumMatchedA,
        Outcome::LowSumOther,
        Outcome::HighSumLowC,
        Outcome::HighSumHighC,
    ];

    /// Stable numeric code (1-5) returned to callers.
    pub fn code(self) -> u8 {
        match self {
            Outcome::LowSumLowB => 1,
            Outcome::LowSumMatchedA => 2,
            Outcome::LowSumOther => 3,
            Outcome::HighSumLowC => 4,
            Outcome::HighSumHighC => 5,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Set-only history of which outcomes have fired.
///
/// There is no way to clear a flag once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeFlags {
    low_sum_low_b: bool,
    low_sum_matched_a: bool,
    low_sum_other: bool,
    high_sum_low_c: bool,
    high_sum_high_c: bool,
}

impl OutcomeFlags {
    pub fn mark(&mut self, outcome: Outcome) {
        *self.cell_mut(outcome) = true;
    }

    pub fn has_fired(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::LowSumLowB => self.low_sum_low_b,
            Outcome::LowSumMatchedA => self.low_sum_matched_a,
            Outcome::LowSumOther => self.low_sum_other,
            Outcome::HighSumLowC => self.high_sum_low_c,
            Outcome::HighSumHighC => self.high_sum_high_c,
        }
    }

    /// Outcomes that have fired, in code order.
    pub fn fired(&self) -> Vec<Outcome> {
        Outcome::ALL
            .into_iter()
            .filter(|outcome| self.has_fired(*outcome))
            .collect()
    }

    fn cell_mut(&mut self, outcome: Outcome) -> &mut bool {
        match outcome {
            Outcome::LowSumLowB => &mut self.low_sum_low_b,
            Outcome::LowSumMatchedA => &mut self.low_sum_matched_a,
            Outcome::LowSumOther => &mut self.low_sum_other,
            Outcome::HighSumLowC => &mut self.high_sum_low_c,
            Outcome::HighSumHighC => &mut self.high_sum_high_c,
        }
    }
}
