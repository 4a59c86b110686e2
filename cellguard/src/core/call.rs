//! Typed call surface shared by the host, the replay script, and receipts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Outcome, Record, SignedWord, Word};

/// A single invocation against one of the three components.
///
/// Serialized internally tagged by `method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Call {
    SetScalar { value: Word },
    UpdateRecord { input: Record },
    BumpArray { values: Vec<Word> },
    Evaluate { x: Word, y: Word, z: Word },
    Classify { a: SignedWord, b: SignedWord, c: SignedWord },
}

impl Call {
    /// Method name as it appears on the wire.
    pub fn method(&self) -> &'static str {
        match self {
            Call::SetScalar { .. } => "set_scalar",
            Call::UpdateRecord { .. } => "update_record",
            Call::BumpArray { .. } => "bump_array",
            Call::Evaluate { .. } => "evaluate",
            Call::Classify { .. } => "classify",
        }
    }
}

/// Value returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallReturn {
    Unit,
    Word(Word),
    Words(Vec<Word>),
    Outcome(Outcome),
}

impl fmt::Display for CallReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallReturn::Unit => write!(f, "ok"),
            CallReturn::Word(value) => write!(f, "{value}"),
            CallReturn::Words(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{}", rendered.join(","))
            }
            CallReturn::Outcome(outcome) => write!(f, "{outcome}"),
        }
    }
}
