//! Append-only call receipts in `.cellguard/receipts.jsonl`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::call::{Call, CallReturn};
use crate::core::error::ContractError;
use crate::core::types::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Ok,
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptError {
    pub kind: String,
    pub message: String,
}

impl From<&ContractError> for ReceiptError {
    fn from(err: &ContractError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Logged result of one dispatched call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub nonce: u64,
    pub caller: Address,
    pub call: Call,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CallReturn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReceiptError>,
}

impl Receipt {
    pub fn new(
        nonce: u64,
        caller: Address,
        call: Call,
        result: &Result<CallReturn, ContractError>,
    ) -> Self {
        let (status, output, error) = match result {
            Ok(output) => (ReceiptStatus::Ok, Some(output.clone()), None),
            Err(err) => (ReceiptStatus::Reverted, None, Some(ReceiptError::from(err))),
        };
        Self {
            nonce,
            caller,
            call,
            status,
            output,
            error,
        }
    }
}

/// Append receipts as one JSON object per line.
pub fn append_receipts(path: &Path, receipts: &[Receipt]) -> Result<()> {
    let mut buf = String::new();
    for receipt in receipts {
        buf.push_str(&serde_json::to_string(receipt).context("serialize receipt")?);
        buf.push('\n');
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open receipts {}", path.display()))?;
    file.write_all(buf.as_bytes())
        .with_context(|| format!("append receipts {}", path.display()))
}

/// Read every receipt in file order. A missing file has no receipts.
pub fn read_receipts(path: &Path) -> Result<Vec<Receipt>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read receipts {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str::<Receipt>(line)
                .with_context(|| format!("parse receipt {} in {}", idx + 1, path.display()))
        })
        .collect()
}
