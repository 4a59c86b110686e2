//! Deterministic, pure contract logic.
//!
//! Core modules must be free of I/O side effects. Each component validates
//! every precondition and finishes all checked arithmetic before it writes
//! a cell, so a returned error means nothing changed.

pub mod arith;
pub mod call;
pub mod classifier;
pub mod error;
pub mod formula;
pub mod store;
pub mod types;
