//! Guarded, deterministic state cells.
//!
//! Three independent components with strict precondition checks over
//! fixed-width integers:
//!
//! - an owner-gated record store,
//! - a range-checked formula evaluator,
//! - a five-way branch classifier with set-only outcome flags.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic component logic. No I/O; a failed call
//!   leaves state untouched.
//! - **[`host`]**: In-memory dispatch with per-component serialization.
//! - **[`io`]**: Side-effecting persistence (state snapshot, receipts, config).
//!
//! [`invoke`] ties the host to the persisted state for CLI commands.

pub mod core;
pub mod exit_codes;
pub mod host;
pub mod invoke;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
