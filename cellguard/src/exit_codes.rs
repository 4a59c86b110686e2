//! Stable exit codes for cellguard CLI commands.

/// Command succeeded and every call committed.
pub const OK: i32 = 0;
/// Command failed due to invalid layout/config/state/arguments or other errors.
pub const INVALID: i32 = 1;
/// At least one call reverted with a contract error.
pub const REVERTED: i32 = 2;
