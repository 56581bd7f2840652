//! Stable exit codes for the `jl` CLI.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid configuration, logger setup or arguments.
pub const INVALID: i32 = 1;
/// The traced command returned an error (e.g. division by zero).
pub const FAILED: i32 = 2;
