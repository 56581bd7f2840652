//! Shared application logger, call tracer, and the small utilities they are
//! demonstrated on.
//!
//! - **[`logging`]**: the process-wide logger. One handle per process, built
//!   from the first configuration snapshot and shared by every caller.
//! - **[`trace`]**: wraps any callable so each invocation logs entry,
//!   arguments, timing, result or failure, and exit through that logger.
//! - **[`core`]** and **[`temperature`]**: pure calculator, Fibonacci, prime
//!   and temperature conversion logic. Conversions emit plain `tracing` events,
//!   which reach the same logger once it is initialized.
//!
//! The `jl` binary wires these together: it loads [`config`], initializes
//! the logger, and runs each command through the tracer.

pub mod config;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod temperature;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod trace;
