//! Typed errors surfaced by the library.
//!
//! Application glue (config loading, the CLI) reports through `anyhow`; the
//! enums here are the failures callers are expected to match on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Logger configuration rejected at first initialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown log level {0:?} (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    UnknownLevel(String),

    #[error("unknown log format field %({0})")]
    UnknownFormatField(String),

    #[error("invalid log format {format:?}: {reason}")]
    InvalidFormat { format: String, reason: String },

    #[error("open log file {}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Arithmetic failure reported by [`crate::core::calculator::Calculator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculatorError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
}

/// Fibonacci index whose value does not fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FibonacciError {
    #[error("Fibonacci({n}) overflows u64 (n must be <= {max})")]
    Overflow { n: u64, max: u64 },
}

/// Temperature conversion failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid temperature unit")]
    InvalidUnit { from: String, to: String },
}
