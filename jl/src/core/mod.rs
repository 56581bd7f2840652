//! Pure arithmetic demos the tracer is exercised on.
//!
//! Core modules are free of I/O side effects and deterministic, so they are
//! tested directly without a logger.

pub mod calculator;
pub mod fibonacci;
pub mod primes;
