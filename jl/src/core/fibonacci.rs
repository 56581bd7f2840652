//! Fibonacci numbers three ways.
//!
//! All variants agree: `F(0) = 0`, `F(1) = 1`, `F(n) = F(n-1) + F(n-2)`.
//! `u64` holds every value up to `F(93)`; larger `n` is an error.

use std::collections::HashMap;

use crate::error::FibonacciError;

/// Largest `n` whose Fibonacci number fits in a `u64`.
pub const MAX_N: u64 = 93;

#[derive(Debug, Default, Clone)]
pub struct Fibonacci {
    cache: HashMap<u64, u64>,
}

impl Fibonacci {
    pub fn new() -> Self {
        Self::default()
    }

    /// Naive double recursion; exponential, only sensible for small `n`.
    pub fn recursive(&self, n: u64) -> Result<u64, FibonacciError> {
        check_range(n)?;
        Ok(recurse(n))
    }

    pub fn iterative(&self, n: u64) -> Result<u64, FibonacciError> {
        if n <= 1 {
            return Ok(n);
        }
        let (mut prev, mut curr) = (0_u64, 1_u64);
        for _ in 2..=n {
            let next = prev
                .checked_add(curr)
                .ok_or(FibonacciError::Overflow { n, max: MAX_N })?;
            prev = curr;
            curr = next;
        }
        Ok(curr)
    }

    /// Recursion with results cached across calls on the same instance.
    pub fn memoization(&mut self, n: u64) -> Result<u64, FibonacciError> {
        check_range(n)?;
        Ok(self.memoize(n))
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn memoize(&mut self, n: u64) -> u64 {
        if n <= 1 {
            return n;
        }
        if let Some(&cached) = self.cache.get(&n) {
            return cached;
        }
        let value = self.memoize(n - 1) + self.memoize(n - 2);
        self.cache.insert(n, value);
        value
    }
}

fn check_range(n: u64) -> Result<(), FibonacciError> {
    if n > MAX_N {
        return Err(FibonacciError::Overflow { n, max: MAX_N });
    }
    Ok(())
}

// Callers guarantee `n <= MAX_N`.
fn recurse(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    recurse(n - 1) + recurse(n - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: [u64; 11] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];

    #[test]
    fn variants_agree_on_small_inputs() {
        let mut fib = Fibonacci::new();
        for (n, expected) in FIRST.iter().enumerate() {
            let n = n as u64;
            assert_eq!(fib.recursive(n), Ok(*expected), "recursive({n})");
            assert_eq!(fib.iterative(n), Ok(*expected), "iterative({n})");
            assert_eq!(fib.memoization(n), Ok(*expected), "memoization({n})");
        }
    }

    #[test]
    fn memoization_reuses_cache() {
        let mut fib = Fibonacci::new();
        assert_eq!(fib.memoization(50), Ok(12_586_269_025));
        assert_eq!(fib.cached_len(), 49);
        assert_eq!(fib.memoization(40), Ok(102_334_155));
        assert_eq!(fib.cached_len(), 49);
    }

    #[test]
    fn largest_u64_value_is_reachable() {
        let mut fib = Fibonacci::new();
        assert_eq!(fib.iterative(MAX_N), Ok(12_200_160_415_121_876_738));
        assert_eq!(fib.memoization(MAX_N), Ok(12_200_160_415_121_876_738));
    }

    #[test]
    fn past_max_n_is_an_overflow_error() {
        let mut fib = Fibonacci::new();
        let overflow = Err(FibonacciError::Overflow {
            n: MAX_N + 1,
            max: MAX_N,
        });
        assert_eq!(fib.iterative(MAX_N + 1), overflow);
        assert_eq!(fib.memoization(MAX_N + 1), overflow);
        assert_eq!(fib.recursive(MAX_N + 1), overflow);
        assert_eq!(fib.cached_len(), 0);

        let err = fib.iterative(u64::MAX).expect_err("overflow");
        assert_eq!(
            err.to_string(),
            format!("Fibonacci({}) overflows u64 (n must be <= 93)", u64::MAX)
        );
    }
}
