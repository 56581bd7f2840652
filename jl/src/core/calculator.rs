//! Four-function calculator.

use crate::error::CalculatorError;

/// A named calculator. The name only labels the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    pub name: String,
}

impl Calculator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    pub fn subtract(&self, a: f64, b: f64) -> f64 {
        a - b
    }

    pub fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    /// `a / b`; a zero divisor is an error rather than an infinity.
    pub fn divide(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        if b == 0.0 {
            return Err(CalculatorError::DivisionByZero);
        }
        Ok(a / b)
    }
}
