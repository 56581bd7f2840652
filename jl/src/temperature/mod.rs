//! Temperature conversion between Celsius, Fahrenheit and Kelvin.

pub mod advanced;
pub mod converter;
pub mod faulty;

use std::fmt;
use std::str::FromStr;

pub use advanced::TemperatureConverter;
pub use converter::{celsius_to_fahrenheit, fahrenheit_to_celsius};
pub use faulty::FaultyTemperatureConverter;

/// Offset between Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Temperature scale, written `C`, `F` or `K` (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(TemperatureUnit::Celsius),
            "F" => Ok(TemperatureUnit::Fahrenheit),
            "K" => Ok(TemperatureUnit::Kelvin),
            other => Err(format!("unknown temperature unit {other:?} (expected C, F or K)")),
        }
    }
}
