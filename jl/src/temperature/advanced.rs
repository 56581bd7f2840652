//! Validated conversion between any two of C, F and K.

use tracing::{debug, error, warn};

use super::{KELVIN_OFFSET, TemperatureUnit};
use crate::config::Environment;
use crate::error::ConversionError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemperatureConverter {
    env: Environment,
}

impl TemperatureConverter {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub fn env(&self) -> Environment {
        self.env
    }

    /// Convert `temp` from the unit written `from` to the unit written `to`.
    ///
    /// Units are `C`, `F` or `K`; anything else is
    /// [`ConversionError::InvalidUnit`].
    pub fn convert(&self, temp: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        let (from, to) = parse_units(from, to)?;
        Ok(self.convert_units(temp, from, to))
    }

    pub fn convert_units(&self, temp: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
        use TemperatureUnit::{Celsius, Fahrenheit, Kelvin};

        if self.env == Environment::Prod && (from == Kelvin || to == Kelvin) {
            warn!("Kelvin conversions are experimental");
        }

        match (from, to) {
            (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => {
                debug!("Source and target units are the same, returning input.");
                temp
            }
            (Celsius, Fahrenheit) => temp * 9.0 / 5.0 + 32.0,
            (Celsius, Kelvin) => temp + KELVIN_OFFSET,
            (Fahrenheit, Celsius) => (temp - 32.0) * 5.0 / 9.0,
            (Fahrenheit, Kelvin) => (temp - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
            (Kelvin, Celsius) => temp - KELVIN_OFFSET,
            (Kelvin, Fahrenheit) => (temp - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
        }
    }
}

/// Parse both unit symbols, logging and rejecting the pair if either is unknown.
pub(crate) fn parse_units(
    from: &str,
    to: &str,
) -> Result<(TemperatureUnit, TemperatureUnit), ConversionError> {
    match (from.parse::<TemperatureUnit>(), to.parse::<TemperatureUnit>()) {
        (Ok(from), Ok(to)) => Ok((from, to)),
        _ => {
            error!("Invalid units: from='{from}', to='{to}'");
            Err(ConversionError::InvalidUnit {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn converts_every_pair() {
        let conv = TemperatureConverter::default();
        let cases = [
            (100.0, "C", "F", 212.0),
            (0.0, "C", "K", 273.15),
            (212.0, "F", "C", 100.0),
            (32.0, "F", "K", 273.15),
            (273.15, "K", "C", 0.0),
            (373.15, "K", "F", 212.0),
        ];
        for (temp, from, to, expected) in cases {
            let actual = conv.convert(temp, from, to).expect("convert");
            assert!(close(actual, expected), "{temp}{from}->{to}: {actual}");
        }
    }

    #[test]
    fn same_unit_returns_input() {
        let conv = TemperatureConverter::default();
        assert_eq!(conv.convert(42.5, "K", "K"), Ok(42.5));
    }

    #[test]
    fn rejects_unknown_units() {
        let conv = TemperatureConverter::new(Environment::Prod);
        assert_eq!(conv.env(), Environment::Prod);
        let err = conv.convert(10.0, "C", "R").expect_err("bad unit");
        assert_eq!(
            err,
            ConversionError::InvalidUnit {
                from: "C".to_string(),
                to: "R".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Invalid temperature unit");
        assert!(conv.convert(10.0, "c", "F").is_err());
    }

    #[test]
    fn prod_still_converts_kelvin() {
        let conv = TemperatureConverter::new(Environment::Prod);
        assert!(close(conv.convert(0.0, "C", "K").expect("convert"), 273.15));
    }
}
