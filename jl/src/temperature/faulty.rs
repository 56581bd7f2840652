//! A converter that is wrong on purpose, for exercising failure reporting.

use tracing::{debug, info, warn};

use super::TemperatureUnit;
use super::advanced::{TemperatureConverter, parse_units};
use crate::config::{AppConfig, Environment};
use crate::error::ConversionError;

/// Skews [`TemperatureConverter`] results:
///
/// - C→F: minus `calibration_error`
/// - F→C: times 1.1
/// - anything involving K: plus 2.5
/// - otherwise: rounded to the nearest integer (ties to even)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultyTemperatureConverter {
    base: TemperatureConverter,
    calibration_error: f64,
}

impl FaultyTemperatureConverter {
    pub fn new(env: Environment, calibration_error: f64) -> Self {
        Self {
            base: TemperatureConverter::new(env),
            calibration_error,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        info!("Calibration error loaded: {}", config.calibration_error);
        Self::new(config.env, config.calibration_error)
    }

    pub fn calibration_error(&self) -> f64 {
        self.calibration_error
    }

    pub fn convert(&self, temp: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        use TemperatureUnit::{Celsius, Fahrenheit, Kelvin};

        let (from, to) = parse_units(from, to)?;
        let result = self.base.convert_units(temp, from, to);

        let skewed = match (from, to) {
            (Celsius, Fahrenheit) => {
                debug!(
                    "Applying calibration error: -{}° to C→F",
                    self.calibration_error
                );
                result - self.calibration_error
            }
            (Fahrenheit, Celsius) => {
                debug!("Applying intentional multiplier 1.1 to F→C");
                result * 1.1
            }
            _ if from == Kelvin || to == Kelvin => {
                debug!("Applying fixed offset +2.5 to Kelvin-related conversion");
                result + 2.5
            }
            _ => {
                warn!("No intentional error rule matched for: {from} → {to}");
                result.round_ties_even()
            }
        };
        Ok(skewed)
    }
}
