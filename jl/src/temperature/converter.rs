//! Plain Celsius/Fahrenheit conversions.

use tracing::debug;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    if c == 0.0 {
        debug!("Celsius input is freezing point.");
    } else if c == 100.0 {
        debug!("Celsius input is boiling point.");
    }
    let result = c * 9.0 / 5.0 + 32.0;
    debug!("Converted {c}°C to {result}°F");
    result
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    if f == 32.0 {
        debug!("Fahrenheit input is freezing point.");
    } else if f == 212.0 {
        debug!("Fahrenheit input is boiling point.");
    }
    let result = (f - 32.0) * 5.0 / 9.0;
    debug!("Converted {f}°F to {result}°C");
    result
}
