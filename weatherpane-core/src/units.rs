//! Temperature and wind conversions used by both panels.

use serde::{Deserialize, Serialize};

/// Which scale a panel displays temperatures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// A checked unit switch means Fahrenheit.
    pub fn from_switch(checked: bool) -> Self {
        if checked { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Celsius values are shown as the API sent them; converted values
    /// always carry one decimal. Negative zero prints as `0`.
    pub fn display(self, celsius: f64) -> String {
        match self {
            TemperatureUnit::Celsius => (celsius + 0.0).to_string(),
            TemperatureUnit::Fahrenheit => format!("{:.1}", celsius_to_fahrenheit(celsius)),
        }
    }
}

pub fn round1(value: f64) -> f64 {
    // `+ 0.0` turns a rounded -0.0 into 0.0.
    (value * 10.0).round() / 10.0 + 0.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round1(celsius * 9.0 / 5.0 + 32.0)
}

pub fn kph_to_mps(kph: f64) -> f64 {
    round1(kph / 3.6)
}

/// Wind speed as displayed: m/s with one decimal.
pub fn display_wind(kph: f64) -> String {
    format!("{:.1}", kph_to_mps(kph))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_conversion_reference_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(21.5), 70.7);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn wind_conversion_rounds_to_one_decimal() {
        assert_eq!(kph_to_mps(36.0), 10.0);
        assert_eq!(kph_to_mps(10.0), 2.8);
        assert_eq!(display_wind(36.0), "10.0");
    }

    #[test]
    fn display_keeps_celsius_verbatim() {
        assert_eq!(TemperatureUnit::Celsius.display(21.0), "21");
        assert_eq!(TemperatureUnit::Celsius.display(21.5), "21.5");
        assert_eq!(TemperatureUnit::Fahrenheit.display(0.0), "32.0");
        assert_eq!(TemperatureUnit::Fahrenheit.display(21.5), "70.7");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(TemperatureUnit::Celsius.display(-0.0), "0");
        assert_eq!(TemperatureUnit::Fahrenheit.display(-17.8), "0.0");
        assert_eq!(display_wind(-0.1), "0.0");
    }

    #[test]
    fn switch_and_toggle() {
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_switch(true), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_switch(false), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::Celsius.toggle(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.label(), "°F");
    }
}
