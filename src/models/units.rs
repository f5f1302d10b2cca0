//! Temperature unit system and the precipitation display rule tied to it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WeatherReportError;

pub const MM_PER_INCH: f64 = 25.4;

/// Display unit system selected by the user.
///
/// Temperature conversion is done by the forecast provider; precipitation is
/// always delivered in millimetres and converted locally for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    #[default]
    Fahrenheit,
    Celsius,
}

impl UnitSystem {
    /// Value of the provider's `temperature_unit` parameter
    #[must_use]
    pub fn provider_unit(self) -> &'static str {
        match self {
            Self::Fahrenheit => "fahrenheit",
            Self::Celsius => "celsius",
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    #[must_use]
    pub fn precipitation_unit(self) -> &'static str {
        match self {
            Self::Fahrenheit => "in",
            Self::Celsius => "mm",
        }
    }

    /// Converts a raw millimetre amount into this system's display unit.
    /// Input is always the provider's millimetre value, never a previously
    /// converted one.
    #[must_use]
    pub fn display_precipitation(self, millimetres: f64) -> f64 {
        match self {
            Self::Fahrenheit => millimetres / MM_PER_INCH,
            Self::Celsius => millimetres,
        }
    }

    /// `"0.12 in"` / `"3.00 mm"`
    #[must_use]
    pub fn format_precipitation(self, millimetres: f64) -> String {
        format!(
            "{:.2} {}",
            self.display_precipitation(millimetres),
            self.precipitation_unit()
        )
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fahrenheit => "Fahrenheit",
            Self::Celsius => "Celsius",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherReportError;

    /// Accepts anything starting with `f` or `c`, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.starts_with('f') {
            Ok(Self::Fahrenheit)
        } else if normalized.starts_with('c') {
            Ok(Self::Celsius)
        } else {
            Err(WeatherReportError::validation(format!(
                "Unknown temperature unit '{s}'. Use Fahrenheit or Celsius."
            )))
        }
    }
}
