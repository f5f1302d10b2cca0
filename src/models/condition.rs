//! Current-conditions classification driving the card background and icon

use serde::{Deserialize, Serialize};

/// Rain threshold in raw millimetres, compared before any inch conversion
pub const RAIN_THRESHOLD_MM: f64 = 0.2;
/// Relative humidity (percent) at which the sky counts as cloudy
pub const CLOUDY_HUMIDITY: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Rainy,
    Cloudy,
    Clear,
}

impl Condition {
    /// Rain wins over humidity; anything else is clear.
    #[must_use]
    pub fn classify(precipitation_mm: f64, relative_humidity: f64) -> Self {
        if precipitation_mm > RAIN_THRESHOLD_MM {
            Self::Rainy
        } else if relative_humidity >= CLOUDY_HUMIDITY {
            Self::Cloudy
        } else {
            Self::Clear
        }
    }

    /// CSS class applied to the current-conditions card
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Rainy => "rainy",
            Self::Cloudy => "cloudy",
            Self::Clear => "clear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 10.0, Condition::Clear)]
    #[case(0.2, 69.9, Condition::Clear)]
    #[case(0.2, 70.0, Condition::Cloudy)]
    #[case(0.0, 100.0, Condition::Cloudy)]
    #[case(0.21, 10.0, Condition::Rainy)]
    #[case(5.0, 95.0, Condition::Rainy)]
    fn test_classify(#[case] precipitation: f64, #[case] humidity: f64, #[case] expected: Condition) {
        assert_eq!(Condition::classify(precipitation, humidity), expected);
    }

    #[test]
    fn test_missing_readings_fall_back_to_clear() {
        assert_eq!(Condition::classify(f64::NAN, f64::NAN), Condition::Clear);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(Condition::Rainy.css_class(), "rainy");
        assert_eq!(Condition::Cloudy.css_class(), "cloudy");
        assert_eq!(Condition::Clear.css_class(), "clear");
    }
}
