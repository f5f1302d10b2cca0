//! The normalized snapshot every presenter reads from

use serde::Serialize;

use super::{Condition, DailySeries, HourlySample, HourlySeries, Location};

/// Placeholder message before the first fetch completes
pub const NO_DATA: &str = "No data";

/// Result of one fetch cycle. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewModel {
    Ready(WeatherView),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub location: Location,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
    /// `°F` or `°C`
    pub unit_symbol: &'static str,
}

impl WeatherView {
    /// The hourly sample closest to now
    #[must_use]
    pub fn current(&self) -> &HourlySample {
        self.hourly.now()
    }

    /// Classification of the current sample, on raw millimetres
    #[must_use]
    pub fn condition(&self) -> Condition {
        let now = self.current();
        Condition::classify(now.precipitation, now.relative_humidity)
    }

    #[must_use]
    pub fn format_precipitation(&self, millimetres: f64) -> String {
        self.location.unit_system.format_precipitation(millimetres)
    }
}

impl ViewModel {
    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn as_ready(&self) -> Option<&WeatherView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::failed(NO_DATA)
    }
}
