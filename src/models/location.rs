//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

use super::UnitSystem;

/// Raw geocoder answer: canonical address plus coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolved place for one fetch cycle
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Canonical address returned by the geocoder
    pub display_name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub unit_system: UnitSystem,
}

impl Location {
    #[must_use]
    pub fn new(place: GeocodedPlace, unit_system: UnitSystem) -> Self {
        Self {
            display_name: place.display_name,
            latitude: place.latitude,
            longitude: place.longitude,
            unit_system,
        }
    }

    /// Latitude fixed to 3 decimal places
    #[must_use]
    pub fn latitude_display(&self) -> String {
        format!("{:.3}", self.latitude)
    }

    /// Longitude fixed to 3 decimal places
    #[must_use]
    pub fn longitude_display(&self) -> String {
        format!("{:.3}", self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("({}, {})", self.latitude_display(), self.longitude_display())
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(latitude: f64, longitude: f64, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (latitude * multiplier).round() / multiplier;
        let lon = (longitude * multiplier).round() / multiplier;
        (lat, lon)
    }
}
