//! Data models for the weather report dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Units: temperature unit system and precipitation display rules
//! - Location: resolved place and coordinates
//! - Series: hourly and daily weather samples
//! - Condition: rainy / cloudy / clear classification
//! - Display: user-selected display parameters
//! - View model: the normalized snapshot consumed by every presenter

pub mod condition;
pub mod display;
pub mod location;
pub mod series;
pub mod units;
pub mod view_model;

// Re-export all public types for convenient access
pub use condition::Condition;
pub use display::{DisplayOptions, DisplayParam};
pub use location::{GeocodedPlace, Location};
pub use series::{DailySample, DailySeries, HourlySample, HourlySeries};
pub use units::UnitSystem;
pub use view_model::{NO_DATA, ViewModel, WeatherView};
