//! `WeatherReport` - weather dashboard over Nominatim and Open-Meteo
//!
//! This library geocodes a city and country, fetches a week of hourly and
//! daily weather around today, builds a normalized view model and renders it
//! as a current-conditions card, forecast cards, an hourly chart, a location
//! map and a summary table.

pub mod api;
pub mod builder;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geocode;
pub mod models;
pub mod pages;
pub mod present;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use builder::ViewModelBuilder;
pub use cache::PersistentCache;
pub use config::WeatherReportConfig;
pub use dashboard::{Dashboard, Inputs, SessionStores, ViewModelStore};
pub use error::WeatherReportError;
pub use geocode::{GeocodeClient, Geocoder};
pub use models::{DisplayOptions, Location, UnitSystem, ViewModel};
pub use weather::{RawWeatherResponse, WeatherClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherReportError>;
