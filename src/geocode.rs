//! Forward geocoding of "city, country" text via Nominatim (OpenStreetMap)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::GeocodedPlace;
use crate::{Result, WeatherReportError};

/// Resolves free text to coordinates and a canonical address
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, city: &str, country: &str) -> Result<GeocodedPlace>;
}

/// One entry of the `/search` answer. Coordinates come back as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Rejects blank inputs before any request is made
pub fn validate_query(city: &str, country: &str) -> Result<String> {
    let city = city.trim();
    let country = country.trim();
    if city.is_empty() || country.is_empty() {
        return Err(WeatherReportError::validation(
            "Please enter both a city and a country.",
        ));
    }
    Ok(format!("{city}, {country}"))
}

/// Nominatim client. No retries; every failure ends the fetch cycle.
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                WeatherReportError::config(format!("Failed to create geocoding client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn parse_coordinate(value: &str, name: &str) -> Result<f64> {
        value.trim().parse::<f64>().map_err(|_| {
            WeatherReportError::malformed(format!("geocoder returned invalid {name}: {value:?}"))
        })
    }
}

#[async_trait]
impl Geocoder for GeocodeClient {
    #[instrument(skip(self))]
    async fn resolve(&self, city: &str, country: &str) -> Result<GeocodedPlace> {
        let query = validate_query(city, country)?;
        let start_time = Instant::now();

        let response = match self.client.get(self.search_url(&query)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Geocoding request for '{}' failed: {}", query, e);
                return Err(WeatherReportError::location_not_found(query));
            }
        };

        if !response.status().is_success() {
            warn!("Geocoder returned status {} for '{}'", response.status(), query);
            return Err(WeatherReportError::location_not_found(query));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            WeatherReportError::malformed(format!("invalid geocoding response: {e}"))
        })?;

        let Some(place) = places.into_iter().next() else {
            info!("No geocoding match for '{}'", query);
            return Err(WeatherReportError::location_not_found(query));
        };

        let resolved = GeocodedPlace {
            latitude: Self::parse_coordinate(&place.lat, "latitude")?,
            longitude: Self::parse_coordinate(&place.lon, "longitude")?,
            display_name: place.display_name,
        };

        debug!(
            "Geocoded '{}' to {} ({:.4}, {:.4}) in {:.3}s",
            query,
            resolved.display_name,
            resolved.latitude,
            resolved.longitude,
            start_time.elapsed().as_secs_f64()
        );

        Ok(resolved)
    }
}
