use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use weather_report::web::{self, AppState};
use weather_report::{
    Dashboard, GeocodeClient, PersistentCache, WeatherClient, WeatherReportConfig, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherReportConfig::load().context("Failed to load configuration")?;
    let _telemetry = telemetry::init(&config.logging)?;

    info!("Starting weather-report {}", weather_report::VERSION);

    // Runs uncached when the cache directory is unusable
    let cache = match PersistentCache::open(
        &config.cache.location,
        Duration::from_secs(config.cache.ttl_seconds),
    ) {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            warn!("Response cache disabled: {}", e);
            None
        }
    };

    let geocoder = GeocodeClient::new(&config.geocoding)?;
    let weather = WeatherClient::new(&config.weather, cache)?;
    let dashboard = Dashboard::new(Arc::new(geocoder), Arc::new(weather));

    let state = AppState::new(dashboard, config.defaults.clone());
    web::run(&config.server, state).await
}
