//! Forecast client for the Open-Meteo API
//!
//! Fetches a fixed window (3 past days, today, 3 future days) of hourly and
//! daily series for a coordinate pair, with transient-failure retries and an
//! optional persistent response cache.

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::cache::PersistentCache;
use crate::config::WeatherConfig;
use crate::models::{Location, UnitSystem};
use crate::{Result, WeatherReportError};

pub mod open_meteo;

use open_meteo::{DAILY_VARIABLES, FORECAST_DAYS, HOURLY_VARIABLES, PAST_DAYS};

const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// Decimal places kept from geocoded coordinates, about 11 m
const COORDINATE_PRECISION: u32 = 4;

/// Half-open time grid `[start, end)` in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub start: i64,
    pub end: i64,
    pub interval: i64,
}

impl TimeGrid {
    #[must_use]
    pub fn empty(interval: i64) -> Self {
        Self {
            start: 0,
            end: 0,
            interval,
        }
    }

    /// Number of grid points; zero for a degenerate grid
    #[must_use]
    pub fn len(&self) -> usize {
        if self.interval <= 0 || self.end <= self.start {
            return 0;
        }
        let span = self.end - self.start;
        usize::try_from((span + self.interval - 1) / self.interval).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid instants, start inclusive, end exclusive
    pub fn instants(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map(move |i| self.start + self.interval * i as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBlock {
    pub grid: TimeGrid,
    pub temperature: Vec<f64>,
    /// Millimetres
    pub precipitation: Vec<f64>,
    pub relative_humidity: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBlock {
    /// Starts at the first local midnight; one point per calendar day
    pub grid: TimeGrid,
    pub temperature_max: Vec<f64>,
    pub temperature_min: Vec<f64>,
    /// Millimetres
    pub precipitation_sum: Vec<f64>,
}

/// Provider response normalized to grid metadata plus value columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherResponse {
    /// IANA name resolved by the provider from the coordinates
    pub timezone: String,
    pub utc_offset_seconds: i32,
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

/// Anything that can produce a forecast window for a coordinate pair
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<RawWeatherResponse>;
}

/// Open-Meteo forecast client
pub struct WeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    cache: Option<Arc<PersistentCache>>,
}

impl WeatherClient {
    /// Builds the HTTP client with timeout and retry policy from `config`.
    /// Responses are cached in `cache` when one is given.
    pub fn new(config: &WeatherConfig, cache: Option<Arc<PersistentCache>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherReportError::config(format!("Failed to create HTTP client: {e}")))?;

        let min_backoff = Duration::from_millis(config.backoff_base_ms);
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(min_backoff, MAX_BACKOFF.max(min_backoff))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Request signature: coordinates, requested variables and unit
    #[must_use]
    pub fn cache_key(latitude: f64, longitude: f64, unit: UnitSystem) -> String {
        let (lat, lon) = Location::rounded_coordinates(latitude, longitude, COORDINATE_PRECISION);
        format!(
            "forecast:{lat:.4}:{lon:.4}:{}:{}:{}:{PAST_DAYS}:{FORECAST_DAYS}",
            HOURLY_VARIABLES.join(","),
            DAILY_VARIABLES.join(","),
            unit.provider_unit()
        )
    }

    fn forecast_url(&self, latitude: f64, longitude: f64, unit: UnitSystem) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&timezone=auto&temperature_unit={}&hourly={}&daily={}&past_days={}&forecast_days={}&timeformat=unixtime",
            self.base_url,
            latitude,
            longitude,
            unit.provider_unit(),
            urlencoding::encode(&HOURLY_VARIABLES.join(",")),
            urlencoding::encode(&DAILY_VARIABLES.join(",")),
            PAST_DAYS,
            FORECAST_DAYS
        )
    }

    async fn cached_body(&self, key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get::<String>(key).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Cache lookup failed, fetching fresh data: {}", e);
                None
            }
        }
    }

    async fn store_body(&self, key: &str, body: String) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put_default(key, body).await {
                warn!("Failed to cache forecast response: {}", e);
            }
        }
    }

    /// GET with the retry middleware; any final failure is a fetch failure
    async fn request_body(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherReportError::weather_fetch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherReportError::weather_fetch(e.to_string()))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<open_meteo::ApiErrorBody>(&body)
                .map(|err| err.reason)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown error").to_string());
            return Err(WeatherReportError::weather_fetch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                reason
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        unit: UnitSystem,
    ) -> Result<RawWeatherResponse> {
        // The request uses the same coordinates the cache entry is keyed on
        let (latitude, longitude) =
            Location::rounded_coordinates(latitude, longitude, COORDINATE_PRECISION);
        let key = Self::cache_key(latitude, longitude, unit);

        if let Some(body) = self.cached_body(&key).await {
            debug!("Serving forecast from cache");
            return open_meteo::parse_forecast(&body);
        }

        let start_time = Instant::now();
        let url = self.forecast_url(latitude, longitude, unit);
        debug!("OpenMeteo API request URL: {}", url);

        let body = self.request_body(&url).await?;
        let raw = open_meteo::parse_forecast(&body)?;

        info!(
            "Retrieved forecast with {} hourly and {} daily points in {:.3}s",
            raw.hourly.grid.len(),
            raw.daily.grid.len(),
            start_time.elapsed().as_secs_f64()
        );

        self.store_body(&key, body).await;
        Ok(raw)
    }
}
