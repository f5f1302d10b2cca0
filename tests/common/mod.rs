//! Fakes and fixtures shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

use weather_report::models::GeocodedPlace;
use weather_report::weather::open_meteo::parse_forecast;
use weather_report::{
    Dashboard, Geocoder, RawWeatherResponse, Result, UnitSystem, WeatherReportError, WeatherSource,
};

pub fn williamsburg() -> GeocodedPlace {
    GeocodedPlace {
        display_name: "Williamsburg, James City County, Virginia, United States".to_string(),
        latitude: 37.270_702,
        longitude: -76.707_457,
    }
}

fn local_midnight(tz: Tz, date: NaiveDate) -> i64 {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .timestamp()
}

/// Unix bounds of the provider window: 3 days back to the end of day +3
pub fn window(tz: Tz, now: DateTime<Utc>) -> (i64, i64) {
    let today = now.with_timezone(&tz).date_naive();
    let first = today.checked_sub_days(Days::new(3)).unwrap();
    let end = today.checked_add_days(Days::new(4)).unwrap();
    (local_midnight(tz, first), local_midnight(tz, end))
}

pub fn hours_in_window(tz: Tz, now: DateTime<Utc>) -> usize {
    let (start, end) = window(tz, now);
    ((end - start) / 3600) as usize
}

/// Open-Meteo style body for the week around `now` in `tz`
pub fn forecast_body(tz: Tz, now: DateTime<Utc>) -> Value {
    let (start, _) = window(tz, now);
    let hours = hours_in_window(tz, now);
    let first = now
        .with_timezone(&tz)
        .date_naive()
        .checked_sub_days(Days::new(3))
        .unwrap();
    let days: Vec<i64> = (0..7)
        .map(|i| local_midnight(tz, first.checked_add_days(Days::new(i)).unwrap()))
        .collect();

    json!({
        "latitude": 37.27,
        "longitude": -76.71,
        "generationtime_ms": 0.1,
        "utc_offset_seconds": now.with_timezone(&tz).offset().fix().local_minus_utc(),
        "timezone": tz.name(),
        "timezone_abbreviation": "",
        "elevation": 25.0,
        "hourly": {
            "time": (0..hours).map(|i| start + 3600 * i as i64).collect::<Vec<_>>(),
            "temperature_2m": (0..hours).map(|i| 50.0 + (i % 24) as f64 / 2.0).collect::<Vec<_>>(),
            "precipitation": vec![0.0; hours],
            "relative_humidity_2m": vec![55.0; hours],
        },
        "daily": {
            "time": days,
            "temperature_2m_max": vec![68.0; 7],
            "temperature_2m_min": vec![49.0; 7],
            "precipitation_sum": vec![2.54; 7],
        }
    })
}

pub fn forecast(tz: Tz, now: DateTime<Utc>) -> RawWeatherResponse {
    parse_forecast(&forecast_body(tz, now).to_string()).unwrap()
}

/// Returns a fixed place, or "not found" when built with `None`
pub struct FakeGeocoder {
    place: Option<GeocodedPlace>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn found(place: GeocodedPlace) -> Arc<Self> {
        Arc::new(Self {
            place: Some(place),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Arc::new(Self {
            place: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, city: &str, country: &str) -> Result<GeocodedPlace> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.place
            .clone()
            .ok_or_else(|| WeatherReportError::location_not_found(format!("{city}, {country}")))
    }
}

/// A pair of signals holding one city's lookup until the test releases it
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

/// Resolves every city to a place named after it. Cities with a gate wait
/// at it, so tests choose the order in which overlapping cycles finish.
pub struct GatedGeocoder {
    gates: HashMap<String, Gate>,
}

impl GatedGeocoder {
    pub fn holding(cities: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            gates: cities
                .iter()
                .map(|city| ((*city).to_string(), Gate::default()))
                .collect(),
        })
    }

    pub fn gate(&self, city: &str) -> &Gate {
        &self.gates[city]
    }
}

#[async_trait]
impl Geocoder for GatedGeocoder {
    async fn resolve(&self, city: &str, country: &str) -> Result<GeocodedPlace> {
        if let Some(gate) = self.gates.get(city) {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        Ok(GeocodedPlace {
            display_name: format!("{city}, {country}"),
            latitude: 24.861,
            longitude: 67.010,
        })
    }
}

/// Serves a fixture in the requested timezone; Celsius requests can be held
/// at a gate until released.
pub struct FakeWeather {
    tz: Tz,
    failure: Option<String>,
    calls: AtomicUsize,
    hold_celsius: bool,
    pub started: Notify,
    pub release: Notify,
}

impl FakeWeather {
    fn build(tz: Tz, failure: Option<String>, hold_celsius: bool) -> Arc<Self> {
        Arc::new(Self {
            tz,
            failure,
            calls: AtomicUsize::new(0),
            hold_celsius,
            started: Notify::new(),
            release: Notify::new(),
        })
    }

    pub fn serving(tz: Tz) -> Arc<Self> {
        Self::build(tz, None, false)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::build(Tz::UTC, Some(message.to_string()), false)
    }

    pub fn holding_celsius(tz: Tz) -> Arc<Self> {
        Self::build(tz, None, true)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn fetch(&self, _latitude: f64, _longitude: f64, unit: UnitSystem) -> Result<RawWeatherResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_celsius && unit == UnitSystem::Celsius {
            self.started.notify_one();
            self.release.notified().await;
        }
        if let Some(message) = &self.failure {
            return Err(WeatherReportError::weather_fetch(message.clone()));
        }
        Ok(forecast(self.tz, Utc::now()))
    }
}

pub fn dashboard(geocoder: Arc<FakeGeocoder>, weather: Arc<FakeWeather>) -> Dashboard {
    Dashboard::new(geocoder, weather)
}
