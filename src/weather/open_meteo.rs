//! `OpenMeteo` API response structures and normalization into
//! [`RawWeatherResponse`]

use serde::Deserialize;

use super::{DailyBlock, HourlyBlock, RawWeatherResponse, TimeGrid};
use crate::{Result, WeatherReportError};

pub const HOURLY_VARIABLES: [&str; 3] = ["temperature_2m", "precipitation", "relative_humidity_2m"];
pub const DAILY_VARIABLES: [&str; 3] = ["temperature_2m_max", "temperature_2m_min", "precipitation_sum"];
pub const PAST_DAYS: u32 = 3;
/// Includes today
pub const FORECAST_DAYS: u32 = 4;

const DEFAULT_HOURLY_INTERVAL: i64 = 3600;
const DAILY_INTERVAL: i64 = 86_400;

/// Forecast response requested with `timeformat=unixtime`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

/// Hourly weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m", default)]
    pub relative_humidity: Vec<Option<f64>>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<i64>,
    #[serde(rename = "temperature_2m_max", default)]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum", default)]
    pub precipitation: Vec<Option<f64>>,
}

/// Error payload returned with 4xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub reason: String,
}

/// Missing readings become NaN, which formats as "NaN" and never crosses a
/// classification threshold.
fn fill_missing(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

/// Hourly instants must be evenly spaced; the grid is `[first, last + interval)`.
fn hourly_grid(time: &[i64]) -> Result<TimeGrid> {
    let Some(&start) = time.first() else {
        return Ok(TimeGrid::empty(DEFAULT_HOURLY_INTERVAL));
    };
    let interval = match time.get(1) {
        Some(&second) => second - start,
        None => DEFAULT_HOURLY_INTERVAL,
    };
    if interval <= 0 {
        return Err(WeatherReportError::malformed(format!(
            "hourly interval must be positive, got {interval}s"
        )));
    }
    if let Some(pair) = time.windows(2).find(|pair| pair[1] - pair[0] != interval) {
        return Err(WeatherReportError::malformed(format!(
            "hourly timestamps are not evenly spaced ({} -> {})",
            pair[0], pair[1]
        )));
    }
    let end = start + interval * time.len() as i64;
    Ok(TimeGrid {
        start,
        end,
        interval,
    })
}

/// Daily rows are one per local calendar day. Their unix instants are local
/// midnights, which are not evenly spaced across DST changes, so only the
/// first instant and the row count are kept.
fn daily_grid(time: &[i64]) -> TimeGrid {
    match time.first() {
        Some(&start) => TimeGrid {
            start,
            end: start + DAILY_INTERVAL * time.len() as i64,
            interval: DAILY_INTERVAL,
        },
        None => TimeGrid::empty(DAILY_INTERVAL),
    }
}

impl TryFrom<ForecastResponse> for RawWeatherResponse {
    type Error = WeatherReportError;

    fn try_from(response: ForecastResponse) -> Result<Self> {
        let hourly = response
            .hourly
            .ok_or_else(|| WeatherReportError::malformed("response has no hourly block"))?;
        let daily = response
            .daily
            .ok_or_else(|| WeatherReportError::malformed("response has no daily block"))?;

        Ok(Self {
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            hourly: HourlyBlock {
                grid: hourly_grid(&hourly.time)?,
                temperature: fill_missing(hourly.temperature),
                precipitation: fill_missing(hourly.precipitation),
                relative_humidity: fill_missing(hourly.relative_humidity),
            },
            daily: DailyBlock {
                grid: daily_grid(&daily.time),
                temperature_max: fill_missing(daily.temperature_max),
                temperature_min: fill_missing(daily.temperature_min),
                precipitation_sum: fill_missing(daily.precipitation),
            },
        })
    }
}

/// Parses a response body into the normalized form
pub fn parse_forecast(body: &str) -> Result<RawWeatherResponse> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherReportError::malformed(format!("invalid forecast JSON: {e}")))?;
    RawWeatherResponse::try_from(response)
}
