//! Shared view-model fixtures for presenter tests

use chrono::{Duration, NaiveDate};

use crate::models::{
    DailySample, DailySeries, GeocodedPlace, HourlySample, HourlySeries, Location, UnitSystem,
    ViewModel, WeatherView,
};

/// Seven days of hourly data with "now" at 2025-06-04 12:00 and nine daily
/// rows spanning offsets -4..=4
pub fn week_view(unit: UnitSystem) -> ViewModel {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let samples = (0..168)
        .map(|i| HourlySample {
            timestamp_local: start + Duration::hours(i),
            temperature: 60.0 + (i % 24) as f64 / 2.0,
            precipitation: if i == 84 { 1.27 } else { 0.0 },
            relative_humidity: 64.6,
        })
        .collect();
    let hourly = HourlySeries::new(samples, 84).unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
    let daily = DailySeries::new(
        (-4..=4)
            .map(|offset| DailySample {
                date: today + Duration::days(offset),
                temp_max: 80.4 + offset as f64,
                temp_min: 59.6 + offset as f64,
                precipitation_sum: 25.4,
                day_offset: offset,
            })
            .collect(),
    )
    .unwrap();

    ViewModel::Ready(WeatherView {
        location: Location::new(
            GeocodedPlace {
                display_name: "Williamsburg, Virginia, United States".to_string(),
                latitude: 37.270_702,
                longitude: -76.707_457,
            },
            unit,
        ),
        hourly,
        daily,
        unit_symbol: unit.symbol(),
    })
}
