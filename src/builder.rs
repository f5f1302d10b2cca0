//! Turns a geocoded location and a raw forecast response into a [`ViewModel`]
//!
//! The builder is pure: it performs no I/O and never fails. Any shape problem
//! in the provider data is logged and becomes a [`ViewModel::Failed`].

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::models::{
    DailySample, DailySeries, HourlySample, HourlySeries, Location, UnitSystem, ViewModel,
    WeatherView,
};
use crate::weather::{DailyBlock, HourlyBlock, RawWeatherResponse};
use crate::{Result, WeatherReportError};

/// Daily instants are local midnights; probing at midday keeps the calendar
/// date stable even when only a fixed UTC offset is known.
const MIDDAY_SECONDS: i64 = 12 * 3600;

/// Timezone used to express grid instants as local wall-clock time
#[derive(Debug, Clone, Copy)]
enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Prefers the IANA name; falls back to the reported UTC offset.
    fn resolve(name: &str, utc_offset_seconds: i32) -> Result<Self> {
        if let Ok(tz) = name.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }
        debug!(
            "Unknown timezone '{}', using fixed offset {}s",
            name, utc_offset_seconds
        );
        FixedOffset::east_opt(utc_offset_seconds)
            .map(Self::Fixed)
            .ok_or_else(|| {
                WeatherReportError::malformed(format!(
                    "invalid UTC offset {utc_offset_seconds}s"
                ))
            })
    }

    fn naive_local(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Named(tz) => instant.with_timezone(&tz).naive_local(),
            Self::Fixed(offset) => instant.with_timezone(&offset).naive_local(),
        }
    }

    fn local_time(self, unix_seconds: i64) -> Result<NaiveDateTime> {
        DateTime::from_timestamp(unix_seconds, 0)
            .map(|instant| self.naive_local(instant))
            .ok_or_else(|| {
                WeatherReportError::malformed(format!("timestamp out of range: {unix_seconds}"))
            })
    }
}

/// Index of the instant closest to `now`; the earliest wins a tie.
/// Returns 0 for an empty slice.
#[must_use]
pub fn now_index(instants: &[i64], now: i64) -> usize {
    let mut best = 0;
    let mut best_distance = u64::MAX;
    for (index, instant) in instants.iter().enumerate() {
        let distance = instant.abs_diff(now);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Whole calendar days from `today` to `date`
#[must_use]
pub fn day_offset(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

fn check_column(name: &str, column: &[f64], expected: usize) -> Result<()> {
    if column.len() != expected {
        return Err(WeatherReportError::malformed(format!(
            "{name} has {} values for {expected} time steps",
            column.len()
        )));
    }
    Ok(())
}

pub struct ViewModelBuilder;

impl ViewModelBuilder {
    /// Builds against the current wall clock
    #[must_use]
    pub fn build(location: Location, raw: &RawWeatherResponse, unit: UnitSystem) -> ViewModel {
        Self::build_at(location, raw, unit, Utc::now())
    }

    /// Builds against a fixed clock
    #[must_use]
    pub fn build_at(
        location: Location,
        raw: &RawWeatherResponse,
        unit: UnitSystem,
        now: DateTime<Utc>,
    ) -> ViewModel {
        match Self::try_build(location, raw, unit, now) {
            Ok(view) => ViewModel::Ready(view),
            Err(e) => {
                warn!("Discarding forecast response: {}", e);
                ViewModel::failed(e.user_message())
            }
        }
    }

    fn try_build(
        mut location: Location,
        raw: &RawWeatherResponse,
        unit: UnitSystem,
        now: DateTime<Utc>,
    ) -> Result<WeatherView> {
        let zone = LocalZone::resolve(&raw.timezone, raw.utc_offset_seconds)?;
        let hourly = Self::hourly_series(&raw.hourly, zone, now)?;
        let daily = Self::daily_series(&raw.daily, zone, now)?;

        location.unit_system = unit;

        debug!(
            "Built view for {} with {} hourly samples (now index {}) and {} days",
            location.display_name,
            hourly.len(),
            hourly.now_index(),
            daily.len()
        );

        Ok(WeatherView {
            location,
            hourly,
            daily,
            unit_symbol: unit.symbol(),
        })
    }

    fn hourly_series(
        block: &HourlyBlock,
        zone: LocalZone,
        now: DateTime<Utc>,
    ) -> Result<HourlySeries> {
        if block.grid.interval <= 0 {
            return Err(WeatherReportError::malformed(format!(
                "hourly interval must be positive, got {}s",
                block.grid.interval
            )));
        }
        let count = block.grid.len();
        if count == 0 {
            return Err(WeatherReportError::malformed("hourly series is empty"));
        }
        check_column("hourly temperature", &block.temperature, count)?;
        check_column("hourly precipitation", &block.precipitation, count)?;
        check_column("hourly relative humidity", &block.relative_humidity, count)?;

        let instants: Vec<i64> = block.grid.instants().collect();
        let samples = instants
            .iter()
            .enumerate()
            .map(|(i, &instant)| {
                Ok(HourlySample {
                    timestamp_local: zone.local_time(instant)?,
                    temperature: block.temperature[i],
                    precipitation: block.precipitation[i],
                    relative_humidity: block.relative_humidity[i],
                })
            })
            .collect::<Result<Vec<_>>>()?;

        HourlySeries::new(samples, now_index(&instants, now.timestamp()))
    }

    fn daily_series(block: &DailyBlock, zone: LocalZone, now: DateTime<Utc>) -> Result<DailySeries> {
        let count = block.grid.len();
        if count == 0 {
            return Err(WeatherReportError::malformed("daily series is empty"));
        }
        check_column("daily maximum temperature", &block.temperature_max, count)?;
        check_column("daily minimum temperature", &block.temperature_min, count)?;
        check_column("daily precipitation sum", &block.precipitation_sum, count)?;

        let first_date = zone.local_time(block.grid.start + MIDDAY_SECONDS)?.date();
        let today = zone.naive_local(now).date();

        let samples = (0..count)
            .map(|i| {
                let date = first_date
                    .checked_add_days(Days::new(i as u64))
                    .ok_or_else(|| WeatherReportError::malformed("daily dates out of range"))?;
                Ok(DailySample {
                    date,
                    temp_max: block.temperature_max[i],
                    temp_min: block.temperature_min[i],
                    precipitation_sum: block.precipitation_sum[i],
                    day_offset: day_offset(date, today),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        DailySeries::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeocodedPlace;
    use crate::weather::TimeGrid;
    use rstest::rstest;

    const JUNE_1_UTC: i64 = 1_748_736_000;
    const HOUR: i64 = 3600;
    const DAY: i64 = 86_400;

    fn location() -> Location {
        Location::new(
            GeocodedPlace {
                display_name: "Williamsburg, Virginia, United States".to_string(),
                latitude: 37.270_702,
                longitude: -76.707_457,
            },
            UnitSystem::Fahrenheit,
        )
    }

    fn raw(timezone: &str, hourly_start: i64, hours: usize, daily_start: i64, days: usize) -> RawWeatherResponse {
        RawWeatherResponse {
            timezone: timezone.to_string(),
            utc_offset_seconds: 0,
            hourly: HourlyBlock {
                grid: TimeGrid {
                    start: hourly_start,
                    end: hourly_start + HOUR * hours as i64,
                    interval: HOUR,
                },
                temperature: (0..hours).map(|i| 50.0 + i as f64 / 10.0).collect(),
                precipitation: vec![0.0; hours],
                relative_humidity: vec![55.0; hours],
            },
            daily: DailyBlock {
                grid: TimeGrid {
                    start: daily_start,
                    end: daily_start + DAY * days as i64,
                    interval: DAY,
                },
                temperature_max: vec![80.0; days],
                temperature_min: vec![60.0; days],
                precipitation_sum: vec![2.54; days],
            },
        }
    }

    fn at(unix_seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(unix_seconds, 0).unwrap()
    }

    #[rstest]
    #[case(&[0, 10, 20], 11, 1)]
    #[case(&[0, 10, 20], 15, 1)]
    #[case(&[0, 10, 20], 16, 2)]
    #[case(&[0, 10, 20], -50, 0)]
    #[case(&[0, 10, 20], 999, 2)]
    #[case(&[], 5, 0)]
    fn test_now_index(#[case] instants: &[i64], #[case] now: i64, #[case] expected: usize) {
        assert_eq!(now_index(instants, now), expected);
    }

    #[test]
    fn test_full_window_in_utc() {
        let raw = raw("UTC", JUNE_1_UTC, 168, JUNE_1_UTC, 7);
        let now = at(JUNE_1_UTC + 3 * DAY + 12 * HOUR + 20 * 60);

        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, now);
        let view = vm.as_ready().unwrap();

        assert_eq!(view.hourly.len(), 168);
        assert_eq!(view.hourly.now_index(), 84);
        assert_eq!(view.current().time_label(), "2025-06-04 12:00");
        assert_eq!(view.unit_symbol, "°F");

        let offsets: Vec<i64> = view.daily.samples().iter().map(|d| d.day_offset).collect();
        assert_eq!(offsets, vec![-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(view.daily.today().unwrap().date.to_string(), "2025-06-04");
    }

    #[test]
    fn test_half_hour_tie_picks_earlier_sample() {
        let raw = raw("UTC", JUNE_1_UTC, 168, JUNE_1_UTC, 7);
        let now = at(JUNE_1_UTC + 3 * DAY + 12 * HOUR + 30 * 60);

        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Celsius, now);
        let view = vm.as_ready().unwrap();
        assert_eq!(view.hourly.now_index(), 84);
        assert_eq!(view.unit_symbol, "°C");
        assert_eq!(view.location.unit_system, UnitSystem::Celsius);
    }

    #[test]
    fn test_now_outside_window_is_clamped() {
        let raw = raw("UTC", JUNE_1_UTC, 24, JUNE_1_UTC, 1);

        let before = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(0));
        assert_eq!(before.as_ready().unwrap().hourly.now_index(), 0);

        let after = ViewModelBuilder::build_at(
            location(),
            &raw,
            UnitSystem::Fahrenheit,
            at(JUNE_1_UTC + 30 * DAY),
        );
        assert_eq!(after.as_ready().unwrap().hourly.now_index(), 23);
    }

    #[test]
    fn test_hourly_labels_follow_dst_shift() {
        // 2025-03-09 01:00 EST, then clocks jump to 03:00 EDT
        let raw = raw("America/New_York", 1_741_500_000, 3, 1_741_323_600, 7);
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(1_741_622_400));
        let view = vm.as_ready().unwrap();

        let labels: Vec<String> = view.hourly.samples().iter().map(HourlySample::time_label).collect();
        assert_eq!(labels, vec!["2025-03-09 01:00", "2025-03-09 03:00", "2025-03-09 04:00"]);
    }

    #[test]
    fn test_daily_offsets_across_dst_use_local_dates() {
        // Daily rows start at 2025-03-07 00:00 EST; now is 2025-03-10 12:00 EDT
        let raw = raw("America/New_York", 1_741_500_000, 3, 1_741_323_600, 7);
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(1_741_622_400));
        let view = vm.as_ready().unwrap();

        let dates: Vec<String> = view.daily.samples().iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates.first().unwrap(), "2025-03-07");
        assert_eq!(dates.last().unwrap(), "2025-03-13");
        let offsets: Vec<i64> = view.daily.samples().iter().map(|d| d.day_offset).collect();
        assert_eq!(offsets, vec![-3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_today_uses_local_date_not_utc_date() {
        // 2025-03-10 03:30 UTC is still 2025-03-09 in New York
        let raw = raw("America/New_York", 1_741_500_000, 3, 1_741_323_600, 7);
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(1_741_577_400));
        let view = vm.as_ready().unwrap();

        assert_eq!(view.daily.today().unwrap().date.to_string(), "2025-03-09");
        assert_eq!(view.daily.within(-3..=3).count(), 6);
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_offset() {
        let mut raw = raw("Mars/Olympus_Mons", JUNE_1_UTC, 2, JUNE_1_UTC, 1);
        raw.utc_offset_seconds = 2 * 3600;
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(JUNE_1_UTC));
        assert_eq!(vm.as_ready().unwrap().current().time_label(), "2025-06-01 02:00");
    }

    #[test]
    fn test_precipitation_is_kept_in_millimetres() {
        let raw = raw("UTC", JUNE_1_UTC, 24, JUNE_1_UTC, 1);
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(JUNE_1_UTC));
        let view = vm.as_ready().unwrap();

        let today = view.daily.today().unwrap();
        assert_eq!(today.precipitation_sum, 2.54);
        assert_eq!(view.format_precipitation(today.precipitation_sum), "0.10 in");
        // Formatting twice must not convert twice
        assert_eq!(view.format_precipitation(today.precipitation_sum), "0.10 in");
    }

    #[test]
    fn test_empty_hourly_series_becomes_error() {
        let raw = raw("UTC", JUNE_1_UTC, 0, JUNE_1_UTC, 7);
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(JUNE_1_UTC));
        assert!(vm.as_ready().is_none());
        assert!(vm.error().unwrap().contains("hourly series is empty"));
    }

    #[test]
    fn test_column_length_mismatch_becomes_error() {
        let mut raw = raw("UTC", JUNE_1_UTC, 24, JUNE_1_UTC, 7);
        raw.hourly.relative_humidity.pop();
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(JUNE_1_UTC));
        assert!(vm.error().unwrap().contains("relative humidity"));
    }

    #[test]
    fn test_non_positive_interval_becomes_error() {
        let mut raw = raw("UTC", JUNE_1_UTC, 24, JUNE_1_UTC, 7);
        raw.hourly.grid.interval = 0;
        let vm = ViewModelBuilder::build_at(location(), &raw, UnitSystem::Fahrenheit, at(JUNE_1_UTC));
        assert!(vm.error().is_some());
    }
}
