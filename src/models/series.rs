//! Hourly and daily weather series

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::{Result, WeatherReportError};

/// Format used for every hourly timestamp shown to the user
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One hourly observation or forecast on the local-time grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Naive local wall-clock time of the sample
    pub timestamp_local: NaiveDateTime,
    pub temperature: f64,
    /// Millimetres
    pub precipitation: f64,
    /// Percent
    pub relative_humidity: f64,
}

impl HourlySample {
    /// `YYYY-MM-DD HH:MM`
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp_local.format(LOCAL_TIME_FORMAT).to_string()
    }
}

/// Hourly samples plus the index of the sample closest to now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    samples: Vec<HourlySample>,
    now_index: usize,
}

impl HourlySeries {
    /// Fails on an empty series; clamps `now_index` into range.
    pub fn new(samples: Vec<HourlySample>, now_index: usize) -> Result<Self> {
        if samples.is_empty() {
            return Err(WeatherReportError::malformed("hourly series is empty"));
        }
        let now_index = now_index.min(samples.len() - 1);
        Ok(Self { samples, now_index })
    }

    #[must_use]
    pub fn samples(&self) -> &[HourlySample] {
        &self.samples
    }

    #[must_use]
    pub fn now_index(&self) -> usize {
        self.now_index
    }

    /// The sample at `now_index`
    #[must_use]
    pub fn now(&self) -> &HourlySample {
        &self.samples[self.now_index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Daily aggregate for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Millimetres
    pub precipitation_sum: f64,
    /// Whole days from today's local date; 0 is today
    pub day_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    samples: Vec<DailySample>,
}

impl DailySeries {
    /// Fails unless offsets are strictly increasing by exactly one.
    pub fn new(samples: Vec<DailySample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(WeatherReportError::malformed("daily series is empty"));
        }
        if let Some(pair) = samples
            .windows(2)
            .find(|pair| pair[1].day_offset != pair[0].day_offset + 1)
        {
            return Err(WeatherReportError::malformed(format!(
                "daily offsets are not contiguous: {} followed by {}",
                pair[0].day_offset, pair[1].day_offset
            )));
        }
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[DailySample] {
        &self.samples
    }

    /// Samples whose offset lies in `range`, in order
    pub fn within(&self, range: RangeInclusive<i64>) -> impl Iterator<Item = &DailySample> {
        self.samples
            .iter()
            .filter(move |sample| range.contains(&sample.day_offset))
    }

    #[must_use]
    pub fn today(&self) -> Option<&DailySample> {
        self.samples.iter().find(|sample| sample.day_offset == 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hourly(hour: u32) -> HourlySample {
        HourlySample {
            timestamp_local: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
            temperature: 70.0,
            precipitation: 0.0,
            relative_humidity: 50.0,
        }
    }

    fn daily(day: u32, offset: i64) -> DailySample {
        DailySample {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            temp_max: 80.0,
            temp_min: 60.0,
            precipitation_sum: 0.0,
            day_offset: offset,
        }
    }

    #[test]
    fn test_hourly_series_rejects_empty() {
        assert!(HourlySeries::new(Vec::new(), 0).is_err());
    }

    #[test]
    fn test_hourly_series_clamps_now_index() {
        let series = HourlySeries::new(vec![hourly(0), hourly(1)], 10).unwrap();
        assert_eq!(series.now_index(), 1);
        assert_eq!(series.now().time_label(), "2025-06-01 01:00");
    }

    #[test]
    fn test_daily_series_requires_contiguous_offsets() {
        assert!(DailySeries::new(vec![daily(1, -1), daily(3, 1)]).is_err());
        assert!(DailySeries::new(vec![daily(1, 0), daily(1, 0)]).is_err());
        assert!(DailySeries::new(vec![daily(1, -1), daily(2, 0), daily(3, 1)]).is_ok());
    }

    #[test]
    fn test_daily_series_within_range() {
        let samples = (0..9).map(|i| daily(1 + i as u32, i - 4)).collect();
        let series = DailySeries::new(samples).unwrap();

        let shown: Vec<i64> = series.within(-3..=3).map(|s| s.day_offset).collect();
        assert_eq!(shown, vec![-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(series.len(), 9);
        assert_eq!(series.today().map(|s| s.date.to_string()).as_deref(), Some("2025-06-05"));
    }
}
