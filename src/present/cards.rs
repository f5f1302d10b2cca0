//! Day-by-day forecast strip

use serde::Serialize;
use std::ops::RangeInclusive;

use super::{day_label, escape_html};
use crate::models::ViewModel;

/// Offsets shown in the strip; other days stay in the series
pub const SHOWN_OFFSETS: RangeInclusive<i64> = -3..=3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub day_offset: i64,
    pub label: String,
    pub high_low: String,
    pub rain: String,
}

impl ForecastCard {
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="card"><p>{}</p><p>{}</p><p>{}</p></div>"#,
            escape_html(&self.label),
            escape_html(&self.high_low),
            escape_html(&self.rain)
        )
    }
}

/// One card per daily sample with an offset in [`SHOWN_OFFSETS`]
pub fn render(view_model: &ViewModel) -> Vec<ForecastCard> {
    let Some(view) = view_model.as_ready() else {
        return Vec::new();
    };
    let unit = view.unit_symbol;

    view.daily
        .within(SHOWN_OFFSETS)
        .map(|day| ForecastCard {
            day_offset: day.day_offset,
            label: day_label(day.day_offset),
            high_low: format!(
                "High: {:.0}{unit} • Low: {:.0}{unit}",
                day.temp_max, day.temp_min
            ),
            rain: format!("Rain: {}", view.format_precipitation(day.precipitation_sum)),
        })
        .collect()
}

#[must_use]
pub fn strip_html(cards: &[ForecastCard]) -> String {
    cards.iter().map(ForecastCard::to_html).collect()
}
