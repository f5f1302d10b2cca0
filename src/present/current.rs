//! Current-conditions card and its weather icon

use serde::Serialize;
use std::fmt::Write as _;

use super::escape_html;
use crate::models::{Condition, DisplayOptions, DisplayParam, ViewModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentCard {
    Conditions {
        condition: Condition,
        /// `place • (lat, lon)`
        place: String,
        time: String,
        /// Reading lines selected by the display options, in fixed order
        readings: Vec<String>,
    },
    Error {
        message: String,
    },
}

pub fn render(view_model: &ViewModel, options: &DisplayOptions) -> CurrentCard {
    let Some(view) = view_model.as_ready() else {
        return CurrentCard::Error {
            message: view_model.error().unwrap_or_default().to_string(),
        };
    };

    let now = view.current();
    let mut readings = Vec::new();
    if options.contains(DisplayParam::Temperature) {
        readings.push(format!("Temperature: {:.1}{}", now.temperature, view.unit_symbol));
    }
    if options.contains(DisplayParam::Humidity) {
        readings.push(format!("Humidity: {:.0}%", now.relative_humidity));
    }
    if options.contains(DisplayParam::Rain) {
        readings.push(format!("Rain: {}", view.format_precipitation(now.precipitation)));
    }

    CurrentCard::Conditions {
        condition: view.condition(),
        place: format!(
            "{} • {}",
            view.location.display_name,
            view.location.format_coordinates()
        ),
        time: now.time_label(),
        readings,
    }
}

impl CurrentCard {
    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::Conditions { condition, .. } => Some(*condition),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Error { message } => {
                format!(r#"<div class="main-card">Error: {}</div>"#, escape_html(message))
            }
            Self::Conditions {
                condition,
                place,
                time,
                readings,
            } => {
                let mut html = format!(
                    r#"<div class="main-card {}"><h2>Current conditions</h2><small>{}</small><p>Time: {}</p>"#,
                    condition.css_class(),
                    escape_html(place),
                    escape_html(time)
                );
                for reading in readings {
                    let _ = write!(html, "<p>{}</p>", escape_html(reading));
                }
                html.push_str("</div>");
                html
            }
        }
    }

    /// Icon markup for the classification; empty for the error card
    #[must_use]
    pub fn icon_html(&self) -> String {
        self.condition().map(icon_html).unwrap_or_default()
    }
}

#[must_use]
pub fn icon_html(condition: Condition) -> String {
    const CLOUD: &str = r#"<div class="cloud-bubble b1"></div><div class="cloud-bubble b2"></div><div class="cloud-bubble b3"></div>"#;

    let inner = match condition {
        Condition::Clear => {
            r#"<div class="wx-icon sun"><div class="sun-core"></div><div class="sun-rays"></div></div>"#
                .to_string()
        }
        Condition::Cloudy => format!(r#"<div class="wx-icon cloud">{CLOUD}</div>"#),
        Condition::Rainy => format!(
            r#"<div class="wx-icon rain">{CLOUD}<span class="drop d1"></span><span class="drop d2"></span><span class="drop d3"></span></div>"#
        ),
    };
    format!(r#"<div class="weather-icon-wrap">{inner}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DailySample, DailySeries, GeocodedPlace, HourlySample, HourlySeries, Location, UnitSystem,
        WeatherView,
    };
    use chrono::NaiveDate;

    fn view_model(precipitation: f64, humidity: f64) -> ViewModel {
        let date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let hourly = HourlySeries::new(
            vec![HourlySample {
                timestamp_local: date.and_hms_opt(12, 0, 0).unwrap(),
                temperature: 71.26,
                precipitation,
                relative_humidity: humidity,
            }],
            0,
        )
        .unwrap();
        let daily = DailySeries::new(vec![DailySample {
            date,
            temp_max: 80.0,
            temp_min: 60.0,
            precipitation_sum: 0.0,
            day_offset: 0,
        }])
        .unwrap();

        ViewModel::Ready(WeatherView {
            location: Location::new(
                GeocodedPlace {
                    display_name: "Williamsburg, Virginia, United States".to_string(),
                    latitude: 37.270_702,
                    longitude: -76.707_457,
                },
                UnitSystem::Fahrenheit,
            ),
            hourly,
            daily,
            unit_symbol: "°F",
        })
    }

    #[test]
    fn test_default_options_show_temperature_only() {
        let card = render(&view_model(0.0, 40.0), &DisplayOptions::default());
        let CurrentCard::Conditions { place, time, readings, .. } = &card else {
            panic!("expected conditions card");
        };
        assert_eq!(place, "Williamsburg, Virginia, United States • (37.271, -76.707)");
        assert_eq!(time, "2025-06-04 12:00");
        assert_eq!(readings, &vec!["Temperature: 71.3°F".to_string()]);
    }

    #[test]
    fn test_all_options_in_fixed_order() {
        let card = render(&view_model(5.08, 82.4), &DisplayOptions::all());
        let CurrentCard::Conditions { readings, .. } = &card else {
            panic!("expected conditions card");
        };
        assert_eq!(
            readings,
            &vec![
                "Temperature: 71.3°F".to_string(),
                "Humidity: 82%".to_string(),
                "Rain: 0.20 in".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_options_still_shows_place_and_time() {
        let html = render(&view_model(0.0, 40.0), &DisplayOptions::none()).to_html();
        assert!(html.contains("<h2>Current conditions</h2>"));
        assert!(html.contains("Time: 2025-06-04 12:00"));
        assert!(!html.contains("Temperature:"));
    }

    #[test]
    fn test_background_and_icon_follow_classification() {
        let rainy = render(&view_model(0.3, 90.0), &DisplayOptions::default());
        assert_eq!(rainy.condition(), Some(Condition::Rainy));
        assert!(rainy.to_html().starts_with(r#"<div class="main-card rainy">"#));
        assert!(rainy.icon_html().contains("wx-icon rain"));

        let cloudy = render(&view_model(0.1, 70.0), &DisplayOptions::default());
        assert!(cloudy.icon_html().contains("wx-icon cloud"));

        let clear = render(&view_model(0.0, 20.0), &DisplayOptions::default());
        assert!(clear.icon_html().contains("wx-icon sun"));
    }

    #[test]
    fn test_error_card() {
        let card = render(&ViewModel::default(), &DisplayOptions::default());
        assert_eq!(card.to_html(), r#"<div class="main-card">Error: No data</div>"#);
        assert_eq!(card.condition(), None);
    }
}
