//! Presenters: pure renderers from a [`ViewModel`] to page fragments
//!
//! None of them fetches data or mutates the view model. Each one renders a
//! placeholder for [`ViewModel::Failed`].

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::{DisplayOptions, ViewModel};

pub mod cards;
pub mod chart;
pub mod current;
pub mod map;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use cards::ForecastCard;
pub use current::CurrentCard;
pub use summary::{SummaryRow, SummaryTable};

/// Escapes text for use inside HTML element content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `Day -3`, `Day 0`, `Day 2`; never a `+` sign
#[must_use]
pub fn day_label(offset: i64) -> String {
    format!("Day {offset}")
}

/// Plotly figure description, serialized as-is for the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    /// Figure with no traces, used as the placeholder for a failed view
    #[must_use]
    pub fn empty(title: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: json!({ "title": { "text": title } }),
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.layout.pointer("/title/text").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// All five fragments for one view model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDashboard {
    pub current: CurrentCard,
    pub forecast_cards: Vec<ForecastCard>,
    pub hourly_chart: Figure,
    pub location_map: Figure,
    pub summary: SummaryTable,
}

/// Runs every presenter against the same snapshot
#[must_use]
pub fn render_all(view_model: &ViewModel, options: &DisplayOptions) -> RenderedDashboard {
    RenderedDashboard {
        current: current::render(view_model, options),
        forecast_cards: cards::render(view_model),
        hourly_chart: chart::render(view_model),
        location_map: map::render(view_model),
        summary: summary::render(view_model),
    }
}
