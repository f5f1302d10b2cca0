//! Hourly temperature line chart

use serde_json::json;

use super::Figure;
use crate::models::{HourlySample, ViewModel};

pub const EMPTY_TITLE: &str = "Hourly Temperature";
pub const TITLE: &str = "Hourly Temperature (recent → near future)";

/// Temperature over the whole hourly window, x = local time labels
pub fn render(view_model: &ViewModel) -> Figure {
    let Some(view) = view_model.as_ready() else {
        return Figure::empty(EMPTY_TITLE);
    };
    let unit = view.unit_symbol;
    let samples = view.hourly.samples();

    let times: Vec<String> = samples.iter().map(HourlySample::time_label).collect();
    let temperatures: Vec<f64> = samples.iter().map(|s| s.temperature).collect();

    Figure {
        data: vec![json!({
            "type": "scatter",
            "x": times,
            "y": temperatures,
            "mode": "lines",
            "name": format!("Temperature ({unit})"),
            "hovertemplate": format!("%{{x}}<br>%{{y:.1f}} {unit}<extra></extra>"),
        })],
        layout: json!({
            "title": { "text": TITLE },
            "xaxis": { "title": { "text": "Local time" } },
            "yaxis": { "title": { "text": unit } },
            "margin": { "l": 40, "r": 10, "t": 50, "b": 40 },
        }),
    }
}
