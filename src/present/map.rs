//! Single-marker location map with a hover summary of the current reading

use serde_json::json;

use super::{Figure, escape_html};
use crate::models::{Location, ViewModel, WeatherView};

pub const TITLE: &str = "Location Map";
const ZOOM: u8 = 9;
const HEIGHT: u16 = 420;

/// Hover text for the marker, rendered by Plotly as HTML
#[must_use]
pub fn hover_text(view: &WeatherView) -> String {
    let now = view.current();
    let location = &view.location;
    format!(
        "<b>{}</b><br>Lat/Lon: {}, {}<br>Temp: {:.1}{}<br>Humidity: {:.0}%<br>Precip: {}",
        escape_html(&location.display_name),
        location.latitude_display(),
        location.longitude_display(),
        now.temperature,
        view.unit_symbol,
        now.relative_humidity,
        view.format_precipitation(now.precipitation)
    )
}

pub fn render(view_model: &ViewModel) -> Figure {
    let Some(view) = view_model.as_ready() else {
        return Figure::empty(TITLE);
    };
    // Same 3-decimal coordinates the hover text shows
    let (lat, lon) =
        Location::rounded_coordinates(view.location.latitude, view.location.longitude, 3);

    Figure {
        data: vec![json!({
            "type": "scattermapbox",
            "lat": [lat],
            "lon": [lon],
            "mode": "markers",
            "marker": { "size": 18 },
            "hovertemplate": format!("{}<extra></extra>", hover_text(view)),
            "name": "Location",
        })],
        layout: json!({
            "title": { "text": TITLE },
            "mapbox": {
                "style": "open-street-map",
                "center": { "lat": lat, "lon": lon },
                "zoom": ZOOM,
            },
            "margin": { "l": 20, "r": 20, "t": 50, "b": 20 },
            "height": HEIGHT,
            "showlegend": false,
        }),
    }
}
