use axum::{
    Router,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DefaultsConfig;
use crate::dashboard::Inputs;
use crate::models::{DisplayOptions, UnitSystem, ViewModel};
use crate::present::{self, RenderedDashboard};
use crate::web::AppState;

/// Query string shared by the weather page and the JSON endpoint.
///
/// Unchecked checkboxes are absent from a submitted form, so the display
/// flags only count once `submitted` is present.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub country: Option<String>,
    pub unit: Option<String>,
    pub temperature: Option<String>,
    pub rain: Option<String>,
    pub humidity: Option<String>,
    pub submitted: Option<String>,
}

impl WeatherQuery {
    /// Missing fields take the configured defaults; blank ones stay blank
    /// so the cycle reports the validation error.
    pub fn inputs(&self, defaults: &DefaultsConfig) -> Inputs {
        let unit = match self.unit.as_deref() {
            None => defaults.unit,
            Some(raw) => raw.parse::<UnitSystem>().unwrap_or_else(|e| {
                warn!("{}; using {}", e, defaults.unit);
                defaults.unit
            }),
        };
        Inputs::new(
            self.city.clone().unwrap_or_else(|| defaults.city.clone()),
            self.country.clone().unwrap_or_else(|| defaults.country.clone()),
            unit,
        )
    }

    pub fn display_options(&self) -> DisplayOptions {
        if self.submitted.is_none() {
            return DisplayOptions::default();
        }
        DisplayOptions {
            temperature: self.temperature.is_some(),
            rain: self.rain.is_some(),
            humidity: self.humidity.is_some(),
        }
    }
}

#[derive(Serialize)]
pub struct ApiWeatherResponse {
    pub view_model: ViewModel,
    pub display: DisplayOptions,
    pub rendered: RenderedDashboard,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/weather", get(get_weather))
}

async fn get_weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeatherQuery>,
) -> impl IntoResponse {
    let inputs = query.inputs(&state.defaults);
    let display = query.display_options();

    let (store, set_session) = state.session(&headers).await;
    let view_model = store.refresh(&state.dashboard, &inputs).await;
    let rendered = present::render_all(&view_model, &display);

    (
        set_session,
        Json(ApiWeatherResponse {
            view_model: ViewModel::clone(&view_model),
            display,
            rendered,
        }),
    )
}
