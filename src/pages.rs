//! Server-rendered HTML for the landing and weather pages

use std::fmt::Write as _;
use tracing::warn;

use crate::dashboard::Inputs;
use crate::models::{DisplayOptions, DisplayParam, UnitSystem};
use crate::present::{Figure, RenderedDashboard, cards, escape_html};

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Cities linked from the landing page: (city, country)
pub const FEATURED_CITIES: [(&str, &str); 3] = [
    ("Karachi", "Pakistan"),
    ("San Salvador", "El Salvador"),
    ("Falls Church", "USA"),
];

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Weather,
}

fn navbar(active: Page) -> String {
    let link = |page: Page, href: &str, label: &str| {
        let class = if page == active { "nav-link active" } else { "nav-link" };
        format!(r#"<a class="{class}" href="{href}">{label}</a>"#)
    };
    format!(
        r#"<nav id="main-navbar" class="navbar"><a class="navbar-brand" href="/">Weather Report</a><div class="navbar-nav">{}{}</div></nav>"#,
        link(Page::Home, "/", "Home"),
        link(Page::Weather, "/weather", "Weather Report")
    )
}

fn layout(active: Page, title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<link rel="stylesheet" href="/assets/style.css">
{head_extra}
</head>
<body>
{}
{body}
</body>
</html>
"#,
        escape_html(title),
        navbar(active)
    )
}

/// Link into the weather page for a place
#[must_use]
pub fn weather_link(city: &str, country: &str) -> String {
    format!(
        "/weather?city={}&country={}",
        urlencoding::encode(city),
        urlencoding::encode(country)
    )
}

#[must_use]
pub fn home_page() -> String {
    let mut featured = String::new();
    for (city, country) in FEATURED_CITIES {
        let _ = write!(
            featured,
            r#"<a class="featured-city" href="{}">{}, {}</a>"#,
            escape_html(&weather_link(city, country)),
            escape_html(city),
            escape_html(country)
        );
    }

    let body = format!(
        r#"<div class="homePage clear">
<h1>Welcome to Weather Report 🌤️</h1>
<p>Type a city on the Weather Report page to see 3 days past &amp; future weather.</p>
<div class="mt-3"><a class="btn btn-primary btn-lg" href="/weather">Go to Weather</a></div>
<div class="featured">{featured}</div>
</div>"#
    );
    layout(Page::Home, "Weather App", "", &body)
}

/// Serializes a figure for inline `<script>` use
fn figure_json(figure: &Figure) -> String {
    match serde_json::to_string(figure) {
        Ok(json) => json.replace("</", r"<\/"),
        Err(e) => {
            warn!("Failed to serialize figure: {}", e);
            r#"{"data":[],"layout":{}}"#.to_string()
        }
    }
}

fn input_form(inputs: &Inputs, options: &DisplayOptions) -> String {
    let checked = |on: bool| if on { " checked" } else { "" };

    let mut units = String::new();
    for unit in [UnitSystem::Fahrenheit, UnitSystem::Celsius] {
        let _ = write!(
            units,
            r#"<label><input type="radio" name="unit" value="{0}"{1}> {0}</label>"#,
            unit.label(),
            checked(unit == inputs.unit)
        );
    }

    let mut params = String::new();
    for (param, name, label) in [
        (DisplayParam::Temperature, "temperature", "Temperature"),
        (DisplayParam::Rain, "rain", "Rain"),
        (DisplayParam::Humidity, "humidity", "Humidity"),
    ] {
        let _ = write!(
            params,
            r#"<label><input type="checkbox" name="{name}"{}> {label}</label>"#,
            checked(options.contains(param))
        );
    }

    format!(
        r#"<form class="inputs" method="get" action="/weather">
<div class="row"><div><label for="inputCity">City:</label><input id="inputCity" type="text" name="city" value="{}"></div>
<div><label for="inputCountry">Country:</label><input id="inputCountry" type="text" name="country" value="{}"></div></div>
<div class="row"><div id="TempSetting">{units}</div><div id="paramSettings">{params}</div></div>
<input type="hidden" name="submitted" value="1">
<button type="submit">Update</button>
</form>"#,
        escape_html(&inputs.city),
        escape_html(&inputs.country)
    )
}

fn plot(id: &str, figure: &Figure) -> String {
    format!(
        r#"<div id="{id}" class="graph"></div>
<script>(function(){{var f={};Plotly.newPlot("{id}",f.data,f.layout,{{responsive:true}});}})();</script>"#,
        figure_json(figure)
    )
}

#[must_use]
pub fn weather_page(inputs: &Inputs, options: &DisplayOptions, rendered: &RenderedDashboard) -> String {
    let body = format!(
        r#"<div class="weatherPage clear">
<h1>Weather Report</h1>
{}
<div id="weather-icon">{}</div>
<div id="GetWeather">{}</div>
{}
{}
<div id="summary-table">{}</div>
<div id="forecast-cards">{}</div>
</div>"#,
        input_form(inputs, options),
        rendered.current.icon_html(),
        rendered.current.to_html(),
        plot("place-map", &rendered.location_map),
        plot("hourly-chart", &rendered.hourly_chart),
        rendered.summary.to_html(),
        cards::strip_html(&rendered.forecast_cards)
    );
    let head = format!(r#"<script src="{PLOTLY_SRC}"></script>"#);
    layout(Page::Weather, "Weather Report", &head, &body)
}
