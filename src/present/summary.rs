//! Key/value table of the current reading

use serde::Serialize;
use std::fmt::Write as _;

use super::escape_html;
use crate::models::ViewModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SummaryTable {
    Rows(Vec<SummaryRow>),
    Unavailable,
}

pub fn render(view_model: &ViewModel) -> SummaryTable {
    let Some(view) = view_model.as_ready() else {
        return SummaryTable::Unavailable;
    };
    let now = view.current();

    SummaryTable::Rows(vec![
        SummaryRow {
            metric: "Location",
            value: format!(
                "{} {}",
                view.location.display_name,
                view.location.format_coordinates()
            ),
        },
        SummaryRow {
            metric: "Now – Temperature",
            value: format!("{:.1}{}", now.temperature, view.unit_symbol),
        },
        SummaryRow {
            metric: "Now – Humidity",
            value: format!("{:.0}%", now.relative_humidity),
        },
        SummaryRow {
            metric: "Now – Precip",
            value: view.format_precipitation(now.precipitation),
        },
    ])
}

impl SummaryTable {
    #[must_use]
    pub fn rows(&self) -> &[SummaryRow] {
        match self {
            Self::Rows(rows) => rows,
            Self::Unavailable => &[],
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let Self::Rows(rows) = self else {
            return "<div>No summary available.</div>".to_string();
        };

        let mut html = String::from(
            r#"<table class="table table-sm table-striped"><thead><tr><th>Metric</th><th>Value</th></tr></thead><tbody>"#,
        );
        for row in rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(row.metric),
                escape_html(&row.value)
            );
        }
        html.push_str("</tbody></table>");
        html
    }
}
