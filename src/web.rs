use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, header},
    response::{AppendHeaders, Html, IntoResponse, Json},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api::{self, WeatherQuery};
use crate::config::{DefaultsConfig, ServerConfig};
use crate::dashboard::{Dashboard, SessionStores, ViewModelStore};
use crate::pages;
use crate::present;

const STYLESHEET: &str = include_str!("../assets/style.css");

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    pub sessions: Arc<SessionStores>,
    pub defaults: Arc<DefaultsConfig>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, defaults: DefaultsConfig) -> Self {
        Self {
            dashboard,
            sessions: Arc::new(SessionStores::default()),
            defaults: Arc::new(defaults),
        }
    }

    /// The caller's store, plus a `Set-Cookie` header when a session was
    /// started by this request
    pub async fn session(&self, headers: &HeaderMap) -> (Arc<ViewModelStore>, SetSession) {
        match session_id(headers) {
            Some(id) => (self.sessions.store(id).await, AppendHeaders(None)),
            None => {
                let id = Uuid::new_v4();
                let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
                (
                    self.sessions.store(id).await,
                    AppendHeaders(Some((header::SET_COOKIE, cookie))),
                )
            }
        }
    }
}

pub const SESSION_COOKIE: &str = "weather_session";

pub type SetSession = AppendHeaders<Option<(HeaderName, String)>>;

/// Session id from the `Cookie` header; malformed ids are ignored
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/weather", get(weather))
        .route("/health", get(health))
        .route("/assets/style.css", get(stylesheet))
        .nest("/api", api::router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Html<String> {
    Html(pages::home_page())
}

async fn weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeatherQuery>,
) -> impl IntoResponse {
    let inputs = query.inputs(&state.defaults);
    let options = query.display_options();

    let (store, set_session) = state.session(&headers).await;
    let view_model = store.refresh(&state.dashboard, &inputs).await;
    let rendered = present::render_all(&view_model, &options);

    (set_session, Html(pages::weather_page(&inputs, &options, &rendered)))
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// Serves until ctrl-c
pub async fn run(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://localhost:{}", config.port);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
