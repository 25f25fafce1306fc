//! HTTP server for the Morning Buddy web app.
//!
//! Serves the single-page UI and the JSON endpoints behind its four views.

use crate::buddy::{Buddy, NewsOutcome, Reply};
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared application state.
pub struct AppState {
    buddy: Buddy,
}

impl AppState {
    pub fn new(buddy: Buddy) -> Self {
        Self { buddy }
    }
}

/// Run the web app server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'morning-buddy doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let buddy = Buddy::new(&settings, &credentials)?;
    let app = router(Arc::new(AppState::new(buddy)));

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Morning Buddy");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("App", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Quote", "GET  /api/quote");
    Output::kv("Weather", "POST /api/weather");
    Output::kv("News", "POST /api/news");
    Output::kv("Summary", "POST /api/news/summary");
    Output::kv("Planner", "POST /api/plan");
    println!();
    Output::info("Press Ctrl+C to stop the server.");
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/quote", get(quote))
        .route("/api/weather", post(weather))
        .route("/api/news", post(news))
        .route("/api/news/summary", post(summary))
        .route("/api/plan", post(plan))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct CityRequest {
    #[serde(default)]
    city: String,
}

#[derive(Deserialize)]
struct TopicRequest {
    #[serde(default)]
    topic: String,
}

#[derive(Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    url: String,
}

#[derive(Serialize)]
struct ReplyBody {
    ok: bool,
    text: String,
}

#[derive(Serialize)]
struct QuoteResponse {
    quote: &'static str,
}

fn reply_response(reply: Reply) -> Response {
    let status = match reply {
        Reply::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    let body = ReplyBody {
        ok: reply.is_ok(),
        text: reply.text().to_string(),
    };
    (status, Json(body)).into_response()
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn quote(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(QuoteResponse {
        quote: state.buddy.quote(),
    })
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CityRequest>,
) -> Response {
    reply_response(state.buddy.weather_report(&req.city).await)
}

async fn news(State(state): State<Arc<AppState>>, Json(req): Json<TopicRequest>) -> Response {
    let outcome = state.buddy.latest_news(&req.topic).await;
    let status = match outcome {
        NewsOutcome::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (status, Json(outcome)).into_response()
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummaryRequest>,
) -> Response {
    reply_response(state.buddy.summarize_article(&req.url).await)
}

async fn plan(State(state): State<Arc<AppState>>, Json(req): Json<CityRequest>) -> Response {
    reply_response(state.buddy.day_plan(&req.city).await)
}
