//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::store::StrategyStore;
use crate::engine::ExecutionEngine;
use crate::metrics::Metrics;
use crate::models::trade::EvaluationOutcome;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Option<Arc<ExecutionEngine>>,
    pub store: Option<Arc<dyn StrategyStore>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "tradewind-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Manual refresh: run one evaluation cycle for a user and return the
/// outcome of every strategy evaluated.
async fn evaluate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<EvaluationOutcome>>, StatusCode> {
    let engine = state.engine.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let outcomes = engine.evaluate_user(&user_id).await.map_err(|e| {
        error!(user = %user_id, error = %e, "Failed to run evaluation cycle");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(outcomes))
}

/// List a user's active strategies.
async fn list_strategies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = state.store.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let strategies = store.active_strategies(&user_id).await.map_err(|e| {
        error!(user = %user_id, error = %e, "Failed to load strategies");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!(strategies)))
}

#[derive(Debug, Deserialize)]
struct TradeQuery {
    /// Trailing window in hours, default 24.
    hours: Option<i64>,
}

/// List a user's trades within a trailing window.
async fn list_trades(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<TradeQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = state.store.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let hours = params.hours.unwrap_or(24).max(0);
    let cutoff = chrono::Utc::now() - chrono::Duration::hours(hours);
    let trades = store.trades_since(&user_id, cutoff).await.map_err(|e| {
        error!(user = %user_id, error = %e, "Failed to load trades");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!(trades)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/users/{user_id}/evaluate", post(evaluate_user))
        .route("/api/users/{user_id}/strategies", get(list_strategies))
        .route("/api/users/{user_id}/trades", get(list_trades))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
