use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    BoxError, Json, Router,
};
use serde_json::json;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::state::AppState;

use super::handlers;

const QUEUE_DEPTH: usize = 1024;
const REQUESTS_PER_SECOND: u64 = 200;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/hello", get(handlers::hello))
        .route("/shorten", post(handlers::shorten))
        .route("/user", post(handlers::user_urls))
        .route("/s/{short_id}", get(handlers::redirect));

    api.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(middleware_error))
            .layer(BufferLayer::new(QUEUE_DEPTH))
            .layer(RateLimitLayer::new(REQUESTS_PER_SECOND, Duration::from_secs(1))),
    )
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .latency_unit(LatencyUnit::Millis)
                    .level(Level::DEBUG),
            )
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
    .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
    .layer(CorsLayer::permissive())
    .layer(CompressionLayer::new())
    .with_state(state)
}

async fn middleware_error(err: BoxError) -> impl IntoResponse {
    tracing::error!(error = %err, "Middleware failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "details": err.to_string(),
        })),
    )
}
