// src/api/router.rs
// HTTP router composition for the page and the JSON API

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{
    health_handler, index_handler, login_handler, logout_handler, report_handler,
};
use crate::state::SharedState;

/// Screenplay uploads run well past the default body limit.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn app_router(state: SharedState, cors_origin: &str) -> Router {
    // Generation can block for minutes (retry waits included); the timeout
    // covers every route except the report one.
    let short_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    let report_routes = Router::new()
        .route("/api/report", post(report_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/", get(index_handler))
        .merge(short_routes)
        .merge(report_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => cors.allow_origin(tower_http::cors::Any),
    }
}
