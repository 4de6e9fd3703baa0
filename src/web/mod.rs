//! # Web API Module
//!
//! Axum-based REST API for the question bank.
//!
//! ## Core Components
//!
//! - [`routes`] - HTTP route definitions
//! - [`handlers`] - Request handlers per resource
//! - [`middleware`] - Token authentication and request ids
//! - [`auth`] - JWT issuing/validation and password hashing
//! - [`security`] - Per-request identity and role checks
//! - [`response_types`] - [`ApiError`](response_types::ApiError) and its JSON body
//! - [`state`] - Shared application state

pub mod auth;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response_types;
pub mod routes;
pub mod security;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use state::AppState;

/// Create the main Axum application with all routes and middleware
///
/// - Public routes: health checks and `/api/login`
/// - Protected routes: everything else under `/api`, behind token authentication
/// - Request ids, request timeout, CORS, HTTP tracing and the upload size limit
pub fn create_app(app_state: AppState) -> Router {
    let request_timeout = app_state.config.web.request_timeout();
    let body_limit = app_state.config.web.max_upload_bytes();
    let cors = cors_layer(&app_state.config.web.cors_allowed_origins);

    let public_routes = Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::public_api_routes());

    let protected_routes = Router::new()
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::authenticate_request,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(
            middleware::request_id::add_request_id,
        ))
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Any origin when none are configured, otherwise exactly the configured ones
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
