//! # Health Check Handlers
//!
//! Liveness and readiness endpoints for load balancers. Both are public.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::database::connection::health_check;
use crate::web::response_types::ApiError;
use crate::web::state::AppState;

/// Basic health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    pub duration_ms: u64,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests.
pub async fn basic_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness probe: GET /health/ready
///
/// Ready only while the database answers `SELECT 1`.
pub async fn readiness_probe(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    debug!("Performing readiness probe");
    let start = std::time::Instant::now();

    match health_check(state.pool()).await {
        Ok(true) => Ok(Json(ReadinessResponse {
            status: "ready".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            database: "healthy".to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })),
        Ok(false) => {
            error!("Readiness probe failed: database returned an unexpected result");
            Err(ApiError::ServiceUnavailable)
        }
        Err(e) => {
            error!(error = %e, "Readiness probe failed: database unreachable");
            Err(ApiError::ServiceUnavailable)
        }
    }
}
