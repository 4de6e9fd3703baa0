//! # Authentication Middleware
//!
//! Validates the request's token, confirms its session is still live and the
//! account active, then injects a [`SecurityContext`] for per-handler role checks.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::models::{AuthSession, User};
use crate::web::auth::JwtAuthenticator;
use crate::web::response_types::ApiError;
use crate::web::security::SecurityContext;
use crate::web::state::AppState;

pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            warn!("Authorization header contains non-UTF-8 bytes");
            ApiError::auth_error("Malformed Authorization header")
        })?),
        None => None,
    };

    let token = JwtAuthenticator::extract_token(header).map_err(|e| {
        debug!(error = %e, "Request without usable credentials");
        ApiError::Unauthorized
    })?;

    let claims = state
        .authenticator
        .validate_user_token(token)
        .map_err(|_| ApiError::auth_error("Invalid or expired token"))?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::auth_error("Invalid or expired token"))?;

    if AuthSession::find_active(state.pool(), claims.sid, user_id)
        .await?
        .is_none()
    {
        warn!(user_id, session_id = %claims.sid, "Token presented for a closed session");
        return Err(ApiError::auth_error("Session has ended"));
    }

    let user = User::find_by_id(state.pool(), user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::auth_error("Account is inactive or no longer exists"))?;

    request.extensions_mut().insert(SecurityContext {
        user_id: user.id,
        role: user.role,
        session_id: claims.sid,
    });

    Ok(next.run(request).await)
}
