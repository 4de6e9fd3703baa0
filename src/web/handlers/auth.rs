//! # Authentication Handlers
//!
//! Login, logout and the caller's own profile.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{current_user, faculty_profile, non_blank};
use crate::constants::Role;
use crate::logging::log_auth_event;
use crate::models::{AuthSession, Course, Faculty, User, UserProfileUpdate};
use crate::web::auth::verify_password;
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::SecurityContext;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address of the account
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Faculty display name; ignored for admins
    pub name: Option<String>,
}

/// Issue a token: POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (non_blank(request.username), request.password) else {
        return Err(ApiError::bad_request("Please provide both username and password"));
    };
    if password.is_empty() {
        return Err(ApiError::bad_request("Please provide both username and password"));
    }

    let user = match User::find_by_email(state.pool(), &email).await? {
        Some(user) if user.is_active && verify_password(&password, &user.password_hash) => user,
        _ => {
            log_auth_event("login", None, Some(&email), "rejected");
            return Err(ApiError::auth_error("Invalid credentials"));
        }
    };

    let expires_at = state.authenticator.expiry_from_now();
    let session = AuthSession::create(state.pool(), user.id, expires_at).await?;
    let token = state
        .authenticator
        .generate_user_token(user.id, user.role, session.session_id, expires_at)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::Internal
        })?;
    User::touch_last_login(state.pool(), user.id).await?;

    let name = match user.role {
        Role::Faculty => faculty_profile(&state, &user)
            .await?
            .map(|f| f.name)
            .unwrap_or_else(|| user.display_name()),
        Role::Admin => user.display_name(),
    };

    log_auth_event("login", Some(user.id), Some(&user.email), "success");

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            email: user.email,
            role: user.role,
            name,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    }))
}

/// End the current session: POST /api/logout
pub async fn logout(State(state): State<AppState>, ctx: SecurityContext) -> ApiResult<Json<Value>> {
    AuthSession::delete(state.pool(), ctx.session_id).await?;
    log_auth_event("logout", Some(ctx.user_id), None, "success");

    Ok(Json(json!({ "message": "Successfully logged out" })))
}

/// End every session of the caller: POST /api/logout/all
pub async fn logout_all(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<Value>> {
    let closed = AuthSession::delete_all_for_user(state.pool(), ctx.user_id).await?;
    info!(user_id = ctx.user_id, sessions = closed, "Closed all sessions");
    log_auth_event("logout_all", Some(ctx.user_id), None, "success");

    Ok(Json(json!({
        "message": "Successfully logged out from all devices",
        "sessions_closed": closed,
    })))
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<Value>> {
    let user = current_user(&state, &ctx).await?;
    Ok(Json(profile_json(&state, &user).await?))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(request): ApiJson<ProfileUpdateRequest>,
) -> ApiResult<Json<Value>> {
    let user = current_user(&state, &ctx).await?;
    let email = non_blank(request.email);

    let mut tx = state.pool().begin().await?;

    let updated = User::update_profile(
        &mut *tx,
        user.id,
        UserProfileUpdate {
            first_name: request.first_name.map(|v| v.trim().to_string()),
            last_name: request.last_name.map(|v| v.trim().to_string()),
            email: email.clone(),
        },
    )
    .await?;

    if user.role == Role::Faculty {
        if let Some(profile) = Faculty::find_for_user(&mut *tx, user.id, &user.email).await? {
            Faculty::update(&mut *tx, &profile.f_id, non_blank(request.name), email, None).await?;
        }
    }

    tx.commit().await?;
    info!(user_id = user.id, "Profile updated");

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile_json(&state, &updated).await?,
    })))
}

async fn profile_json(state: &AppState, user: &User) -> ApiResult<Value> {
    if user.role == Role::Faculty {
        if let Some(profile) = faculty_profile(state, user).await? {
            let department = profile.department_name(state.pool()).await?;
            let courses: Vec<Value> = Course::list_for_faculty(state.pool(), &profile.f_id)
                .await?
                .into_iter()
                .map(|c| {
                    json!({
                        "course_id": c.course_id,
                        "course_name": c.course_name,
                        "department": c.department_name,
                    })
                })
                .collect();

            return Ok(json!({
                "id": user.id,
                "email": user.email,
                "name": profile.name,
                "role": user.role,
                "faculty_id": profile.f_id,
                "department": department,
                "courses": courses,
            }));
        }
    }

    Ok(json!({
        "id": user.id,
        "email": user.email,
        "name": user.display_name(),
        "role": user.role,
    }))
}
