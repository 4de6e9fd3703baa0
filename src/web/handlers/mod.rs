//! # Web API Handlers
//!
//! Request handlers grouped by resource. Handlers check roles through
//! [`require_role`](crate::web::security::require_role) and return
//! [`ApiError`] on failure.

pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod faculty;
pub mod faculty_courses;
pub mod health;
pub mod papers;
pub mod questions;
pub mod units;
pub mod users;

use serde_json::Value;

use crate::models::{Faculty, User};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::SecurityContext;
use crate::web::state::AppState;

/// Read an optional integer sent as a JSON number or numeric string.
/// `null` and blank strings count as absent.
pub(crate) fn int_field(value: Option<&Value>, field: &str) -> ApiResult<Option<i32>> {
    let invalid = || ApiError::bad_request(format!("{field} must be an integer"));
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// [`int_field`] for unit numbers, which start at 1
pub(crate) fn unit_number_field(value: Option<&Value>, field: &str) -> ApiResult<Option<i32>> {
    match int_field(value, field)? {
        Some(n) if n < 1 => Err(ApiError::bad_request(format!(
            "{field} must be a positive integer"
        ))),
        other => Ok(other),
    }
}

/// Read an optional identifier sent as a string or number, trimmed; blank is absent
pub(crate) fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Trimmed non-empty string, or `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) async fn current_user(state: &AppState, ctx: &SecurityContext) -> ApiResult<User> {
    User::find_by_id(state.pool(), ctx.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)
}

/// Faculty profile of the calling user, if one exists
pub(crate) async fn faculty_profile(state: &AppState, user: &User) -> ApiResult<Option<Faculty>> {
    Ok(Faculty::find_for_user(state.pool(), user.id, &user.email).await?)
}
