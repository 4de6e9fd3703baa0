//! # User Listing (admin)

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::Role;
use crate::models::{Course, CourseWithDepartment, Faculty, User};
use crate::web::response_types::ApiResult;
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<CourseWithDepartment>>,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<Vec<UserView>>> {
    require_role(&ctx, &[Role::Admin])?;

    let mut users = Vec::new();
    for user in User::list_all(state.pool()).await? {
        let (department, courses) = if user.role == Role::Faculty {
            match Faculty::find_for_user(state.pool(), user.id, &user.email).await? {
                Some(profile) => (
                    Some(profile.department_name(state.pool()).await?),
                    Some(Course::list_for_faculty(state.pool(), &profile.f_id).await?),
                ),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        users.push(UserView {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
            department,
            courses,
        });
    }

    Ok(Json(users))
}
