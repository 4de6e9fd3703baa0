//! # Dashboard Handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::{current_user, faculty_profile};
use crate::constants::Role;
use crate::models::{AdminDashboard, Course, Unit};
use crate::web::response_types::ApiResult;
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardCourse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub units: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FacultyDashboard {
    pub faculty_id: Option<String>,
    pub name: String,
    pub email: String,
    pub courses: Vec<DashboardCourse>,
}

/// Counts and analytics: GET /api/admin-dashboard
pub async fn admin_dashboard(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<AdminDashboard>> {
    require_role(&ctx, &[Role::Admin])?;
    Ok(Json(AdminDashboard::load(state.pool()).await?))
}

/// Assigned courses with their units: GET /api/faculty-dashboard
pub async fn faculty_dashboard(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<FacultyDashboard>> {
    require_role(&ctx, &[Role::Faculty])?;
    let user = current_user(&state, &ctx).await?;

    let Some(profile) = faculty_profile(&state, &user).await? else {
        return Ok(Json(FacultyDashboard {
            faculty_id: None,
            name: user.display_name(),
            email: user.email,
            courses: Vec::new(),
        }));
    };

    let mut courses = Vec::new();
    for course in Course::list_for_faculty(state.pool(), &profile.f_id).await? {
        let units = Unit::names_for_course(state.pool(), &course.course_id).await?;
        courses.push(DashboardCourse {
            id: course.course_id.clone(),
            code: course.course_id,
            name: course.course_name,
            units,
        });
    }

    Ok(Json(FacultyDashboard {
        faculty_id: Some(profile.f_id),
        name: profile.name,
        email: profile.email,
        courses,
    }))
}
