//! # Department Handlers (admin)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::non_blank;
use crate::constants::Role;
use crate::logging::log_database_operation;
use crate::models::{Course, Department, DepartmentSummary};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentRequest {
    pub dept_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseRef {
    pub course_id: String,
    pub course_name: String,
}

/// Department summary with its courses
#[derive(Debug, Serialize)]
pub struct DepartmentView {
    #[serde(flatten)]
    pub summary: DepartmentSummary,
    pub courses: Vec<CourseRef>,
}

async fn with_courses(state: &AppState, summary: DepartmentSummary) -> ApiResult<DepartmentView> {
    let courses = Course::list_by_department(state.pool(), summary.dept_id)
        .await?
        .into_iter()
        .map(|c| CourseRef {
            course_id: c.course_id,
            course_name: c.course_name,
        })
        .collect();

    Ok(DepartmentView { summary, courses })
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Query(query): Query<DepartmentQuery>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let name = non_blank(query.name);
    let mut departments = Vec::new();
    for summary in Department::list_summaries(state.pool(), name.as_deref()).await? {
        departments.push(with_courses(&state, summary).await?);
    }

    Ok(Json(json!({ "departments": departments })))
}

/// GET /api/departments/:dept_id
pub async fn get_department(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(dept_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let summary = Department::find_summary(state.pool(), dept_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;

    Ok(Json(json!({ "department": with_courses(&state, summary).await? })))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, &[Role::Admin])?;

    let dept_name = non_blank(request.dept_name)
        .ok_or_else(|| ApiError::bad_request("Department name is required"))?;
    let department = Department::create(state.pool(), &dept_name).await?;

    log_database_operation(
        "create",
        Some("departments"),
        Some(&department.dept_id.to_string()),
        "success",
        None,
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Department created successfully",
            "department": department,
        })),
    ))
}

/// PUT /api/departments/:dept_id
pub async fn update_department(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(dept_id): Path<i32>,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    Department::update(state.pool(), dept_id, non_blank(request.dept_name))
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;
    let summary = Department::find_summary(state.pool(), dept_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;

    info!(dept_id, "Department updated");

    Ok(Json(json!({
        "message": "Department updated successfully",
        "department": summary,
    })))
}

/// DELETE /api/departments/:dept_id
pub async fn delete_department(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(dept_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    if !Department::delete(state.pool(), dept_id).await? {
        return Err(ApiError::not_found("Department not found"));
    }

    log_database_operation(
        "delete",
        Some("departments"),
        Some(&dept_id.to_string()),
        "success",
        Some("courses and faculty detached"),
    );

    Ok(Json(json!({ "message": "Department deleted successfully" })))
}
