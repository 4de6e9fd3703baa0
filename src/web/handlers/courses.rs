//! # Course Handlers (admin)
//!
//! Request bodies accept `course_code` for `course_id` and `dept_id` for
//! `department_id`, so they are read as loose JSON objects.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{int_field, non_blank, text_field};
use crate::constants::Role;
use crate::logging::log_database_operation;
use crate::models::{Course, Department, NewCourse};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub name: Option<String>,
    /// Department id
    pub department: Option<String>,
}

/// First present value among `keys`
fn either<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|value| !value.is_null())
}

async fn ensure_department(state: &AppState, dept_id: Option<i32>) -> ApiResult<()> {
    if let Some(dept_id) = dept_id {
        Department::find_by_id(state.pool(), dept_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Department not found"))?;
    }
    Ok(())
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Query(query): Query<CourseQuery>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let department = match non_blank(query.department) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::bad_request("department must be an integer"))?,
        ),
        None => None,
    };
    let name = non_blank(query.name);

    let courses = Course::list_summaries(state.pool(), name.as_deref(), department).await?;
    Ok(Json(json!({ "courses": courses })))
}

/// GET /api/courses/:course_id
pub async fn get_course(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(course_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let course = Course::find_summary(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    Ok(Json(json!({ "course": course })))
}

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, &[Role::Admin])?;

    let course_id = text_field(either(&body, &["course_id", "course_code"]));
    let course_name = text_field(body.get("course_name"));
    let (Some(course_id), Some(course_name)) = (course_id, course_name) else {
        return Err(ApiError::bad_request("Course code and name are required"));
    };
    if course_id.chars().count() > 50 {
        return Err(ApiError::bad_request("Course code must be at most 50 characters"));
    }

    let department_id = int_field(either(&body, &["department_id", "dept_id"]), "department_id")?;
    ensure_department(&state, department_id).await?;

    if Course::find_by_id(state.pool(), &course_id).await?.is_some() {
        return Err(ApiError::conflict(format!("Course {course_id} already exists")));
    }

    let course = Course::create(
        state.pool(),
        NewCourse {
            course_id,
            course_name,
            department_id,
        },
    )
    .await?;
    let summary = Course::find_summary(state.pool(), &course.course_id).await?;

    log_database_operation("create", Some("courses"), Some(&course.course_id), "success", None);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Course created successfully",
            "course": summary,
        })),
    ))
}

/// PUT /api/courses/:course_id
pub async fn update_course(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(course_id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let course_name = text_field(body.get("course_name"));
    let department_id = int_field(either(&body, &["department_id", "dept_id"]), "department_id")?;
    ensure_department(&state, department_id).await?;

    Course::update(state.pool(), &course_id, course_name, department_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    let summary = Course::find_summary(state.pool(), &course_id).await?;

    log_database_operation("update", Some("courses"), Some(&course_id), "success", None);

    Ok(Json(json!({
        "message": "Course updated successfully",
        "course": summary,
    })))
}

/// DELETE /api/courses/:course_id
pub async fn delete_course(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(course_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let deleted = Course::delete(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    log_database_operation(
        "delete",
        Some("courses"),
        Some(&deleted.course_id),
        "success",
        Some("units, questions and mappings cascaded"),
    );

    Ok(Json(json!({
        "message": "Course deleted successfully",
        "deleted_course": {
            "course_id": deleted.course_id,
            "course_name": deleted.course_name,
        },
    })))
}
