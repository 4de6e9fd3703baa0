//! # Faculty-Course Mapping Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::{current_user, faculty_profile, text_field};
use crate::constants::Role;
use crate::logging::log_database_operation;
use crate::models::{Course, Faculty, FacultyCourse};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

/// GET /api/faculty-courses
///
/// Admins see every mapping; faculty see their own.
pub async fn list_mappings(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin, Role::Faculty])?;

    if ctx.is_admin() {
        let mappings = FacultyCourse::list_details(state.pool(), None).await?;
        return Ok(Json(json!({ "mappings": mappings })));
    }

    let user = current_user(&state, &ctx).await?;
    match faculty_profile(&state, &user).await? {
        Some(profile) => {
            let mappings = FacultyCourse::list_details(state.pool(), Some(&profile.f_id)).await?;
            Ok(Json(json!({ "mappings": mappings })))
        }
        None => Ok(Json(json!({
            "mappings": [],
            "message": "No faculty profile found",
        }))),
    }
}

/// POST /api/faculty-courses
pub async fn create_mapping(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, &[Role::Admin])?;

    let (Some(faculty_id), Some(course_id)) = (
        text_field(body.get("faculty_id")),
        text_field(body.get("course_id")),
    ) else {
        return Err(ApiError::bad_request("Both faculty_id and course_id are required"));
    };

    let faculty = Faculty::find_by_id(state.pool(), &faculty_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty not found"))?;
    let course = Course::find_by_id(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    if FacultyCourse::exists(state.pool(), &faculty.f_id, &course.course_id).await? {
        return Err(ApiError::conflict("Mapping already exists"));
    }

    FacultyCourse::create(state.pool(), &faculty.f_id, &course.course_id).await?;

    log_database_operation(
        "create",
        Some("faculty_courses"),
        Some(&format!("{}:{}", faculty.f_id, course.course_id)),
        "success",
        None,
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Faculty-course mapping created successfully",
            "mapping": {
                "faculty_id": faculty.f_id,
                "faculty_name": faculty.name,
                "course_id": course.course_id,
                "course_name": course.course_name,
            },
        })),
    ))
}

/// DELETE /api/faculty-courses/:faculty_id/:course_id
pub async fn delete_mapping(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path((faculty_id, course_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    if !FacultyCourse::delete(state.pool(), &faculty_id, &course_id).await? {
        return Err(ApiError::not_found("Mapping not found"));
    }

    log_database_operation(
        "delete",
        Some("faculty_courses"),
        Some(&format!("{faculty_id}:{course_id}")),
        "success",
        None,
    );

    Ok(Json(json!({ "message": "Faculty-course mapping deleted successfully" })))
}
