//! # Faculty Handlers (admin)
//!
//! Faculty profiles are created together with (or linked to) a faculty login
//! account inside one transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{int_field, non_blank, text_field};
use crate::constants::Role;
use crate::logging::log_database_operation;
use crate::models::{
    split_full_name, Course, CourseWithDepartment, Department, Faculty, FacultyDepartment,
    NewFaculty, NewUser, User, UserProfileUpdate,
};
use crate::web::auth::hash_password;
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FacultyQuery {
    pub f_id: Option<String>,
}

/// Faculty member with the courses assigned to them
#[derive(Debug, Serialize)]
pub struct FacultyView {
    pub f_id: String,
    pub name: String,
    pub email: String,
    pub departments: Vec<FacultyDepartment>,
    pub courses: Vec<CourseWithDepartment>,
    pub course_count: usize,
}

async fn faculty_view(state: &AppState, faculty: Faculty) -> ApiResult<FacultyView> {
    let departments = Faculty::course_departments(state.pool(), &faculty.f_id).await?;
    let courses = Course::list_for_faculty(state.pool(), &faculty.f_id).await?;

    Ok(FacultyView {
        f_id: faculty.f_id,
        name: faculty.name,
        email: faculty.email,
        departments,
        course_count: courses.len(),
        courses,
    })
}

async fn ensure_department(state: &AppState, dept_id: Option<i32>) -> ApiResult<()> {
    if let Some(dept_id) = dept_id {
        Department::find_by_id(state.pool(), dept_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Department not found"))?;
    }
    Ok(())
}

/// GET /api/faculty
pub async fn list_faculty(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Query(query): Query<FacultyQuery>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let f_id = non_blank(query.f_id);
    let mut faculty = Vec::new();
    for member in Faculty::list(state.pool(), f_id.as_deref()).await? {
        faculty.push(faculty_view(&state, member).await?);
    }

    Ok(Json(json!({ "faculty": faculty })))
}

/// GET /api/faculty/:f_id
pub async fn get_faculty(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(f_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let member = Faculty::find_by_id(state.pool(), &f_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty not found"))?;

    Ok(Json(json!({ "faculty": faculty_view(&state, member).await? })))
}

/// POST /api/faculty
pub async fn create_faculty(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, &[Role::Admin])?;

    let (Some(name), Some(email)) = (text_field(body.get("name")), text_field(body.get("email")))
    else {
        return Err(ApiError::bad_request("Name and email are required"));
    };
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty());
    let department_id = int_field(body.get("dept_id"), "dept_id")?;
    ensure_department(&state, department_id).await?;

    let mut tx = state.pool().begin().await?;

    let user = match User::find_by_email(&mut *tx, &email).await? {
        Some(existing) => {
            if Faculty::find_for_user(&mut *tx, existing.id, &existing.email)
                .await?
                .is_some()
            {
                return Err(ApiError::bad_request(
                    "A faculty profile already exists for this email",
                ));
            }
            existing
        }
        None => {
            let password = password.ok_or_else(|| {
                ApiError::bad_request("Password is required when creating a new faculty account")
            })?;
            let password_hash = hash_password(password).map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                ApiError::Internal
            })?;
            let (first_name, last_name) = split_full_name(&name);

            User::create(
                &mut *tx,
                NewUser {
                    username: email.clone(),
                    email: email.clone(),
                    password_hash,
                    role: Role::Faculty,
                    first_name,
                    last_name,
                    is_staff: false,
                },
            )
            .await?
        }
    };

    let f_id = Faculty::next_f_id(&mut *tx).await?;
    let faculty = Faculty::create(
        &mut *tx,
        NewFaculty {
            f_id,
            name,
            email,
            user_id: Some(user.id),
            department_id,
        },
    )
    .await?;

    tx.commit().await?;

    log_database_operation("create", Some("faculty"), Some(&faculty.f_id), "success", None);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Faculty created successfully",
            "faculty": faculty,
        })),
    ))
}

/// PUT /api/faculty/:f_id
pub async fn update_faculty(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(f_id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let name = text_field(body.get("name"));
    let email = text_field(body.get("email"));
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty());
    let department_id = int_field(body.get("dept_id"), "dept_id")?;
    ensure_department(&state, department_id).await?;

    let mut tx = state.pool().begin().await?;

    let faculty = Faculty::update(&mut *tx, &f_id, name, email.clone(), department_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty not found"))?;

    if let Some(user_id) = faculty.user_id {
        if email.is_some() {
            User::update_profile(
                &mut *tx,
                user_id,
                UserProfileUpdate {
                    email,
                    ..Default::default()
                },
            )
            .await?;
        }
        if let Some(password) = password {
            let password_hash = hash_password(password).map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                ApiError::Internal
            })?;
            User::set_password_hash(&mut *tx, user_id, &password_hash).await?;
            info!(f_id = %faculty.f_id, "Faculty password reset");
        }
    }

    tx.commit().await?;

    log_database_operation("update", Some("faculty"), Some(&faculty.f_id), "success", None);

    Ok(Json(json!({
        "message": "Faculty updated successfully",
        "faculty": faculty_view(&state, faculty).await?,
    })))
}

/// DELETE /api/faculty/:f_id
pub async fn delete_faculty(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(f_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, &[Role::Admin])?;

    let faculty = Faculty::find_by_id(state.pool(), &f_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty not found"))?;

    let mut tx = state.pool().begin().await?;
    Faculty::delete(&mut *tx, &faculty.f_id).await?;
    if let Some(user_id) = faculty.user_id {
        User::delete(&mut *tx, user_id).await?;
    }
    tx.commit().await?;

    log_database_operation(
        "delete",
        Some("faculty"),
        Some(&faculty.f_id),
        "success",
        Some("mappings and user account removed"),
    );

    Ok(Json(json!({ "message": "Faculty deleted successfully" })))
}
