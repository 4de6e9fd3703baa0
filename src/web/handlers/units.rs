//! # Unit Handlers (admin, faculty)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{non_blank, text_field, unit_number_field};
use crate::constants::Role;
use crate::logging::log_database_operation;
use crate::models::{Course, NewUnit, Unit};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

const UNIT_ROLES: &[Role] = &[Role::Admin, Role::Faculty];

#[derive(Debug, Default, Deserialize)]
pub struct UnitQuery {
    pub course_id: Option<String>,
    pub unit_name: Option<String>,
}

/// GET /api/units
pub async fn list_units(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Query(query): Query<UnitQuery>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, UNIT_ROLES)?;

    let course_id = non_blank(query.course_id);
    let unit_name = non_blank(query.unit_name);
    let units = Unit::list(state.pool(), course_id.as_deref(), unit_name.as_deref()).await?;

    Ok(Json(json!({ "units": units })))
}

/// POST /api/units
pub async fn create_unit(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, UNIT_ROLES)?;

    let course_id = text_field(body.get("course_id"));
    let unit_id = unit_number_field(body.get("unit_id"), "unit_id")?;
    let unit_name = text_field(body.get("unit_name"));
    let (Some(course_id), Some(unit_id), Some(unit_name)) = (course_id, unit_id, unit_name) else {
        return Err(ApiError::bad_request("course_id, unit_id and unit_name are required"));
    };

    Course::find_by_id(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let unit = Unit::create(
        state.pool(),
        NewUnit {
            unit_id,
            unit_name,
            course_id,
        },
    )
    .await
    .map_err(|e| match ApiError::from(e) {
        ApiError::Conflict { .. } => {
            ApiError::conflict(format!("Unit {unit_id} already exists for this course"))
        }
        other => other,
    })?;

    log_database_operation("create", Some("units"), Some(&unit.id.to_string()), "success", None);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Unit created successfully",
            "unit": unit,
        })),
    ))
}

/// PUT /api/units/:id
pub async fn update_unit(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, UNIT_ROLES)?;

    let unit_id = unit_number_field(body.get("unit_id"), "unit_id")?;
    let unit_name = text_field(body.get("unit_name"));

    let unit = Unit::update(state.pool(), id, unit_id, unit_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Unit not found"))?;

    Ok(Json(json!({
        "message": "Unit updated successfully",
        "unit": unit,
    })))
}

/// DELETE /api/units/:id
pub async fn delete_unit(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    require_role(&ctx, UNIT_ROLES)?;

    if !Unit::delete(state.pool(), id).await? {
        return Err(ApiError::not_found("Unit not found"));
    }

    log_database_operation("delete", Some("units"), Some(&id.to_string()), "success", None);
    Ok(StatusCode::NO_CONTENT)
}
