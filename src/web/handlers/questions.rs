//! # Question Handlers (admin, faculty)
//!
//! Question CRUD, filtered listings, image upload and bank statistics.
//! Unit references in request bodies and filters are unit numbers within the
//! question's course; the matching unit row is created on first use.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    current_user, faculty_profile, int_field, non_blank, text_field, unit_number_field,
};
use crate::constants::{question_defaults, DifficultyLevel, QuestionType, Role};
use crate::logging::{log_database_operation, log_error};
use crate::models::{
    Course, FacultyCourse, NewQuestion, Question, QuestionDetail, QuestionMedia, QuestionStats,
    QuestionUpdate, Unit,
};
use crate::paper::images::inspect_image;
use crate::query_builder::{Pagination, PaginationMeta, QuestionFilter};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

const QUESTION_ROLES: &[Role] = &[Role::Admin, Role::Faculty];

/// Subdirectory of the media root holding uploaded question images
const IMAGE_DIR: &str = "question_images";

#[derive(Debug, Default, Deserialize)]
pub struct QuestionListQuery {
    pub course_id: Option<String>,
    /// Unit number
    pub unit_id: Option<String>,
    pub co: Option<String>,
    pub bt: Option<String>,
    pub marks: Option<String>,
    pub difficulty_level: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<QuestionDetail>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuestionsRequest {
    #[serde(default)]
    pub unit_numbers: Vec<Value>,
    #[serde(default)]
    pub cos: Vec<String>,
    #[serde(default)]
    pub bts: Vec<String>,
    #[serde(default)]
    pub marks: Vec<Value>,
}

/// Row of `GET /courses/:course_id/questions`
#[derive(Debug, Serialize)]
pub struct CourseQuestionRow {
    pub q_id: i32,
    pub text: String,
    pub course_id: String,
    pub course_name: String,
    pub unit_id: i32,
    pub unit_name: String,
    pub co: String,
    pub bt: String,
    pub marks: i32,
    pub difficulty_level: DifficultyLevel,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub has_image: bool,
    pub has_equations: bool,
}

impl From<QuestionDetail> for CourseQuestionRow {
    fn from(detail: QuestionDetail) -> Self {
        let has_image = detail.has_image();
        let has_equations = detail.has_equations();
        Self {
            q_id: detail.q_id,
            text: detail.text,
            course_id: detail.course_id,
            course_name: detail.course_name,
            unit_id: detail.unit_id,
            unit_name: detail.unit_name,
            co: detail.co,
            bt: detail.bt,
            marks: detail.marks,
            difficulty_level: detail.difficulty_level,
            question_type: detail.question_type,
            has_image,
            has_equations,
        }
    }
}

/// Row of `POST /courses/:course_id/filter-questions`
#[derive(Debug, Serialize)]
pub struct FilteredQuestion {
    pub id: i32,
    pub text: String,
    pub marks: i32,
    pub co: String,
    pub bt: String,
    pub unit_id: i32,
    pub unit_name: String,
    pub image_paths: Vec<String>,
    pub equations: Vec<Value>,
}

impl From<QuestionDetail> for FilteredQuestion {
    fn from(detail: QuestionDetail) -> Self {
        let image_paths = detail.image_path_list();
        let equations = detail.equation_list();
        Self {
            id: detail.q_id,
            text: detail.text,
            marks: detail.marks,
            co: detail.co,
            bt: detail.bt,
            unit_id: detail.unit_id,
            unit_name: detail.unit_name,
            image_paths,
            equations,
        }
    }
}

fn parse_query_int<T: std::str::FromStr>(raw: Option<String>, field: &str) -> ApiResult<Option<T>> {
    match non_blank(raw) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{field} must be an integer"))),
        None => Ok(None),
    }
}

fn int_list(values: &[Value], field: &str) -> ApiResult<Vec<i32>> {
    let mut parsed = Vec::with_capacity(values.len());
    for value in values {
        if let Some(n) = int_field(Some(value), field)? {
            parsed.push(n);
        }
    }
    Ok(parsed)
}

fn optional_enum<T>(value: Option<&Value>) -> ApiResult<Option<T>>
where
    T: std::str::FromStr<Err = crate::error::QbankError>,
{
    match text_field(value) {
        Some(raw) => Ok(Some(raw.parse::<T>()?)),
        None => Ok(None),
    }
}

/// `media` entries as `(image_paths, equations)` pairs
fn media_entries(value: Option<&Value>) -> ApiResult<Option<Vec<(Option<Value>, Option<Value>)>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let field = |name: &str| item.get(name).filter(|v| !v.is_null()).cloned();
                match (field("image_paths"), field("equations")) {
                    (Some(paths), _) if !paths.is_array() => {
                        Err(ApiError::bad_request("media image_paths must be a list"))
                    }
                    (_, Some(equations)) if !equations.is_array() => {
                        Err(ApiError::bad_request("media equations must be a list"))
                    }
                    pair => Ok(pair),
                }
            })
            .collect::<ApiResult<Vec<_>>>()
            .map(Some),
        Some(_) => Err(ApiError::bad_request("media must be a list")),
    }
}

/// Faculty may only write questions for courses assigned to them
async fn ensure_course_access(
    state: &AppState,
    ctx: &SecurityContext,
    course_id: &str,
) -> ApiResult<()> {
    if ctx.is_admin() {
        return Ok(());
    }

    let user = current_user(state, ctx).await?;
    let profile = faculty_profile(state, &user)
        .await?
        .ok_or_else(|| ApiError::authorization_error("No faculty profile found"))?;

    if !FacultyCourse::exists(state.pool(), &profile.f_id, course_id).await? {
        warn!(f_id = %profile.f_id, course_id, "Question write for unassigned course");
        return Err(ApiError::authorization_error(
            "You can only add questions to courses assigned to you",
        ));
    }
    Ok(())
}

/// GET /api/questions
pub async fn list_questions(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Query(query): Query<QuestionListQuery>,
) -> ApiResult<Json<QuestionPage>> {
    require_role(&ctx, QUESTION_ROLES)?;

    let mut filter = QuestionFilter::new();
    filter.course_id = non_blank(query.course_id);
    filter.unit_numbers.extend(parse_query_int::<i32>(query.unit_id, "unit_id")?);
    filter.cos.extend(non_blank(query.co));
    filter.bts.extend(non_blank(query.bt));
    filter.marks.extend(parse_query_int::<i32>(query.marks, "marks")?);
    if let Some(level) = non_blank(query.difficulty_level) {
        filter.difficulty_levels.push(level.parse()?);
    }
    if let Some(question_type) = non_blank(query.question_type) {
        filter.question_types.push(question_type.parse()?);
    }

    let pagination = Pagination::from_request(
        parse_query_int::<u32>(query.page, "page")?,
        parse_query_int::<u32>(query.per_page, "per_page")?,
        state.config.pagination.default_per_page,
        state.config.pagination.max_per_page,
    );

    let (questions, total) = Question::search(state.pool(), &filter, Some(&pagination)).await?;

    Ok(Json(QuestionPage {
        questions,
        pagination: pagination.meta(total),
    }))
}

/// GET /api/questions/:q_id
pub async fn get_question(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(q_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    let question = Question::find_detail(state.pool(), q_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;

    Ok(Json(json!({ "question": question })))
}

/// POST /api/questions
pub async fn create_question(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_role(&ctx, QUESTION_ROLES)?;

    let course_id = text_field(body.get("course_id"))
        .ok_or_else(|| ApiError::bad_request("course_id is required"))?;
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Question text is required"))?
        .to_string();
    let unit_number = unit_number_field(body.get("unit_id"), "unit_id")?
        .unwrap_or(question_defaults::UNIT_NUMBER);
    let marks = int_field(body.get("marks"), "marks")?.unwrap_or(question_defaults::MARKS);
    let difficulty_level = optional_enum::<DifficultyLevel>(body.get("difficulty_level"))?
        .unwrap_or(DifficultyLevel::Medium);
    let question_type = optional_enum::<QuestionType>(body.get("type"))?.unwrap_or_default();
    let tags = match body.get("tags") {
        None | Some(Value::Null) => json!({}),
        Some(tags) => tags.clone(),
    };
    let media = media_entries(body.get("media"))?.unwrap_or_default();

    Course::find_by_id(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    ensure_course_access(&state, &ctx, &course_id).await?;

    let mut tx = state.pool().begin().await?;

    let unit = Unit::find_or_create(&mut *tx, &course_id, unit_number).await?;
    let question = Question::create(
        &mut *tx,
        NewQuestion {
            course_id,
            unit_pk: unit.id,
            text,
            co: text_field(body.get("co")).unwrap_or_else(|| question_defaults::CO.to_string()),
            bt: text_field(body.get("bt")).unwrap_or_else(|| question_defaults::BT.to_string()),
            marks,
            question_type,
            difficulty_level,
            tags,
        },
    )
    .await?;
    QuestionMedia::replace_for_question(&mut *tx, question.q_id, &media).await?;

    tx.commit().await?;

    log_database_operation(
        "create",
        Some("questions"),
        Some(&question.q_id.to_string()),
        "success",
        Some(&format!("course {} unit {}", question.course_id, unit.unit_id)),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Question created successfully",
            "q_id": question.q_id,
        })),
    ))
}

/// PUT /api/questions/:q_id
pub async fn update_question(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(q_id): Path<i32>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    let existing = Question::find_by_id(state.pool(), q_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;

    let unit_number = unit_number_field(body.get("unit_id"), "unit_id")?;
    let text = match body.get("text") {
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(ApiError::bad_request("Question text cannot be empty"));
        }
        Some(Value::String(text)) => Some(text.trim().to_string()),
        _ => None,
    };
    let mut update = QuestionUpdate {
        text,
        co: text_field(body.get("co")),
        bt: text_field(body.get("bt")),
        marks: int_field(body.get("marks"), "marks")?,
        question_type: optional_enum(body.get("type"))?,
        difficulty_level: optional_enum(body.get("difficulty_level"))?,
        tags: body.get("tags").filter(|t| !t.is_null()).cloned(),
        ..Default::default()
    };
    let media = media_entries(body.get("media"))?;

    let mut tx = state.pool().begin().await?;

    if let Some(unit_number) = unit_number {
        let unit = Unit::find_or_create(&mut *tx, &existing.course_id, unit_number).await?;
        update.unit_pk = Some(unit.id);
    }
    Question::update(&mut *tx, q_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;
    if let Some(media) = media {
        QuestionMedia::replace_for_question(&mut *tx, q_id, &media).await?;
    }

    tx.commit().await?;

    log_database_operation("update", Some("questions"), Some(&q_id.to_string()), "success", None);

    let question = Question::find_detail(state.pool(), q_id).await?;
    Ok(Json(json!({
        "message": "Question updated successfully",
        "question": question,
    })))
}

/// DELETE /api/questions/:q_id
pub async fn delete_question(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(q_id): Path<i32>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    if !Question::delete(state.pool(), q_id).await? {
        return Err(ApiError::not_found("Question not found"));
    }

    log_database_operation("delete", Some("questions"), Some(&q_id.to_string()), "success", None);
    Ok(Json(json!({ "message": "Question deleted successfully" })))
}

/// POST /api/questions/:q_id/image (multipart field `image`)
pub async fn upload_question_image(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(q_id): Path<i32>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    Question::find_by_id(state.pool(), q_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Question not found"))?;

    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("image") {
            image = Some(field.bytes().await.map_err(multipart_error)?);
            break;
        }
    }
    let bytes = image.ok_or_else(|| ApiError::bad_request("No image file provided"))?;

    let info = inspect_image(&bytes)
        .ok_or_else(|| ApiError::bad_request("Only PNG, JPEG and GIF images are accepted"))?;

    let relative_path = format!(
        "{IMAGE_DIR}/q{q_id}_{}.{}",
        Uuid::new_v4().simple(),
        info.format.extension()
    );
    let target = state.images.root().join(&relative_path);
    store_upload(&target, &bytes, record_image(&state, q_id, &relative_path)).await?;

    info!(
        q_id,
        path = %relative_path,
        width = info.width_px,
        height = info.height_px,
        "Question image stored"
    );

    Ok(Json(json!({
        "message": "Image uploaded successfully",
        "image_path": relative_path,
    })))
}

async fn record_image(state: &AppState, q_id: i32, relative_path: &str) -> ApiResult<()> {
    let mut tx = state.pool().begin().await?;
    Question::set_image(&mut *tx, q_id, relative_path).await?;
    QuestionMedia::append_image_path(&mut *tx, q_id, relative_path).await?;
    tx.commit().await?;
    Ok(())
}

/// Write the file, then run `record`. A failed `record` removes the file again.
async fn store_upload<F>(target: &std::path::Path, bytes: &[u8], record: F) -> ApiResult<()>
where
    F: std::future::Future<Output = ApiResult<()>>,
{
    let io_failure = |e: std::io::Error| {
        log_error(
            "questions",
            "upload_image",
            &e.to_string(),
            Some(&target.display().to_string()),
        );
        ApiError::Internal
    };
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_failure)?;
    }
    tokio::fs::write(target, bytes).await.map_err(io_failure)?;

    if let Err(e) = record.await {
        if let Err(cleanup) = tokio::fs::remove_file(target).await {
            warn!(
                error = %cleanup,
                path = %target.display(),
                "Could not remove image left by a failed upload"
            );
        }
        return Err(e);
    }
    Ok(())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Uploaded file exceeds the size limit")
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// GET /api/courses/:course_id/questions
pub async fn course_questions(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(course_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    let course = Course::find_summary(state.pool(), &course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let filter = QuestionFilter::new().course(course_id);
    let (questions, _) = Question::search(state.pool(), &filter, None).await?;
    let questions: Vec<CourseQuestionRow> = questions.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "course": {
            "course_id": course.course_id,
            "course_name": course.course_name,
            "unit_count": course.unit_count,
            "question_count": course.question_count,
        },
        "questions": questions,
    })))
}

/// POST /api/courses/:course_id/filter-questions
pub async fn filter_questions(
    State(state): State<AppState>,
    ctx: SecurityContext,
    Path(course_id): Path<String>,
    ApiJson(request): ApiJson<FilterQuestionsRequest>,
) -> ApiResult<Json<Value>> {
    require_role(&ctx, QUESTION_ROLES)?;

    let mut filter = QuestionFilter::new().course(course_id);
    filter.unit_numbers = int_list(&request.unit_numbers, "unit_numbers")?;
    filter.marks = int_list(&request.marks, "marks")?;
    filter.cos = request.cos;
    filter.bts = request.bts;

    let (questions, _) = Question::search(state.pool(), &filter, None).await?;
    let questions: Vec<FilteredQuestion> = questions.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "questions": questions })))
}

/// GET /api/question-stats
pub async fn question_stats(
    State(state): State<AppState>,
    ctx: SecurityContext,
) -> ApiResult<Json<QuestionStats>> {
    require_role(&ctx, &[Role::Admin])?;
    Ok(Json(QuestionStats::load(state.pool()).await?))
}
