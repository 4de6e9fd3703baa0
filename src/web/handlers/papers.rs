//! # Paper Generation Handler (faculty)
//!
//! Validates a selection, renders it with [`assemble_paper`] on the blocking
//! pool, keeps a copy under the configured output directory and records the
//! paper and its selections.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{current_user, faculty_profile, int_field, non_blank};
use crate::constants::{PaperPart, Role, DOCX_CONTENT_TYPE};
use crate::logging::{log_error, log_paper_operation};
use crate::models::{NewPaperMetadata, PaperMetadata, Question, QuestionSelection};
use crate::paper::{assemble_paper, total_marks, PaperHeader, PaperQuestion};
use crate::web::extractors::ApiJson;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::security::{require_role, SecurityContext};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SelectedQuestions {
    #[serde(default)]
    pub part_a: Vec<i32>,
    #[serde(default)]
    pub part_b: Vec<i32>,
}

impl SelectedQuestions {
    /// `(question_id, part)` pairs, Part A first, in selection order
    pub fn ordered(&self) -> Vec<(i32, PaperPart)> {
        self.part_a
            .iter()
            .map(|id| (*id, PaperPart::A))
            .chain(self.part_b.iter().map(|id| (*id, PaperPart::B)))
            .collect()
    }

    /// First id selected more than once, across both parts
    pub fn first_duplicate(&self) -> Option<i32> {
        let mut seen = HashSet::new();
        self.part_a
            .iter()
            .chain(self.part_b.iter())
            .copied()
            .find(|id| !seen.insert(*id))
    }

    pub fn is_empty(&self) -> bool {
        self.part_a.is_empty() && self.part_b.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneratePaperRequest {
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub max_marks: Option<Value>,
    pub duration: Option<String>,
    pub semester: Option<Value>,
    #[serde(default)]
    pub is_improvement_cie: bool,
    #[serde(default)]
    pub selected_questions: SelectedQuestions,
}

/// Header fields after validation
#[derive(Debug)]
struct ValidatedRequest {
    course_code: String,
    course_title: String,
    date: NaiveDate,
    max_marks: i32,
    duration: String,
    semester: String,
    is_improvement_cie: bool,
    selections: Vec<(i32, PaperPart)>,
}

fn validate(request: GeneratePaperRequest) -> ApiResult<ValidatedRequest> {
    let missing = |field: &str| ApiError::bad_request(format!("{field} is required"));

    let course_code = non_blank(request.course_code).ok_or_else(|| missing("course_code"))?;
    let course_title = non_blank(request.course_title).ok_or_else(|| missing("course_title"))?;
    let raw_date = non_blank(request.date).ok_or_else(|| missing("date"))?;
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"))?;
    let max_marks =
        int_field(request.max_marks.as_ref(), "max_marks")?.ok_or_else(|| missing("max_marks"))?;
    let duration = non_blank(request.duration).ok_or_else(|| missing("duration"))?;
    let semester = super::text_field(request.semester.as_ref()).ok_or_else(|| missing("semester"))?;

    let selected = request.selected_questions;
    if selected.is_empty() {
        return Err(ApiError::bad_request("No questions selected"));
    }
    if let Some(duplicate) = selected.first_duplicate() {
        return Err(ApiError::bad_request(format!(
            "Question {duplicate} is selected more than once"
        )));
    }

    Ok(ValidatedRequest {
        course_code,
        course_title,
        date,
        max_marks,
        duration,
        semester,
        is_improvement_cie: request.is_improvement_cie,
        selections: selected.ordered(),
    })
}

/// POST /api/generate-paper
pub async fn generate_paper(
    State(state): State<AppState>,
    ctx: SecurityContext,
    ApiJson(request): ApiJson<GeneratePaperRequest>,
) -> ApiResult<Response> {
    require_role(&ctx, &[Role::Faculty])?;
    let request = validate(request)?;

    let user = current_user(&state, &ctx).await?;
    let faculty = faculty_profile(&state, &user)
        .await?
        .ok_or_else(|| ApiError::authorization_error("No faculty profile found"))?;

    let ids: Vec<i32> = request.selections.iter().map(|(id, _)| *id).collect();
    let mut details: HashMap<i32, _> = Question::find_details_by_ids(state.pool(), &ids)
        .await?
        .into_iter()
        .map(|detail| (detail.q_id, detail))
        .collect();

    let mut questions = Vec::with_capacity(request.selections.len());
    for (q_id, part) in &request.selections {
        let detail = details
            .remove(q_id)
            .ok_or_else(|| ApiError::not_found(format!("Question {q_id} not found")))?;
        questions.push(PaperQuestion {
            q_id: *q_id,
            part: *part,
            image_paths: detail.image_path_list(),
            equations: detail.equation_list(),
            text: detail.text,
            marks: detail.marks,
            bt: detail.bt,
            co: detail.co,
        });
    }

    let header = PaperHeader {
        institution_heading: state.config.paper.institution_heading.clone(),
        program_level: state.config.paper.program_level.clone(),
        date: request.date,
        course_code: request.course_code.clone(),
        course_title: request.course_title.clone(),
        max_marks: request.max_marks,
        duration: request.duration.clone(),
        semester: request.semester.clone(),
        is_improvement_cie: request.is_improvement_cie,
        faculty_name: faculty.name.clone(),
    };
    // assemble_paper warns when this differs from max_marks
    let total = total_marks(&questions);

    let images = state.images.clone();
    let document = tokio::task::spawn_blocking(move || {
        assemble_paper(&header, &questions, &*images)
    })
    .await
    .map_err(|e| {
        log_error("papers", "assemble", &e.to_string(), Some(&request.course_code));
        ApiError::Internal
    })?
    .map_err(|e| {
        log_error("papers", "assemble", &e.to_string(), Some(&request.course_code));
        log_paper_operation(
            "generate",
            &request.course_code,
            Some(&faculty.f_id),
            request.selections.len(),
            total,
            "failed",
        );
        ApiError::from(e)
    })?;

    let filename = format!("question_paper_{}.docx", Utc::now().format("%Y%m%d_%H%M%S"));
    save_copy(&state, &filename, &document).await;

    if state.config.paper.persist_generated {
        let mut tx = state.pool().begin().await?;
        let paper = PaperMetadata::create(
            &mut *tx,
            NewPaperMetadata {
                course_code: request.course_code.clone(),
                course_title: request.course_title.clone(),
                date: request.date,
                max_marks: request.max_marks,
                duration: request.duration.clone(),
                semester: request.semester.clone(),
                faculty_id: faculty.f_id.clone(),
                is_improvement_cie: request.is_improvement_cie,
            },
        )
        .await?;
        QuestionSelection::record_all(&mut *tx, paper.id, &request.selections).await?;
        tx.commit().await?;
        info!(paper_id = paper.id, "Paper recorded");
    }

    log_paper_operation(
        "generate",
        &request.course_code,
        Some(&faculty.f_id),
        request.selections.len(),
        total,
        "success",
    );

    let disposition = format!("attachment; filename=\"{filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}

/// Keep a copy of the document under the output directory; failures are logged only
async fn save_copy(state: &AppState, filename: &str, document: &[u8]) {
    if let Err(e) = write_document(&state.config.paper.output_dir, filename, document).await {
        log_error("papers", "save_copy", &e.to_string(), Some(filename));
    }
}

async fn write_document(dir: &Path, filename: &str, document: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(filename), document).await
}
