//! Paper generation over HTTP

use std::io::{Cursor, Read};

use axum::http::{header, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;

use super::TestApp;
use crate::common::*;
use qbank_core::constants::{Role, DOCX_CONTENT_TYPE};
use qbank_core::models::{PaperMetadata, QuestionSelection};

fn paper_request(part_a: &[i32], part_b: &[i32]) -> Value {
    json!({
        "course_code": "IS301",
        "course_title": "Operating Systems",
        "date": "2025-03-14",
        "max_marks": "14",
        "duration": "90 minutes",
        "semester": 5,
        "selected_questions": { "part_a": part_a, "part_b": part_b },
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_paper_returns_docx(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    let q1 = QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;
    let q2 = QuestionSeed::new("IS301", "Define a thread.").insert(&pool).await?;
    let q3 = QuestionSeed::new("IS301", "Explain scheduling.")
        .marks(10)
        .outcome("CO2", "BT3")
        .insert(&pool)
        .await?;
    attach_equation(&pool, q3.q_id, "E = mc^2").await?;
    let app = TestApp::new(pool.clone());
    let token = app.login("asha@example.edu").await;

    let response = app
        .post(
            "/api/generate-paper",
            &token,
            paper_request(&[q1.q_id, q2.q_id], &[q3.q_id]),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some(DOCX_CONTENT_TYPE)
    );
    let disposition = response
        .headers
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(".docx"));

    let mut archive = zip::ZipArchive::new(Cursor::new(response.body)).expect("docx is a zip");
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document part")
        .read_to_string(&mut document)
        .expect("utf-8 document");
    assert!(document.contains("Define a thread."));
    assert!(document.contains("E = mc^2"));
    assert!(document.contains("Total Marks: 14"));

    let papers = PaperMetadata::list_for_faculty(&pool, "1").await?;
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].max_marks, 14);
    assert_eq!(papers[0].semester, "5");
    let selections = QuestionSelection::list_for_paper(&pool, papers[0].id).await?;
    assert_eq!(selections.len(), 3);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_paper_rejects_bad_requests(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    create_user(&pool, "admin@example.edu", Role::Admin).await?;
    let q1 = QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let empty = app
        .post("/api/generate-paper", &token, paper_request(&[], &[]))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let duplicate = app
        .post("/api/generate-paper", &token, paper_request(&[q1.q_id], &[q1.q_id]))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let mut bad_date = paper_request(&[q1.q_id], &[]);
    bad_date["date"] = json!("14/03/2025");
    assert_eq!(
        app.post("/api/generate-paper", &token, bad_date).await.status,
        StatusCode::BAD_REQUEST
    );

    let unknown = app
        .post("/api/generate-paper", &token, paper_request(&[q1.q_id, 999_999], &[]))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let admin = app.login("admin@example.edu").await;
    let forbidden = app
        .post("/api/generate-paper", &admin, paper_request(&[q1.q_id], &[]))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    Ok(())
}
