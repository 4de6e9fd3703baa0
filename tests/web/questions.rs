//! Question bank endpoints: CRUD, listing, filters, images and statistics

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use super::TestApp;
use crate::common::*;
use qbank_core::constants::Role;

/// Minimal PNG: signature plus an IHDR chunk carrying the dimensions
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

fn multipart_image(field: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "qbank-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"diagram.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

async fn faculty_with_course(pool: &PgPool) -> sqlx::Result<()> {
    create_course(pool, "IS301", "Operating Systems", None).await?;
    create_course(pool, "IS302", "Networks", None).await?;
    create_faculty(pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    assign_course(pool, "1", "IS301").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_question_applies_defaults(pool: PgPool) -> sqlx::Result<()> {
    faculty_with_course(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let created = app
        .post(
            "/api/questions",
            &token,
            json!({ "course_id": "IS301", "text": "Define a process." }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let q_id = created.json()["q_id"].as_i64().expect("q_id");

    let question = app.get(&format!("/api/questions/{q_id}"), &token).await.json();
    let question = &question["question"];
    assert_eq!(question["co"], "CO1");
    assert_eq!(question["bt"], "BT1");
    assert_eq!(question["marks"], 2);
    assert_eq!(question["difficulty_level"], "Medium");
    assert_eq!(question["unit_id"], 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_question_checks_input_and_assignment(pool: PgPool) -> sqlx::Result<()> {
    faculty_with_course(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let no_text = app
        .post("/api/questions", &token, json!({ "course_id": "IS301", "text": " " }))
        .await;
    assert_eq!(no_text.status, StatusCode::BAD_REQUEST);

    let bad_marks = app
        .post(
            "/api/questions",
            &token,
            json!({ "course_id": "IS301", "text": "Q", "marks": "ten" }),
        )
        .await;
    assert_eq!(bad_marks.status, StatusCode::BAD_REQUEST);

    let bad_level = app
        .post(
            "/api/questions",
            &token,
            json!({ "course_id": "IS301", "text": "Q", "difficulty_level": "Impossible" }),
        )
        .await;
    assert_eq!(bad_level.status, StatusCode::BAD_REQUEST);

    let unknown_course = app
        .post("/api/questions", &token, json!({ "course_id": "XX1", "text": "Q" }))
        .await;
    assert_eq!(unknown_course.status, StatusCode::NOT_FOUND);

    let unassigned = app
        .post("/api/questions", &token, json!({ "course_id": "IS302", "text": "Q" }))
        .await;
    assert_eq!(unassigned.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_question_validates_and_resolves_units(pool: PgPool) -> sqlx::Result<()> {
    faculty_with_course(&pool).await?;
    let q = QuestionSeed::new("IS301", "Define a thread.").insert(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;
    let uri = format!("/api/questions/{}", q.q_id);

    for body in [
        json!({ "unit_id": "three" }),
        json!({ "unit_id": 0 }),
        json!({ "type": "Essay" }),
        json!({ "difficulty_level": "Impossible" }),
        json!({ "text": "  " }),
    ] {
        let rejected = app.put(&uri, &token, body.clone()).await;
        assert_eq!(rejected.status, StatusCode::BAD_REQUEST, "{body}");
    }

    let updated = app
        .put(
            &uri,
            &token,
            json!({ "unit_id": "4", "marks": 5, "difficulty_level": "Hard" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let question = &updated.json()["question"];
    assert_eq!(question["unit_id"], 4);
    assert_eq!(question["unit_name"], "Unit 4");
    assert_eq!(question["marks"], 5);
    assert_eq!(question["difficulty_level"], "Hard");
    assert_eq!(question["text"], "Define a thread.");

    let units = app.get("/api/units?course_id=IS301", &token).await.json();
    let unit_four: Vec<_> = units["units"]
        .as_array()
        .expect("units")
        .iter()
        .filter(|u| u["unit_id"] == 4)
        .collect();
    assert_eq!(unit_four.len(), 1);
    assert_eq!(unit_four[0]["course_id"], "IS301");

    let other_course = app.get("/api/units?course_id=IS302", &token).await.json();
    assert_eq!(other_course["units"].as_array().map(Vec::len), Some(0));

    let missing = app.put("/api/questions/999999", &token, json!({ "marks": 1 })).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_question(pool: PgPool) -> sqlx::Result<()> {
    faculty_with_course(&pool).await?;
    let q = QuestionSeed::new("IS301", "Short lived").insert(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;
    let uri = format!("/api/questions/{}", q.q_id);

    let deleted = app.delete(&uri, &token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["message"], "Question deleted successfully");

    assert_eq!(app.get(&uri, &token).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri, &token).await.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_questions_paginates_and_filters(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    create_user(&pool, "admin@example.edu", Role::Admin).await?;
    for n in 0..5 {
        QuestionSeed::new("IS301", "Short answer")
            .unit(1 + n % 2)
            .marks(if n < 3 { 2 } else { 10 })
            .insert(&pool)
            .await?;
    }
    let app = TestApp::new(pool);
    let token = app.login("admin@example.edu").await;

    let page = app
        .get("/api/questions?course_id=IS301&per_page=2&page=2", &token)
        .await
        .json();
    assert_eq!(page["questions"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["pagination"]["total_count"], 5);
    assert_eq!(page["pagination"]["total_pages"], 3);
    assert_eq!(page["pagination"]["has_next"], true);
    assert_eq!(page["pagination"]["has_previous"], true);

    let ten_markers = app.get("/api/questions?marks=10", &token).await.json();
    assert_eq!(ten_markers["pagination"]["total_count"], 2);

    let bad_page = app.get("/api/questions?page=first", &token).await;
    assert_eq!(bad_page.status, StatusCode::BAD_REQUEST);

    let filtered = app
        .post(
            "/api/courses/IS301/filter-questions",
            &token,
            json!({ "unit_numbers": ["1"], "marks": [2] }),
        )
        .await
        .json();
    // Units alternate 1, 2, 1, 2, 1 and the first three carry 2 marks
    assert_eq!(filtered["questions"].as_array().map(Vec::len), Some(2));

    let by_course = app.get("/api/courses/IS301/questions", &token).await.json();
    assert_eq!(by_course["course"]["question_count"], 5);

    let stats = app.get("/api/question-stats", &token).await.json();
    assert_eq!(stats["total_count"], 5);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_image_upload_stores_file(pool: PgPool) -> sqlx::Result<()> {
    faculty_with_course(&pool).await?;
    let q = QuestionSeed::new("IS301", "Label the diagram").insert(&pool).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let upload = |field: &'static str, bytes: Vec<u8>| {
        let (content_type, body) = multipart_image(field, &bytes);
        Request::builder()
            .method(Method::POST)
            .uri(format!("/api/questions/{}/image", q.q_id))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("request")
    };

    let stored = app.request(upload("image", png_bytes(64, 32))).await;
    assert_eq!(stored.status, StatusCode::OK);
    let path = stored.json()["image_path"]
        .as_str()
        .expect("image_path")
        .to_string();
    assert!(path.starts_with("question_images/"));
    assert!(path.ends_with(".png"));
    assert!(app.media_dir.path().join(&path).exists());

    let question = app.get(&format!("/api/questions/{}", q.q_id), &token).await.json();
    assert_eq!(question["question"]["image"], path.as_str());

    let not_image = app.request(upload("image", b"plain text".to_vec())).await;
    assert_eq!(not_image.status, StatusCode::BAD_REQUEST);

    let wrong_field = app.request(upload("file", png_bytes(8, 8))).await;
    assert_eq!(wrong_field.status, StatusCode::BAD_REQUEST);
    Ok(())
}
