//! Question Model Tests

use serde_json::json;
use sqlx::PgPool;

use crate::common::*;
use qbank_core::constants::{DifficultyLevel, QuestionType};
use qbank_core::models::{Question, QuestionMedia, QuestionUpdate, Unit};
use qbank_core::query_builder::{Pagination, QuestionFilter};

#[sqlx::test(migrations = "./migrations")]
async fn test_question_detail_flattens_media(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let question = QuestionSeed::new("IS301", "Compute the page table size.")
        .unit(2)
        .insert(&pool)
        .await?;

    QuestionMedia::create(
        &pool,
        question.q_id,
        Some(json!(["question_images/a.png"])),
        Some(json!([{ "text": "2^32 / 2^12" }])),
    )
    .await?;
    let image_paths = Some(json!(["question_images/b.png"]));
    QuestionMedia::create(&pool, question.q_id, image_paths, None).await?;

    let detail = Question::find_detail(&pool, question.q_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(detail.unit_id, 2);
    assert_eq!(detail.unit_name, "Unit 2");
    assert_eq!(detail.course_name, "Operating Systems");
    assert_eq!(
        detail.image_path_list(),
        vec!["question_images/a.png".to_string(), "question_images/b.png".to_string()]
    );
    assert_eq!(detail.equation_list(), vec![json!({ "text": "2^32 / 2^12" })]);
    assert!(detail.has_image());
    assert!(detail.has_equations());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_question_without_media_has_empty_lists(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let question = QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;

    let detail = Question::find_detail(&pool, question.q_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert!(detail.image_path_list().is_empty());
    assert!(!detail.has_image());
    assert!(!detail.has_equations());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_filters_and_paginates(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    create_course(&pool, "IS302", "Networks", None).await?;

    for i in 0..5 {
        QuestionSeed::new("IS301", "Unit one question")
            .marks(2 + i % 2 * 8)
            .insert(&pool)
            .await?;
    }
    QuestionSeed::new("IS301", "Unit two question")
        .unit(2)
        .outcome("CO2", "BT3")
        .marks(10)
        .insert(&pool)
        .await?;
    QuestionSeed::new("IS302", "Other course").insert(&pool).await?;

    let course_only = QuestionFilter::new().course("IS301");
    let (all, total) = Question::search(&pool, &course_only, None).await?;
    assert_eq!(total, 6);
    assert_eq!(all.len(), 6);
    // Ordered by unit number, then id
    assert_eq!(all.last().map(|q| q.unit_id), Some(2));

    let page = Pagination::new(2, 4);
    let (second_page, total) = Question::search(&pool, &course_only, Some(&page)).await?;
    assert_eq!(total, 6);
    assert_eq!(second_page.len(), 2);

    let mut ten_marks = QuestionFilter::new().course("IS301");
    ten_marks.marks = vec![10];
    let (matches, total) = Question::search(&pool, &ten_marks, None).await?;
    assert_eq!(total, 3);
    assert!(matches.iter().all(|q| q.marks == 10));

    let mut combined = QuestionFilter::new().course("IS301");
    combined.unit_numbers = vec![2];
    combined.cos = vec!["CO2".to_string()];
    combined.bts = vec!["BT3".to_string(), "BT4".to_string()];
    let (matches, _) = Question::search(&pool, &combined, None).await?;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "Unit two question");

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_question_partial_update(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let question = QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;
    let unit_three = Unit::find_or_create(&pool, "IS301", 3).await?;

    let updated = Question::update(
        &pool,
        question.q_id,
        QuestionUpdate {
            unit_pk: Some(unit_three.id),
            marks: Some(5),
            difficulty_level: Some(DifficultyLevel::Hard),
            question_type: Some(QuestionType::Mcq),
            ..Default::default()
        },
    )
    .await?
    .ok_or(sqlx::Error::RowNotFound)?;

    assert_eq!(updated.text, "Define a process.");
    assert_eq!(updated.unit_id, unit_three.id);
    assert_eq!(updated.marks, 5);
    assert_eq!(updated.difficulty_level, DifficultyLevel::Hard);
    assert_eq!(updated.question_type, QuestionType::Mcq);

    assert!(Question::update(&pool, 9999, QuestionUpdate::default()).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_append_image_path_creates_then_extends(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let question = QuestionSeed::new("IS301", "Label the diagram.").insert(&pool).await?;

    let mut conn = pool.acquire().await?;
    QuestionMedia::append_image_path(&mut conn, question.q_id, "question_images/1.png").await?;
    QuestionMedia::append_image_path(&mut conn, question.q_id, "question_images/2.png").await?;
    drop(conn);

    let media = QuestionMedia::list_for_question(&pool, question.q_id).await?;
    assert_eq!(media.len(), 1);
    assert_eq!(
        media[0].image_paths,
        Some(json!(["question_images/1.png", "question_images/2.png"]))
    );

    let mut conn = pool.acquire().await?;
    QuestionMedia::replace_for_question(&mut conn, question.q_id, &[]).await?;
    drop(conn);
    assert!(QuestionMedia::list_for_question(&pool, question.q_id).await?.is_empty());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_marks_rejected_by_schema(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let result = QuestionSeed::new("IS301", "Negative").marks(-1).insert(&pool).await;
    assert!(result.is_err());
    Ok(())
}
