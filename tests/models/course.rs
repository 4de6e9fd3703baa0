//! Course Model Tests

use sqlx::PgPool;

use crate::common::*;
use qbank_core::models::{Course, Question, Unit};

#[sqlx::test(migrations = "./migrations")]
async fn test_course_summary_counts(pool: PgPool) -> sqlx::Result<()> {
    let dept = create_department(&pool, "Information Science").await?;
    create_course(&pool, "IS301", "Operating Systems", Some(dept.dept_id)).await?;
    create_course(&pool, "IS999", "Orphan", None).await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    assign_course(&pool, "1", "IS301").await?;
    QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;
    QuestionSeed::new("IS301", "Explain paging.").unit(2).insert(&pool).await?;

    let summary = Course::find_summary(&pool, "IS301")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(summary.department_name, "Information Science");
    assert_eq!(summary.unit_count, 2);
    assert_eq!(summary.question_count, 2);
    assert_eq!(summary.faculty_count, 1);

    let orphan = Course::find_summary(&pool, "IS999")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(orphan.department_name, "Not Assigned");

    let by_dept = Course::list_summaries(&pool, None, Some(dept.dept_id)).await?;
    assert_eq!(by_dept.len(), 1);

    let by_name = Course::list_summaries(&pool, Some("operat"), None).await?;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].course_id, "IS301");

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_update_detaches_department(pool: PgPool) -> sqlx::Result<()> {
    let dept = create_department(&pool, "ECE").await?;
    create_course(&pool, "EC201", "Signals", Some(dept.dept_id)).await?;

    let updated = Course::update(&pool, "EC201", Some("Signals and Systems".into()), None)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(updated.course_name, "Signals and Systems");
    assert_eq!(updated.department_id, None);

    assert!(Course::update(&pool, "NOPE", None, None).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_delete_cascades(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let question = QuestionSeed::new("IS301", "Define a process.").insert(&pool).await?;

    let deleted = Course::delete(&pool, "IS301")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(deleted.course_name, "Operating Systems");

    assert!(Question::find_by_id(&pool, question.q_id).await?.is_none());
    assert!(Unit::list(&pool, Some("IS301"), None).await?.is_empty());
    assert!(Course::delete(&pool, "IS301").await?.is_none());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_course_id_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let duplicate = create_course(&pool, "IS301", "Again", None).await;

    let err = duplicate.expect_err("duplicate course id should fail");
    let qbank_err = qbank_core::QbankError::from(err);
    assert!(matches!(qbank_err, qbank_core::QbankError::Conflict(_)));
    Ok(())
}
