//! Unit Model Tests

use sqlx::PgPool;

use crate::common::*;
use qbank_core::models::{NewUnit, Unit};

#[sqlx::test(migrations = "./migrations")]
async fn test_find_or_create_is_idempotent(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;

    let first = Unit::find_or_create(&pool, "IS301", 3).await?;
    assert_eq!(first.unit_id, 3);
    assert_eq!(first.unit_name, "Unit 3");

    let second = Unit::find_or_create(&pool, "IS301", 3).await?;
    assert_eq!(second.id, first.id);
    assert_eq!(Unit::list(&pool, Some("IS301"), None).await?.len(), 1);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unit_crud_and_filters(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    create_course(&pool, "IS302", "Networks", None).await?;

    let unit = Unit::create(
        &pool,
        NewUnit {
            unit_id: 1,
            unit_name: "Processes".to_string(),
            course_id: "IS301".to_string(),
        },
    )
    .await?;
    Unit::find_or_create(&pool, "IS302", 1).await?;

    assert_eq!(Unit::list(&pool, None, None).await?.len(), 2);
    assert_eq!(Unit::list(&pool, None, Some("process")).await?.len(), 1);

    let renamed = Unit::update(&pool, unit.id, None, Some("Process Management".into()))
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(renamed.unit_name, "Process Management");
    assert_eq!(renamed.unit_id, 1);

    assert_eq!(
        Unit::names_for_course(&pool, "IS301").await?,
        vec!["Process Management".to_string()]
    );

    assert!(Unit::delete(&pool, unit.id).await?);
    assert!(Unit::find_by_id(&pool, unit.id).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unit_number_unique_per_course(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let new_unit = || NewUnit {
        unit_id: 2,
        unit_name: "Memory".to_string(),
        course_id: "IS301".to_string(),
    };

    Unit::create(&pool, new_unit()).await?;
    assert!(Unit::create(&pool, new_unit()).await.is_err());
    Ok(())
}
