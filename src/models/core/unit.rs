use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

/// Numbered unit of a course. `unit_id` is the unit number, unique per course;
/// `id` is the surrogate key questions reference.
/// Maps to `units` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Unit {
    pub id: i32,
    pub unit_id: i32,
    pub unit_name: String,
    pub course_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnit {
    pub unit_id: i32,
    pub unit_name: String,
    pub course_id: String,
}

impl Unit {
    pub async fn create<'e, E>(executor: E, new_unit: NewUnit) -> Result<Unit, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (unit_id, unit_name, course_id)
            VALUES ($1, $2, $3)
            RETURNING id, unit_id, unit_name, course_id
            "#,
        )
        .bind(new_unit.unit_id)
        .bind(new_unit.unit_name)
        .bind(new_unit.course_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            "SELECT id, unit_id, unit_name, course_id FROM units WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Resolve unit number `unit_number` within a course, creating "Unit N" when absent
    pub async fn find_or_create<'e, E>(
        executor: E,
        course_id: &str,
        unit_number: i32,
    ) -> Result<Unit, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // The no-op update makes RETURNING yield the existing row on conflict
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (unit_id, unit_name, course_id)
            VALUES ($1, 'Unit ' || $1::TEXT, $2)
            ON CONFLICT (unit_id, course_id) DO UPDATE SET unit_id = EXCLUDED.unit_id
            RETURNING id, unit_id, unit_name, course_id
            "#,
        )
        .bind(unit_number)
        .bind(course_id)
        .fetch_one(executor)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        course_id: Option<&str>,
        unit_name: Option<&str>,
    ) -> Result<Vec<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, unit_id, unit_name, course_id
            FROM units
            WHERE ($1::TEXT IS NULL OR course_id = $1)
              AND ($2::TEXT IS NULL OR unit_name ILIKE '%' || $2 || '%')
            ORDER BY course_id, unit_id
            "#,
        )
        .bind(course_id)
        .bind(unit_name)
        .fetch_all(pool)
        .await
    }

    pub async fn names_for_course(
        pool: &PgPool,
        course_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT unit_name FROM units WHERE course_id = $1 ORDER BY unit_id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        unit_id: Option<i32>,
        unit_name: Option<String>,
    ) -> Result<Option<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET unit_id = COALESCE($2, unit_id),
                unit_name = COALESCE($3, unit_name)
            WHERE id = $1
            RETURNING id, unit_id, unit_name, course_id
            "#,
        )
        .bind(id)
        .bind(unit_id)
        .bind(unit_name)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
