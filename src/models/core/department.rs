use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Academic department owning courses and faculty
/// Maps to `departments` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub dept_id: i32,
    pub dept_name: String,
}

/// Department with the number of courses and faculty attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DepartmentSummary {
    pub dept_id: i32,
    pub dept_name: String,
    pub course_count: i64,
    pub faculty_count: i64,
}

impl Department {
    pub async fn create(pool: &PgPool, dept_name: &str) -> Result<Department, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (dept_name)
            VALUES ($1)
            RETURNING dept_id, dept_name
            "#,
        )
        .bind(dept_name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        dept_id: i32,
    ) -> Result<Option<Department>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "SELECT dept_id, dept_name FROM departments WHERE dept_id = $1",
        )
        .bind(dept_id)
        .fetch_optional(pool)
        .await
    }

    /// Summaries ordered by name, optionally narrowed by a case-insensitive substring
    pub async fn list_summaries(
        pool: &PgPool,
        name_filter: Option<&str>,
    ) -> Result<Vec<DepartmentSummary>, sqlx::Error> {
        sqlx::query_as::<_, DepartmentSummary>(
            r#"
            SELECT
                d.dept_id,
                d.dept_name,
                (SELECT COUNT(*) FROM courses c WHERE c.department_id = d.dept_id) AS course_count,
                (SELECT COUNT(*) FROM faculty f WHERE f.department_id = d.dept_id) AS faculty_count
            FROM departments d
            WHERE $1::TEXT IS NULL OR d.dept_name ILIKE '%' || $1 || '%'
            ORDER BY d.dept_name, d.dept_id
            "#,
        )
        .bind(name_filter)
        .fetch_all(pool)
        .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        dept_id: i32,
    ) -> Result<Option<DepartmentSummary>, sqlx::Error> {
        sqlx::query_as::<_, DepartmentSummary>(
            r#"
            SELECT
                d.dept_id,
                d.dept_name,
                (SELECT COUNT(*) FROM courses c WHERE c.department_id = d.dept_id) AS course_count,
                (SELECT COUNT(*) FROM faculty f WHERE f.department_id = d.dept_id) AS faculty_count
            FROM departments d
            WHERE d.dept_id = $1
            "#,
        )
        .bind(dept_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        dept_id: i32,
        dept_name: Option<String>,
    ) -> Result<Option<Department>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET dept_name = COALESCE($2, dept_name)
            WHERE dept_id = $1
            RETURNING dept_id, dept_name
            "#,
        )
        .bind(dept_id)
        .bind(dept_name)
        .fetch_optional(pool)
        .await
    }

    /// Delete a department. Courses and faculty keep existing with `department_id` cleared.
    pub async fn delete(pool: &PgPool, dept_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE dept_id = $1")
            .bind(dept_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(pool)
            .await
    }
}
