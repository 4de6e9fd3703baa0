use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::constants::UNASSIGNED_DEPARTMENT;

/// Assignment of a course to a faculty member
/// Maps to `faculty_courses` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FacultyCourse {
    pub id: i32,
    pub faculty_id: String,
    pub course_id: String,
}

/// Mapping joined with faculty, course and department names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FacultyCourseDetail {
    pub id: i32,
    pub faculty_id: String,
    pub faculty_name: String,
    pub course_id: String,
    pub course_name: String,
    pub department_name: String,
}

/// Number of courses assigned to each faculty member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FacultyCourseCount {
    pub name: String,
    pub course_count: i64,
}

impl FacultyCourse {
    pub async fn create(
        pool: &PgPool,
        faculty_id: &str,
        course_id: &str,
    ) -> Result<FacultyCourse, sqlx::Error> {
        sqlx::query_as::<_, FacultyCourse>(
            r#"
            INSERT INTO faculty_courses (faculty_id, course_id)
            VALUES ($1, $2)
            RETURNING id, faculty_id, course_id
            "#,
        )
        .bind(faculty_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    pub async fn exists(
        pool: &PgPool,
        faculty_id: &str,
        course_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM faculty_courses WHERE faculty_id = $1 AND course_id = $2)",
        )
        .bind(faculty_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// All mappings, or only those of `faculty_id`
    pub async fn list_details(
        pool: &PgPool,
        faculty_id: Option<&str>,
    ) -> Result<Vec<FacultyCourseDetail>, sqlx::Error> {
        sqlx::query_as::<_, FacultyCourseDetail>(
            r#"
            SELECT fc.id,
                   fc.faculty_id,
                   f.name AS faculty_name,
                   fc.course_id,
                   c.course_name,
                   COALESCE(d.dept_name, $2) AS department_name
            FROM faculty_courses fc
            JOIN faculty f ON f.f_id = fc.faculty_id
            JOIN courses c ON c.course_id = fc.course_id
            LEFT JOIN departments d ON d.dept_id = c.department_id
            WHERE $1::TEXT IS NULL OR fc.faculty_id = $1
            ORDER BY f.name, fc.course_id
            "#,
        )
        .bind(faculty_id)
        .bind(UNASSIGNED_DEPARTMENT)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(
        pool: &PgPool,
        faculty_id: &str,
        course_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM faculty_courses WHERE faculty_id = $1 AND course_id = $2")
                .bind(faculty_id)
                .bind(course_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn course_counts(pool: &PgPool) -> Result<Vec<FacultyCourseCount>, sqlx::Error> {
        sqlx::query_as::<_, FacultyCourseCount>(
            r#"
            SELECT f.name, COUNT(fc.id) AS course_count
            FROM faculty f
            LEFT JOIN faculty_courses fc ON fc.faculty_id = f.f_id
            GROUP BY f.f_id, f.name
            ORDER BY f.name
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
