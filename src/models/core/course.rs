use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::constants::UNASSIGNED_DEPARTMENT;

/// Course identified by its course code
/// Maps to `courses` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub department_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub course_id: String,
    pub course_name: String,
    pub department_id: Option<i32>,
}

/// Course row joined with its department name and child counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub course_id: String,
    pub course_name: String,
    pub department_id: Option<i32>,
    pub department_name: String,
    pub unit_count: i64,
    pub question_count: i64,
    pub faculty_count: i64,
}

/// Course with its resolved department name, used inside faculty and mapping listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseWithDepartment {
    pub course_id: String,
    pub course_name: String,
    pub department_id: Option<i32>,
    pub department_name: String,
}

const SUMMARY_SELECT: &str = r#"
    SELECT
        c.course_id,
        c.course_name,
        c.department_id,
        COALESCE(d.dept_name, $1) AS department_name,
        (SELECT COUNT(*) FROM units u WHERE u.course_id = c.course_id) AS unit_count,
        (SELECT COUNT(*) FROM questions q WHERE q.course_id = c.course_id) AS question_count,
        (SELECT COUNT(*) FROM faculty_courses fc WHERE fc.course_id = c.course_id) AS faculty_count
    FROM courses c
    LEFT JOIN departments d ON d.dept_id = c.department_id
"#;

impl Course {
    pub async fn create(pool: &PgPool, new_course: NewCourse) -> Result<Course, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (course_id, course_name, department_id)
            VALUES ($1, $2, $3)
            RETURNING course_id, course_name, department_id
            "#,
        )
        .bind(new_course.course_id)
        .bind(new_course.course_name)
        .bind(new_course.department_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, course_id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT course_id, course_name, department_id FROM courses WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_department(
        pool: &PgPool,
        dept_id: i32,
    ) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT course_id, course_name, department_id
            FROM courses
            WHERE department_id = $1
            ORDER BY course_id
            "#,
        )
        .bind(dept_id)
        .fetch_all(pool)
        .await
    }

    /// Summaries filtered by name substring and department id
    pub async fn list_summaries(
        pool: &PgPool,
        name_filter: Option<&str>,
        department_id: Option<i32>,
    ) -> Result<Vec<CourseSummary>, sqlx::Error> {
        let sql = format!(
            "{SUMMARY_SELECT}
            WHERE ($2::TEXT IS NULL OR c.course_name ILIKE '%' || $2 || '%')
              AND ($3::INT IS NULL OR c.department_id = $3)
            ORDER BY c.course_id"
        );

        sqlx::query_as::<_, CourseSummary>(&sql)
            .bind(UNASSIGNED_DEPARTMENT)
            .bind(name_filter)
            .bind(department_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        course_id: &str,
    ) -> Result<Option<CourseSummary>, sqlx::Error> {
        let sql = format!("{SUMMARY_SELECT} WHERE c.course_id = $2");

        sqlx::query_as::<_, CourseSummary>(&sql)
            .bind(UNASSIGNED_DEPARTMENT)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Update the name and department. `department_id` is written as given, so
    /// `None` detaches the course.
    pub async fn update(
        pool: &PgPool,
        course_id: &str,
        course_name: Option<String>,
        department_id: Option<i32>,
    ) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET course_name = COALESCE($2, course_name),
                department_id = $3
            WHERE course_id = $1
            RETURNING course_id, course_name, department_id
            "#,
        )
        .bind(course_id)
        .bind(course_name)
        .bind(department_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a course; its units, questions and faculty mappings cascade
    pub async fn delete(pool: &PgPool, course_id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            DELETE FROM courses
            WHERE course_id = $1
            RETURNING course_id, course_name, department_id
            "#,
        )
        .bind(course_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await
    }

    /// Courses assigned to a faculty member, with department names
    pub async fn list_for_faculty(
        pool: &PgPool,
        f_id: &str,
    ) -> Result<Vec<CourseWithDepartment>, sqlx::Error> {
        sqlx::query_as::<_, CourseWithDepartment>(
            r#"
            SELECT c.course_id, c.course_name, c.department_id,
                   COALESCE(d.dept_name, $2) AS department_name
            FROM faculty_courses fc
            JOIN courses c ON c.course_id = fc.course_id
            LEFT JOIN departments d ON d.dept_id = c.department_id
            WHERE fc.faculty_id = $1
            ORDER BY c.course_id
            "#,
        )
        .bind(f_id)
        .bind(UNASSIGNED_DEPARTMENT)
        .fetch_all(pool)
        .await
    }
}
