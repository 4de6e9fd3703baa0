use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

/// Record of a generated paper
/// Maps to `paper_metadata` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaperMetadata {
    pub id: i32,
    pub course_code: String,
    pub course_title: String,
    pub date: NaiveDate,
    pub max_marks: i32,
    pub duration: String,
    pub semester: String,
    pub faculty_id: String,
    pub is_improvement_cie: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaperMetadata {
    pub course_code: String,
    pub course_title: String,
    pub date: NaiveDate,
    pub max_marks: i32,
    pub duration: String,
    pub semester: String,
    pub faculty_id: String,
    pub is_improvement_cie: bool,
}

/// Papers generated per course code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PapersPerCourse {
    pub course_code: String,
    pub count: i64,
}

impl PaperMetadata {
    pub async fn create<'e, E>(
        executor: E,
        new_paper: NewPaperMetadata,
    ) -> Result<PaperMetadata, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, PaperMetadata>(
            r#"
            INSERT INTO paper_metadata
                (course_code, course_title, date, max_marks, duration, semester, faculty_id, is_improvement_cie)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, course_code, course_title, date, max_marks, duration, semester,
                      faculty_id, is_improvement_cie, created_at
            "#,
        )
        .bind(new_paper.course_code)
        .bind(new_paper.course_title)
        .bind(new_paper.date)
        .bind(new_paper.max_marks)
        .bind(new_paper.duration)
        .bind(new_paper.semester)
        .bind(new_paper.faculty_id)
        .bind(new_paper.is_improvement_cie)
        .fetch_one(executor)
        .await
    }

    /// Papers of a faculty member, newest first
    pub async fn list_for_faculty(
        pool: &PgPool,
        faculty_id: &str,
    ) -> Result<Vec<PaperMetadata>, sqlx::Error> {
        sqlx::query_as::<_, PaperMetadata>(
            r#"
            SELECT id, course_code, course_title, date, max_marks, duration, semester,
                   faculty_id, is_improvement_cie, created_at
            FROM paper_metadata
            WHERE faculty_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(faculty_id)
        .fetch_all(pool)
        .await
    }

    pub async fn counts_by_course(pool: &PgPool) -> Result<Vec<PapersPerCourse>, sqlx::Error> {
        sqlx::query_as::<_, PapersPerCourse>(
            r#"
            SELECT course_code, COUNT(*) AS count
            FROM paper_metadata
            GROUP BY course_code
            ORDER BY course_code
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
