use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::core::Question;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountByCourse {
    pub course_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountByDifficulty {
    pub difficulty_level: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountByMarks {
    pub marks: i32,
    pub count: i64,
}

/// Question bank totals grouped by course, difficulty and marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub total_count: i64,
    pub by_course: Vec<CountByCourse>,
    pub by_difficulty: Vec<CountByDifficulty>,
    pub by_marks: Vec<CountByMarks>,
}

impl QuestionStats {
    pub async fn load(pool: &PgPool) -> Result<QuestionStats, sqlx::Error> {
        let total_count = Question::count(pool).await?;

        let by_course = sqlx::query_as::<_, CountByCourse>(
            r#"
            SELECT c.course_name, COUNT(q.q_id) AS count
            FROM questions q
            JOIN courses c ON c.course_id = q.course_id
            GROUP BY c.course_id, c.course_name
            ORDER BY c.course_name
            "#,
        )
        .fetch_all(pool)
        .await?;

        let by_difficulty = sqlx::query_as::<_, CountByDifficulty>(
            r#"
            SELECT difficulty_level, COUNT(*) AS count
            FROM questions
            GROUP BY difficulty_level
            ORDER BY difficulty_level
            "#,
        )
        .fetch_all(pool)
        .await?;

        let by_marks = sqlx::query_as::<_, CountByMarks>(
            r#"
            SELECT marks, COUNT(*) AS count
            FROM questions
            GROUP BY marks
            ORDER BY marks
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(QuestionStats {
            total_count,
            by_course,
            by_difficulty,
            by_marks,
        })
    }
}
