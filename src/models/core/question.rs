use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::constants::{DifficultyLevel, QuestionType};
use crate::query_builder::{Pagination, QuestionFilter};

/// Question bank entry
/// Maps to `questions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub q_id: i32,
    /// Surrogate key of the unit row, not the unit number
    pub unit_id: i32,
    pub course_id: String,
    pub text: String,
    pub co: String,
    pub bt: String,
    pub marks: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub question_type: QuestionType,
    #[sqlx(try_from = "String")]
    pub difficulty_level: DifficultyLevel,
    pub tags: Value,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub course_id: String,
    pub unit_pk: i32,
    pub text: String,
    pub co: String,
    pub bt: String,
    pub marks: i32,
    pub question_type: QuestionType,
    pub difficulty_level: DifficultyLevel,
    pub tags: Value,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub unit_pk: Option<i32>,
    pub text: Option<String>,
    pub co: Option<String>,
    pub bt: Option<String>,
    pub marks: Option<i32>,
    pub question_type: Option<QuestionType>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub tags: Option<Value>,
}

/// Question joined with its course, unit and flattened media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuestionDetail {
    pub q_id: i32,
    pub text: String,
    pub course_id: String,
    pub course_name: String,
    /// Unit number within the course
    pub unit_id: i32,
    pub unit_name: String,
    pub co: String,
    pub bt: String,
    pub marks: i32,
    #[sqlx(try_from = "String")]
    pub difficulty_level: DifficultyLevel,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub question_type: QuestionType,
    pub tags: Value,
    pub image: Option<String>,
    /// Every media row's `image_paths` concatenated in insertion order
    pub image_paths: Value,
    /// Every media row's `equations` concatenated in insertion order
    pub equations: Value,
}

impl QuestionDetail {
    pub fn image_path_list(&self) -> Vec<String> {
        self.image_paths
            .as_array()
            .map(|paths| {
                paths
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn equation_list(&self) -> Vec<Value> {
        self.equations.as_array().cloned().unwrap_or_default()
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|i| !i.is_empty()) || !self.image_path_list().is_empty()
    }

    pub fn has_equations(&self) -> bool {
        !self.equation_list().is_empty()
    }
}

/// Select list shared by every query producing [`QuestionDetail`] rows
pub(crate) const DETAIL_SELECT: &str = r#"
    SELECT
        q.q_id,
        q.text,
        q.course_id,
        c.course_name,
        u.unit_id,
        u.unit_name,
        q.co,
        q.bt,
        q.marks,
        q.difficulty_level,
        q.type,
        q.tags,
        q.image,
        COALESCE((
            SELECT jsonb_agg(elem.value ORDER BY m.qm_id, elem.ordinality)
            FROM question_media m
            CROSS JOIN LATERAL jsonb_array_elements(
                CASE WHEN jsonb_typeof(m.image_paths) = 'array' THEN m.image_paths ELSE '[]'::jsonb END
            ) WITH ORDINALITY AS elem(value, ordinality)
            WHERE m.question_id = q.q_id
        ), '[]'::jsonb) AS image_paths,
        COALESCE((
            SELECT jsonb_agg(elem.value ORDER BY m.qm_id, elem.ordinality)
            FROM question_media m
            CROSS JOIN LATERAL jsonb_array_elements(
                CASE WHEN jsonb_typeof(m.equations) = 'array' THEN m.equations ELSE '[]'::jsonb END
            ) WITH ORDINALITY AS elem(value, ordinality)
            WHERE m.question_id = q.q_id
        ), '[]'::jsonb) AS equations
    FROM questions q
    JOIN courses c ON c.course_id = q.course_id
    JOIN units u ON u.id = q.unit_id
"#;

impl Question {
    pub async fn create<'e, E>(
        executor: E,
        new_question: NewQuestion,
    ) -> Result<Question, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (unit_id, course_id, text, co, bt, marks, type, difficulty_level, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING q_id, unit_id, course_id, text, co, bt, marks, type, difficulty_level, tags, image
            "#,
        )
        .bind(new_question.unit_pk)
        .bind(new_question.course_id)
        .bind(new_question.text)
        .bind(new_question.co)
        .bind(new_question.bt)
        .bind(new_question.marks)
        .bind(new_question.question_type.as_str())
        .bind(new_question.difficulty_level.as_str())
        .bind(new_question.tags)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, q_id: i32) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT q_id, unit_id, course_id, text, co, bt, marks, type, difficulty_level, tags, image
            FROM questions
            WHERE q_id = $1
            "#,
        )
        .bind(q_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        q_id: i32,
    ) -> Result<Option<QuestionDetail>, sqlx::Error> {
        let sql = format!("{DETAIL_SELECT} WHERE q.q_id = $1");
        sqlx::query_as::<_, QuestionDetail>(&sql)
            .bind(q_id)
            .fetch_optional(pool)
            .await
    }

    /// Details for the given ids; order of the result is unspecified
    pub async fn find_details_by_ids(
        pool: &PgPool,
        q_ids: &[i32],
    ) -> Result<Vec<QuestionDetail>, sqlx::Error> {
        let sql = format!("{DETAIL_SELECT} WHERE q.q_id = ANY($1)");
        sqlx::query_as::<_, QuestionDetail>(&sql)
            .bind(q_ids)
            .fetch_all(pool)
            .await
    }

    /// Filtered page of details plus the total number of matches
    pub async fn search(
        pool: &PgPool,
        filter: &QuestionFilter,
        pagination: Option<&Pagination>,
    ) -> Result<(Vec<QuestionDetail>, i64), sqlx::Error> {
        let total = filter
            .count_query()
            .build_query_scalar::<i64>()
            .fetch_one(pool)
            .await?;
        let questions = filter
            .select_query(pagination)
            .build_query_as::<QuestionDetail>()
            .fetch_all(pool)
            .await?;

        Ok((questions, total))
    }

    pub async fn update<'e, E>(
        executor: E,
        q_id: i32,
        update: QuestionUpdate,
    ) -> Result<Option<Question>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET unit_id = COALESCE($2, unit_id),
                text = COALESCE($3, text),
                co = COALESCE($4, co),
                bt = COALESCE($5, bt),
                marks = COALESCE($6, marks),
                type = COALESCE($7, type),
                difficulty_level = COALESCE($8, difficulty_level),
                tags = COALESCE($9, tags)
            WHERE q_id = $1
            RETURNING q_id, unit_id, course_id, text, co, bt, marks, type, difficulty_level, tags, image
            "#,
        )
        .bind(q_id)
        .bind(update.unit_pk)
        .bind(update.text)
        .bind(update.co)
        .bind(update.bt)
        .bind(update.marks)
        .bind(update.question_type.map(|t| t.as_str()))
        .bind(update.difficulty_level.map(|d| d.as_str()))
        .bind(update.tags)
        .fetch_optional(executor)
        .await
    }

    pub async fn set_image<'e, E>(executor: E, q_id: i32, image: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE questions SET image = $2 WHERE q_id = $1")
            .bind(q_id)
            .bind(image)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, q_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE q_id = $1")
            .bind(q_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(pool)
            .await
    }
}
