use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};

/// Images and equations attached to a question
/// Maps to `question_media` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuestionMedia {
    pub qm_id: i32,
    pub question_id: i32,
    pub image_paths: Option<Value>,
    pub equations: Option<Value>,
}

impl QuestionMedia {
    pub async fn create<'e, E>(
        executor: E,
        question_id: i32,
        image_paths: Option<Value>,
        equations: Option<Value>,
    ) -> Result<QuestionMedia, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, QuestionMedia>(
            r#"
            INSERT INTO question_media (question_id, image_paths, equations)
            VALUES ($1, $2, $3)
            RETURNING qm_id, question_id, image_paths, equations
            "#,
        )
        .bind(question_id)
        .bind(image_paths)
        .bind(equations)
        .fetch_one(executor)
        .await
    }

    pub async fn list_for_question(
        pool: &PgPool,
        question_id: i32,
    ) -> Result<Vec<QuestionMedia>, sqlx::Error> {
        sqlx::query_as::<_, QuestionMedia>(
            r#"
            SELECT qm_id, question_id, image_paths, equations
            FROM question_media
            WHERE question_id = $1
            ORDER BY qm_id
            "#,
        )
        .bind(question_id)
        .fetch_all(pool)
        .await
    }

    /// Append `path` to the question's first media row, creating one when none exists
    pub async fn append_image_path(
        conn: &mut PgConnection,
        question_id: i32,
        path: &str,
    ) -> Result<(), sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE question_media
            SET image_paths = CASE
                    WHEN jsonb_typeof(image_paths) = 'array' THEN image_paths || jsonb_build_array($2::TEXT)
                    ELSE jsonb_build_array($2::TEXT)
                END
            WHERE qm_id = (
                SELECT MIN(qm_id) FROM question_media WHERE question_id = $1
            )
            "#,
        )
        .bind(question_id)
        .bind(path)
        .execute(&mut *conn)
        .await?;

        if updated.rows_affected() == 0 {
            Self::create(
                &mut *conn,
                question_id,
                Some(Value::Array(vec![Value::String(path.to_string())])),
                None,
            )
            .await?;
        }

        Ok(())
    }

    /// Replace all media rows of a question
    pub async fn replace_for_question(
        conn: &mut PgConnection,
        question_id: i32,
        media: &[(Option<Value>, Option<Value>)],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM question_media WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *conn)
            .await?;

        for (image_paths, equations) in media {
            Self::create(&mut *conn, question_id, image_paths.clone(), equations.clone()).await?;
        }

        Ok(())
    }
}
