use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::constants::PaperPart;

/// Question placed on a generated paper
/// Maps to `question_selections` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuestionSelection {
    pub id: i32,
    pub paper_id: i32,
    pub question_id: i32,
    #[sqlx(try_from = "String")]
    pub part: PaperPart,
    pub position: i32,
}

impl QuestionSelection {
    /// Insert one row per `(question_id, part)`, numbering positions from 1 within each part
    pub async fn record_all(
        conn: &mut PgConnection,
        paper_id: i32,
        selections: &[(i32, PaperPart)],
    ) -> Result<Vec<QuestionSelection>, sqlx::Error> {
        let mut recorded = Vec::with_capacity(selections.len());
        let mut positions: std::collections::HashMap<PaperPart, i32> = Default::default();

        for (question_id, part) in selections {
            let position = positions.entry(*part).or_insert(0);
            *position += 1;

            let row = sqlx::query_as::<_, QuestionSelection>(
                r#"
                INSERT INTO question_selections (paper_id, question_id, part, position)
                VALUES ($1, $2, $3, $4)
                RETURNING id, paper_id, question_id, part, position
                "#,
            )
            .bind(paper_id)
            .bind(question_id)
            .bind(part.as_str())
            .bind(*position)
            .fetch_one(&mut *conn)
            .await?;

            recorded.push(row);
        }

        Ok(recorded)
    }

    /// Selections of a paper ordered by part then position
    pub async fn list_for_paper(
        pool: &PgPool,
        paper_id: i32,
    ) -> Result<Vec<QuestionSelection>, sqlx::Error> {
        sqlx::query_as::<_, QuestionSelection>(
            r#"
            SELECT id, paper_id, question_id, part, position
            FROM question_selections
            WHERE paper_id = $1
            ORDER BY part, position
            "#,
        )
        .bind(paper_id)
        .fetch_all(pool)
        .await
    }
}
