//! Dynamic question search built on [`sqlx::QueryBuilder`] with bound parameters.

use sqlx::{Postgres, QueryBuilder};

use super::Pagination;
use crate::constants::{DifficultyLevel, QuestionType};
use crate::models::core::question::DETAIL_SELECT;

/// Conditions combined with `AND`; each non-empty list becomes `= ANY($n)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    pub course_id: Option<String>,
    pub unit_numbers: Vec<i32>,
    pub cos: Vec<String>,
    pub bts: Vec<String>,
    pub marks: Vec<i32>,
    pub difficulty_levels: Vec<DifficultyLevel>,
    pub question_types: Vec<QuestionType>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn push_conditions(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        let mut first = true;
        let mut clause = |builder: &mut QueryBuilder<'static, Postgres>, column: &str| {
            builder.push(if first { " WHERE " } else { " AND " });
            builder.push(column);
            first = false;
        };

        if let Some(course_id) = &self.course_id {
            clause(builder, "q.course_id = ");
            builder.push_bind(course_id.clone());
        }
        if !self.unit_numbers.is_empty() {
            clause(builder, "u.unit_id = ANY(");
            builder.push_bind(self.unit_numbers.clone()).push(")");
        }
        if !self.cos.is_empty() {
            clause(builder, "q.co = ANY(");
            builder.push_bind(self.cos.clone()).push(")");
        }
        if !self.bts.is_empty() {
            clause(builder, "q.bt = ANY(");
            builder.push_bind(self.bts.clone()).push(")");
        }
        if !self.marks.is_empty() {
            clause(builder, "q.marks = ANY(");
            builder.push_bind(self.marks.clone()).push(")");
        }
        if !self.difficulty_levels.is_empty() {
            let levels: Vec<String> = self
                .difficulty_levels
                .iter()
                .map(|d| d.as_str().to_string())
                .collect();
            clause(builder, "q.difficulty_level = ANY(");
            builder.push_bind(levels).push(")");
        }
        if !self.question_types.is_empty() {
            let types: Vec<String> = self
                .question_types
                .iter()
                .map(|t| t.as_str().to_string())
                .collect();
            clause(builder, "q.type = ANY(");
            builder.push_bind(types).push(")");
        }
    }

    /// Detail rows ordered by unit number then id, optionally paginated
    pub fn select_query(&self, pagination: Option<&Pagination>) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(DETAIL_SELECT);
        self.push_conditions(&mut builder);
        builder.push(" ORDER BY q.course_id, u.unit_id, q.q_id");
        if let Some(pagination) = pagination {
            pagination.push_to(&mut builder);
        }
        builder
    }

    /// `COUNT(*)` over the same conditions
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM questions q JOIN units u ON u.id = q.unit_id",
        );
        self.push_conditions(&mut builder);
        builder
    }
}
