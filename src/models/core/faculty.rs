use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::constants::UNASSIGNED_DEPARTMENT;

/// Faculty member profile, optionally linked to a login account
/// Maps to `faculty` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Faculty {
    pub f_id: String,
    pub name: String,
    pub email: String,
    pub user_id: Option<i32>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewFaculty {
    pub f_id: String,
    pub name: String,
    pub email: String,
    pub user_id: Option<i32>,
    pub department_id: Option<i32>,
}

/// Department reached through a faculty member's assigned courses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct FacultyDepartment {
    pub dept_id: i32,
    pub dept_name: String,
}

impl Faculty {
    pub async fn create<'e, E>(executor: E, new_faculty: NewFaculty) -> Result<Faculty, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Faculty>(
            r#"
            INSERT INTO faculty (f_id, name, email, user_id, department_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING f_id, name, email, user_id, department_id
            "#,
        )
        .bind(new_faculty.f_id)
        .bind(new_faculty.name)
        .bind(new_faculty.email)
        .bind(new_faculty.user_id)
        .bind(new_faculty.department_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, f_id: &str) -> Result<Option<Faculty>, sqlx::Error> {
        sqlx::query_as::<_, Faculty>(
            "SELECT f_id, name, email, user_id, department_id FROM faculty WHERE f_id = $1",
        )
        .bind(f_id)
        .fetch_optional(pool)
        .await
    }

    /// Profile linked to the account, falling back to a profile with the same email
    pub async fn find_for_user<'e, E>(
        executor: E,
        user_id: i32,
        email: &str,
    ) -> Result<Option<Faculty>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Faculty>(
            r#"
            SELECT f_id, name, email, user_id, department_id
            FROM faculty
            WHERE user_id = $1 OR email = $2
            ORDER BY (user_id = $1) DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    pub async fn list(pool: &PgPool, f_id: Option<&str>) -> Result<Vec<Faculty>, sqlx::Error> {
        sqlx::query_as::<_, Faculty>(
            r#"
            SELECT f_id, name, email, user_id, department_id
            FROM faculty
            WHERE $1::TEXT IS NULL OR f_id = $1
            ORDER BY name, f_id
            "#,
        )
        .bind(f_id)
        .fetch_all(pool)
        .await
    }

    /// Next identifier: one more than the largest purely numeric `f_id`, starting at 1
    pub async fn next_f_id<'e, E>(executor: E) -> Result<String, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let max: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX(f_id::BIGINT)
            FROM faculty
            WHERE f_id ~ '^[0-9]{1,18}$'
            "#,
        )
        .fetch_one(executor)
        .await?;

        Ok((max.unwrap_or(0) + 1).to_string())
    }

    pub async fn update<'e, E>(
        executor: E,
        f_id: &str,
        name: Option<String>,
        email: Option<String>,
        department_id: Option<i32>,
    ) -> Result<Option<Faculty>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Faculty>(
            r#"
            UPDATE faculty
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                department_id = COALESCE($4, department_id)
            WHERE f_id = $1
            RETURNING f_id, name, email, user_id, department_id
            "#,
        )
        .bind(f_id)
        .bind(name)
        .bind(email)
        .bind(department_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, f_id: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM faculty WHERE f_id = $1")
            .bind(f_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM faculty")
            .fetch_one(pool)
            .await
    }

    /// Distinct departments of the courses assigned to `f_id`
    pub async fn course_departments(
        pool: &PgPool,
        f_id: &str,
    ) -> Result<Vec<FacultyDepartment>, sqlx::Error> {
        sqlx::query_as::<_, FacultyDepartment>(
            r#"
            SELECT DISTINCT d.dept_id, d.dept_name
            FROM faculty_courses fc
            JOIN courses c ON c.course_id = fc.course_id
            JOIN departments d ON d.dept_id = c.department_id
            WHERE fc.faculty_id = $1
            ORDER BY d.dept_name, d.dept_id
            "#,
        )
        .bind(f_id)
        .fetch_all(pool)
        .await
    }

    /// Name of the profile's own department
    pub async fn department_name(&self, pool: &PgPool) -> Result<String, sqlx::Error> {
        let name: Option<String> = match self.department_id {
            Some(dept_id) => {
                sqlx::query_scalar("SELECT dept_name FROM departments WHERE dept_id = $1")
                    .bind(dept_id)
                    .fetch_optional(pool)
                    .await?
            }
            None => None,
        };

        Ok(name.unwrap_or_else(|| UNASSIGNED_DEPARTMENT.to_string()))
    }
}
