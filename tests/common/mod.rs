//! Shared fixtures for integration tests.
//!
//! Database tests run under `#[sqlx::test(migrations = "./migrations")]`, which
//! hands each test a fresh database; these helpers seed it.
#![allow(dead_code)]

use serde_json::json;
use sqlx::PgPool;

use qbank_core::constants::{DifficultyLevel, QuestionType, Role};
use qbank_core::models::{
    Course, Department, Faculty, FacultyCourse, NewCourse, NewFaculty, NewQuestion, NewUser,
    Question, QuestionMedia, Unit, User,
};
use qbank_core::web::auth::hash_password;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub async fn create_user(pool: &PgPool, email: &str, role: Role) -> sqlx::Result<User> {
    let password_hash =
        hash_password(TEST_PASSWORD).map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    User::create(
        pool,
        NewUser {
            username: email.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            first_name: "Test".to_string(),
            last_name: role.as_str().to_string(),
            is_staff: role == Role::Admin,
        },
    )
    .await
}

pub async fn create_department(pool: &PgPool, name: &str) -> sqlx::Result<Department> {
    Department::create(pool, name).await
}

pub async fn create_course(
    pool: &PgPool,
    course_id: &str,
    name: &str,
    department_id: Option<i32>,
) -> sqlx::Result<Course> {
    Course::create(
        pool,
        NewCourse {
            course_id: course_id.to_string(),
            course_name: name.to_string(),
            department_id,
        },
    )
    .await
}

/// Faculty profile linked to a new faculty user
pub async fn create_faculty(
    pool: &PgPool,
    f_id: &str,
    name: &str,
    email: &str,
    department_id: Option<i32>,
) -> sqlx::Result<(User, Faculty)> {
    let user = create_user(pool, email, Role::Faculty).await?;
    let faculty = Faculty::create(
        pool,
        NewFaculty {
            f_id: f_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            user_id: Some(user.id),
            department_id,
        },
    )
    .await?;
    Ok((user, faculty))
}

pub async fn assign_course(pool: &PgPool, f_id: &str, course_id: &str) -> sqlx::Result<()> {
    FacultyCourse::create(pool, f_id, course_id).await.map(|_| ())
}

pub struct QuestionSeed<'a> {
    pub course_id: &'a str,
    pub unit_number: i32,
    pub text: &'a str,
    pub co: &'a str,
    pub bt: &'a str,
    pub marks: i32,
    pub difficulty_level: DifficultyLevel,
}

impl<'a> QuestionSeed<'a> {
    pub fn new(course_id: &'a str, text: &'a str) -> Self {
        Self {
            course_id,
            unit_number: 1,
            text,
            co: "CO1",
            bt: "BT1",
            marks: 2,
            difficulty_level: DifficultyLevel::Medium,
        }
    }

    pub fn unit(mut self, unit_number: i32) -> Self {
        self.unit_number = unit_number;
        self
    }

    pub fn marks(mut self, marks: i32) -> Self {
        self.marks = marks;
        self
    }

    pub fn outcome(mut self, co: &'a str, bt: &'a str) -> Self {
        self.co = co;
        self.bt = bt;
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Question> {
        let unit = Unit::find_or_create(pool, self.course_id, self.unit_number).await?;
        Question::create(
            pool,
            NewQuestion {
                course_id: self.course_id.to_string(),
                unit_pk: unit.id,
                text: self.text.to_string(),
                co: self.co.to_string(),
                bt: self.bt.to_string(),
                marks: self.marks,
                question_type: QuestionType::Test,
                difficulty_level: self.difficulty_level,
                tags: json!({}),
            },
        )
        .await
    }
}

pub async fn attach_equation(pool: &PgPool, q_id: i32, text: &str) -> sqlx::Result<()> {
    QuestionMedia::create(pool, q_id, None, Some(json!([{ "text": text }])))
        .await
        .map(|_| ())
}
