use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::core::{
    Course, Department, Faculty, FacultyCourse, FacultyCourseCount, PaperMetadata, PapersPerCourse,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub departments: i64,
    pub courses: i64,
    pub faculty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseQuestionCount {
    pub course_name: String,
    pub question_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub questions_by_course: Vec<CourseQuestionCount>,
    pub papers_generated: Vec<PapersPerCourse>,
    pub faculty_course_distribution: Vec<FacultyCourseCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub analytics: AdminAnalytics,
}

impl AdminDashboard {
    pub async fn load(pool: &PgPool) -> Result<AdminDashboard, sqlx::Error> {
        let stats = AdminStats {
            departments: Department::count(pool).await?,
            courses: Course::count(pool).await?,
            faculty: Faculty::count(pool).await?,
        };

        let questions_by_course = sqlx::query_as::<_, CourseQuestionCount>(
            r#"
            SELECT c.course_name, COUNT(q.q_id) AS question_count
            FROM courses c
            LEFT JOIN questions q ON q.course_id = c.course_id
            GROUP BY c.course_id, c.course_name
            ORDER BY c.course_name
            "#,
        )
        .fetch_all(pool)
        .await?;

        let analytics = AdminAnalytics {
            questions_by_course,
            papers_generated: PaperMetadata::counts_by_course(pool).await?,
            faculty_course_distribution: FacultyCourse::course_counts(pool).await?,
        };

        Ok(AdminDashboard { stats, analytics })
    }
}
