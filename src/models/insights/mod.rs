//! # Insights Models
//!
//! Read-only aggregates behind the admin dashboard and question statistics.
//! These are computed with `GROUP BY` queries over the core tables; none of them
//! support create, update or delete.

pub mod admin_dashboard;
pub mod question_stats;

pub use admin_dashboard::{AdminAnalytics, AdminDashboard, AdminStats, CourseQuestionCount};
pub use question_stats::{CountByCourse, CountByDifficulty, CountByMarks, QuestionStats};
