//! # Web API Route Definitions
//!
//! Route groups for the question bank API. Everything returned by
//! [`api_routes`] is nested under `/api` and sits behind the auth middleware.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Authenticated API routes
///
/// - Session and profile
/// - Dashboards
/// - Departments, courses, units, faculty and faculty-course mappings
/// - Questions, images and statistics
/// - Users and paper generation
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session and profile
        .route("/logout", post(handlers::auth::logout))
        .route("/logout/all", post(handlers::auth::logout_all))
        .route(
            "/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        // Dashboards
        .route("/admin-dashboard", get(handlers::dashboard::admin_dashboard))
        .route("/faculty-dashboard", get(handlers::dashboard::faculty_dashboard))
        // Departments
        .route(
            "/departments",
            get(handlers::departments::list_departments)
                .post(handlers::departments::create_department),
        )
        .route(
            "/departments/:dept_id",
            get(handlers::departments::get_department)
                .put(handlers::departments::update_department)
                .delete(handlers::departments::delete_department),
        )
        // Courses
        .route(
            "/courses",
            get(handlers::courses::list_courses).post(handlers::courses::create_course),
        )
        .route(
            "/courses/:course_id",
            get(handlers::courses::get_course)
                .put(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )
        .route(
            "/courses/:course_id/questions",
            get(handlers::questions::course_questions),
        )
        .route(
            "/courses/:course_id/filter-questions",
            post(handlers::questions::filter_questions),
        )
        // Units
        .route(
            "/units",
            get(handlers::units::list_units).post(handlers::units::create_unit),
        )
        .route(
            "/units/:id",
            put(handlers::units::update_unit).delete(handlers::units::delete_unit),
        )
        // Faculty
        .route(
            "/faculty",
            get(handlers::faculty::list_faculty).post(handlers::faculty::create_faculty),
        )
        .route(
            "/faculty/:f_id",
            get(handlers::faculty::get_faculty)
                .put(handlers::faculty::update_faculty)
                .delete(handlers::faculty::delete_faculty),
        )
        .route(
            "/faculty-courses",
            get(handlers::faculty_courses::list_mappings)
                .post(handlers::faculty_courses::create_mapping),
        )
        .route(
            "/faculty-courses/:faculty_id/:course_id",
            delete(handlers::faculty_courses::delete_mapping),
        )
        // Questions
        .route(
            "/questions",
            get(handlers::questions::list_questions).post(handlers::questions::create_question),
        )
        .route(
            "/questions/:q_id",
            get(handlers::questions::get_question)
                .put(handlers::questions::update_question)
                .delete(handlers::questions::delete_question),
        )
        .route(
            "/questions/:q_id/image",
            post(handlers::questions::upload_question_image),
        )
        .route("/question-stats", get(handlers::questions::question_stats))
        // Users
        .route("/users", get(handlers::users::list_users))
        // Papers
        .route("/generate-paper", post(handlers::papers::generate_paper))
}

/// Routes reachable without a token, nested under `/api`
pub fn public_api_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::auth::login))
}

/// Health routes
///
/// - `/health` - Basic health check
/// - `/health/ready` - Readiness probe (database reachable)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::basic_health))
        .route("/health/ready", get(handlers::health::readiness_probe))
}
