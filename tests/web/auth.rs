//! Login, token enforcement and profile endpoints

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use super::TestApp;
use crate::common::*;
use qbank_core::constants::Role;

#[sqlx::test(migrations = "./migrations")]
async fn test_health_needs_no_token(pool: PgPool) {
    let app = TestApp::new(pool);

    let health = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");

    let ready = app.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_token_and_user(pool: PgPool) -> sqlx::Result<()> {
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    let app = TestApp::new(pool);

    let response = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "asha@example.edu", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "asha@example.edu");
    assert_eq!(body["user"]["role"], "faculty");
    assert_eq!(body["user"]["name"], "Asha Rao");
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejections(pool: PgPool) -> sqlx::Result<()> {
    create_user(&pool, "admin@example.edu", Role::Admin).await?;
    let app = TestApp::new(pool);

    let wrong_password = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "admin@example.edu", "password": "nope" })),
        )
        .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json()["error"]["message"], "Invalid credentials");

    let missing = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "admin@example.edu" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let malformed = app
        .send(Method::POST, "/api/login", None, Some(json!("not an object")))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_routes_require_token(pool: PgPool) {
    let app = TestApp::new(pool);

    let missing = app.send(Method::GET, "/api/departments", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = app.get("/api/departments", "not-a-jwt").await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_revokes_token(pool: PgPool) -> sqlx::Result<()> {
    create_user(&pool, "admin@example.edu", Role::Admin).await?;
    let app = TestApp::new(pool);
    let token = app.login("admin@example.edu").await;
    let other = app.login("admin@example.edu").await;

    assert_eq!(app.get("/api/profile", &token).await.status, StatusCode::OK);

    let logout = app.send(Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(app.get("/api/profile", &token).await.status, StatusCode::UNAUTHORIZED);

    // Other sessions stay open until logout-all
    assert_eq!(app.get("/api/profile", &other).await.status, StatusCode::OK);
    let all = app.send(Method::POST, "/api/logout/all", Some(&other), None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.json()["sessions_closed"], 1);
    assert_eq!(app.get("/api/profile", &other).await.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_profile_lists_courses(pool: PgPool) -> sqlx::Result<()> {
    let dept = create_department(&pool, "ISE").await?;
    create_course(&pool, "IS301", "Operating Systems", Some(dept.dept_id)).await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", Some(dept.dept_id)).await?;
    assign_course(&pool, "1", "IS301").await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let profile = app.get("/api/profile", &token).await.json();
    assert_eq!(profile["faculty_id"], "1");
    assert_eq!(profile["department"], "ISE");
    assert_eq!(profile["courses"][0]["course_id"], "IS301");

    let updated = app
        .put("/api/profile", &token, json!({ "name": "Dr. Asha Rao" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["profile"]["name"], "Dr. Asha Rao");
    Ok(())
}
