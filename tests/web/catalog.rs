//! Departments, courses, units, faculty and mappings over HTTP

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use super::TestApp;
use crate::common::*;
use qbank_core::constants::Role;

async fn admin_app(pool: PgPool) -> sqlx::Result<(TestApp, String)> {
    create_user(&pool, "admin@example.edu", Role::Admin).await?;
    let app = TestApp::new(pool);
    let token = app.login("admin@example.edu").await;
    Ok((app, token))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_department_crud(pool: PgPool) -> sqlx::Result<()> {
    let (app, token) = admin_app(pool).await?;

    let created = app
        .post("/api/departments", &token, json!({ "dept_name": "ISE" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let dept_id = created.json()["department"]["dept_id"]
        .as_i64()
        .expect("dept_id");

    let blank = app
        .post("/api/departments", &token, json!({ "dept_name": "  " }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let renamed = app
        .put(
            &format!("/api/departments/{dept_id}"),
            &token,
            json!({ "dept_name": "Information Science" }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.json()["department"]["dept_name"], "Information Science");

    let listed = app.get("/api/departments", &token).await.json();
    assert_eq!(listed["departments"].as_array().map(Vec::len), Some(1));

    let path = format!("/api/departments/{dept_id}");
    assert_eq!(app.delete(&path, &token).await.status, StatusCode::OK);
    assert_eq!(app.delete(&path, &token).await.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_create_validation(pool: PgPool) -> sqlx::Result<()> {
    let dept = create_department(&pool, "ISE").await?;
    let (app, token) = admin_app(pool).await?;

    let created = app
        .post(
            "/api/courses",
            &token,
            json!({
                "course_code": "IS301",
                "course_name": "Operating Systems",
                "dept_id": dept.dept_id,
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["course"]["department_name"], "ISE");

    let duplicate = app
        .post(
            "/api/courses",
            &token,
            json!({ "course_id": "IS301", "course_name": "Again" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.json()["error"]["code"], "CONFLICT");

    let unknown_dept = app
        .post(
            "/api/courses",
            &token,
            json!({ "course_id": "IS302", "course_name": "Networks", "department_id": 9999 }),
        )
        .await;
    assert_eq!(unknown_dept.status, StatusCode::NOT_FOUND);

    let missing_name = app
        .post("/api/courses", &token, json!({ "course_id": "IS303" }))
        .await;
    assert_eq!(missing_name.status, StatusCode::BAD_REQUEST);

    let filtered = app
        .get(&format!("/api/courses?department={}", dept.dept_id), &token)
        .await
        .json();
    assert_eq!(filtered["courses"].as_array().map(Vec::len), Some(1));

    let bad_filter = app.get("/api/courses?department=ise", &token).await;
    assert_eq!(bad_filter.status, StatusCode::BAD_REQUEST);

    let deleted = app.delete("/api/courses/IS301", &token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["deleted_course"]["course_name"], "Operating Systems");
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_cannot_manage_catalog(pool: PgPool) -> sqlx::Result<()> {
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    let app = TestApp::new(pool);
    let token = app.login("asha@example.edu").await;

    let response = app
        .post("/api/departments", &token, json!({ "dept_name": "ISE" }))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get("/api/admin-dashboard", &token).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get("/api/users", &token).await.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_units_unique_per_course(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let (app, token) = admin_app(pool).await?;

    let body = json!({ "course_id": "IS301", "unit_id": 1, "unit_name": "Processes" });
    assert_eq!(app.post("/api/units", &token, body.clone()).await.status, StatusCode::CREATED);
    assert_eq!(app.post("/api/units", &token, body).await.status, StatusCode::CONFLICT);

    let unknown_course = app
        .post(
            "/api/units",
            &token,
            json!({ "course_id": "XX999", "unit_id": 1, "unit_name": "Nope" }),
        )
        .await;
    assert_eq!(unknown_course.status, StatusCode::NOT_FOUND);

    let negative = app
        .post(
            "/api/units",
            &token,
            json!({ "course_id": "IS301", "unit_id": -3, "unit_name": "Backwards" }),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let units = app.get("/api/units?course_id=IS301", &token).await.json();
    assert_eq!(units["units"][0]["unit_name"], "Processes");
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_lifecycle_and_mappings(pool: PgPool) -> sqlx::Result<()> {
    create_course(&pool, "IS301", "Operating Systems", None).await?;
    let (app, token) = admin_app(pool).await?;

    let created = app
        .post(
            "/api/faculty",
            &token,
            json!({ "name": "Ravi Kumar", "email": "ravi@example.edu", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let f_id = created.json()["faculty"]["f_id"]
        .as_str()
        .expect("f_id")
        .to_string();
    assert_eq!(f_id, "1");

    let no_password = app
        .post(
            "/api/faculty",
            &token,
            json!({ "name": "No Pass", "email": "nopass@example.edu" }),
        )
        .await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);

    let mapping = json!({ "faculty_id": f_id, "course_id": "IS301" });
    let mapped = app.post("/api/faculty-courses", &token, mapping.clone()).await;
    assert_eq!(mapped.status, StatusCode::CREATED);
    assert_eq!(mapped.json()["mapping"]["faculty_name"], "Ravi Kumar");
    assert_eq!(
        app.post("/api/faculty-courses", &token, mapping).await.status,
        StatusCode::CONFLICT
    );

    // The new account can log in and sees its own mapping
    let faculty_token = app.login("ravi@example.edu").await;
    let own = app.get("/api/faculty-courses", &faculty_token).await.json();
    assert_eq!(own["mappings"].as_array().map(Vec::len), Some(1));

    let dashboard = app.get("/api/faculty-dashboard", &faculty_token).await.json();
    assert_eq!(dashboard["courses"][0]["code"], "IS301");

    let unmap = app
        .delete(&format!("/api/faculty-courses/{f_id}/IS301"), &token)
        .await;
    assert_eq!(unmap.status, StatusCode::OK);

    let removed = app.delete(&format!("/api/faculty/{f_id}"), &token).await;
    assert_eq!(removed.status, StatusCode::OK);
    let login = app
        .send(
            axum::http::Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "ravi@example.edu", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
    Ok(())
}
