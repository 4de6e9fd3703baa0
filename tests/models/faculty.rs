//! Faculty and Faculty-Course Model Tests

use sqlx::PgPool;

use crate::common::*;
use qbank_core::models::{Course, Faculty, FacultyCourse, NewFaculty};

#[sqlx::test(migrations = "./migrations")]
async fn test_next_f_id_counts_numeric_ids_only(pool: PgPool) -> sqlx::Result<()> {
    assert_eq!(Faculty::next_f_id(&pool).await?, "1");

    create_faculty(&pool, "7", "Asha Rao", "asha@example.edu", None).await?;
    Faculty::create(
        &pool,
        NewFaculty {
            f_id: "F-legacy".to_string(),
            name: "Legacy".to_string(),
            email: "legacy@example.edu".to_string(),
            user_id: None,
            department_id: None,
        },
    )
    .await?;

    assert_eq!(Faculty::next_f_id(&pool).await?, "8");
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_for_user_prefers_linked_profile(pool: PgPool) -> sqlx::Result<()> {
    let (user, linked) = create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;

    let found = Faculty::find_for_user(&pool, user.id, "someone-else@example.edu")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(found.f_id, linked.f_id);

    // Unlinked profile found through the email
    Faculty::create(
        &pool,
        NewFaculty {
            f_id: "2".to_string(),
            name: "Unlinked".to_string(),
            email: "unlinked@example.edu".to_string(),
            user_id: None,
            department_id: None,
        },
    )
    .await?;
    let by_email = Faculty::find_for_user(&pool, -1, "unlinked@example.edu")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(by_email.f_id, "2");

    assert!(Faculty::find_for_user(&pool, -1, "nobody@example.edu").await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_faculty_update_keeps_unset_fields(pool: PgPool) -> sqlx::Result<()> {
    let dept = create_department(&pool, "ISE").await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", Some(dept.dept_id)).await?;

    let updated = Faculty::update(&pool, "1", Some("Dr. Asha Rao".into()), None, None)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(updated.name, "Dr. Asha Rao");
    assert_eq!(updated.email, "asha@example.edu");
    assert_eq!(updated.department_id, Some(dept.dept_id));
    assert_eq!(updated.department_name(&pool).await?, "ISE");

    assert!(Faculty::update(&pool, "99", None, None, None).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mappings_and_course_departments(pool: PgPool) -> sqlx::Result<()> {
    let ise = create_department(&pool, "ISE").await?;
    let cse = create_department(&pool, "CSE").await?;
    create_course(&pool, "IS301", "Operating Systems", Some(ise.dept_id)).await?;
    create_course(&pool, "IS302", "Networks", Some(ise.dept_id)).await?;
    create_course(&pool, "CS101", "Programming", Some(cse.dept_id)).await?;
    create_course(&pool, "GE100", "General", None).await?;
    create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;
    create_faculty(&pool, "2", "Ravi K", "ravi@example.edu", None).await?;

    for course in ["IS301", "IS302", "CS101", "GE100"] {
        assign_course(&pool, "1", course).await?;
    }
    assert!(FacultyCourse::exists(&pool, "1", "IS301").await?);
    assert!(!FacultyCourse::exists(&pool, "2", "IS301").await?);
    assert!(FacultyCourse::create(&pool, "1", "IS301").await.is_err());

    let departments = Faculty::course_departments(&pool, "1").await?;
    let names: Vec<_> = departments.iter().map(|d| d.dept_name.as_str()).collect();
    assert_eq!(names, vec!["CSE", "ISE"]);

    let courses = Course::list_for_faculty(&pool, "1").await?;
    assert_eq!(courses.len(), 4);
    let general = courses
        .iter()
        .find(|c| c.course_id == "GE100")
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(general.department_name, "Not Assigned");

    let details = FacultyCourse::list_details(&pool, Some("1")).await?;
    assert_eq!(details.len(), 4);
    assert!(details.iter().all(|d| d.faculty_name == "Asha Rao"));

    let counts = FacultyCourse::course_counts(&pool).await?;
    let ravi = counts
        .iter()
        .find(|c| c.name == "Ravi K")
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(ravi.course_count, 0);

    assert!(FacultyCourse::delete(&pool, "1", "GE100").await?);
    assert!(!FacultyCourse::delete(&pool, "1", "GE100").await?);
    Ok(())
}
