//! User and Session Model Tests

use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::common::*;
use qbank_core::constants::Role;
use qbank_core::models::{AuthSession, Faculty, User, UserProfileUpdate};
use qbank_core::web::auth::verify_password;

#[sqlx::test(migrations = "./migrations")]
async fn test_user_create_and_lookup(pool: PgPool) -> sqlx::Result<()> {
    let user = create_user(&pool, "admin@example.edu", Role::Admin).await?;
    assert!(user.is_active);
    assert!(user.is_staff);
    assert_eq!(user.role, Role::Admin);
    assert!(verify_password(TEST_PASSWORD, &user.password_hash));

    let by_email = User::find_by_email(&pool, "admin@example.edu")
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert_eq!(by_email.id, user.id);

    assert!(User::find_by_email(&pool, "missing@example.edu").await?.is_none());
    assert!(create_user(&pool, "admin@example.edu", Role::Faculty).await.is_err());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_update_syncs_username(pool: PgPool) -> sqlx::Result<()> {
    let user = create_user(&pool, "old@example.edu", Role::Faculty).await?;

    let updated = User::update_profile(
        &pool,
        user.id,
        UserProfileUpdate {
            first_name: Some("Asha".into()),
            email: Some("new@example.edu".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.first_name, "Asha");
    assert_eq!(updated.last_name, user.last_name);
    assert_eq!(updated.email, "new@example.edu");
    assert_eq!(updated.username, "new@example.edu");

    User::touch_last_login(&pool, user.id).await?;
    let reloaded = User::find_by_id(&pool, user.id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    assert!(reloaded.last_login.is_some());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sessions_expire_and_revoke(pool: PgPool) -> sqlx::Result<()> {
    let user = create_user(&pool, "faculty@example.edu", Role::Faculty).await?;

    let live = AuthSession::create(&pool, user.id, Utc::now() + Duration::hours(1)).await?;
    let stale = AuthSession::create(&pool, user.id, Utc::now() - Duration::minutes(1)).await?;

    assert!(AuthSession::find_active(&pool, live.session_id, user.id).await?.is_some());
    assert!(AuthSession::find_active(&pool, stale.session_id, user.id).await?.is_none());
    // Another user's id never matches
    assert!(AuthSession::find_active(&pool, live.session_id, user.id + 1).await?.is_none());

    assert_eq!(AuthSession::purge_expired(&pool).await?, 1);
    assert!(AuthSession::delete(&pool, live.session_id).await?);

    AuthSession::create(&pool, user.id, Utc::now() + Duration::hours(1)).await?;
    AuthSession::create(&pool, user.id, Utc::now() + Duration::hours(1)).await?;
    assert_eq!(AuthSession::delete_all_for_user(&pool, user.id).await?, 2);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_user_removes_faculty_profile(pool: PgPool) -> sqlx::Result<()> {
    let (user, faculty) = create_faculty(&pool, "1", "Asha Rao", "asha@example.edu", None).await?;

    assert!(User::delete(&pool, user.id).await?);
    assert!(Faculty::find_by_id(&pool, &faculty.f_id).await?.is_none());
    Ok(())
}
