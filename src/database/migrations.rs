//! Embedded schema migrations.
//!
//! Files under `migrations/` follow the `YYYYMMDDHHMMSS_description.sql` naming
//! convention and are compiled into the binary. sqlx tracks applied versions in
//! `_sqlx_migrations` and serialises concurrent runners with an advisory lock.

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply every outstanding migration
    pub async fn run_all(pool: &PgPool) -> Result<()> {
        let known = MIGRATOR.iter().count();
        info!(migrations = known, "Running database migrations");
        MIGRATOR.run(pool).await?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Versions compiled into this binary, oldest first
    pub fn embedded_versions() -> Vec<i64> {
        MIGRATOR.iter().map(|m| m.version).collect()
    }
}
