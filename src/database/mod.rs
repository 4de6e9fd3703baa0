//! # Database Operations
//!
//! Connection pooling and embedded schema migrations for the PostgreSQL store.
//!
//! - [`connection`] - pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig) and health checks
//! - [`migrations`] - embedded `migrations/` directory applied through `sqlx::migrate!`
//!
//! ```rust,no_run
//! use qbank_core::config::QbankConfig;
//! use qbank_core::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QbankConfig::default();
//! let db = DatabaseConnection::connect(&config.database).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::DatabaseMigrations;
