#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Question Bank Core
//!
//! Backend for an academic question bank: departments, courses, units, faculty,
//! questions with images and equations, and the assembly of exam papers as
//! `.docx` documents.
//!
//! ## Module Organization
//!
//! - [`models`] - PostgreSQL-backed records and read models
//! - [`query_builder`] - Pagination and dynamic question filters
//! - [`paper`] - Exam paper layout and the `.docx` writer
//! - [`web`] - Axum REST API with token authentication and role checks
//! - [`database`] - Connection pool and embedded migrations
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup and domain log helpers
//! - [`error`] - Crate error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qbank_core::config::ConfigManager;
//! use qbank_core::database::{DatabaseConnection, DatabaseMigrations};
//! use qbank_core::web::{create_app, state::AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::load()?.into_config();
//! let db = DatabaseConnection::connect(&config.database).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//!
//! let app = create_app(AppState::new(config, db.into_pool())?);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests (integration tests need DATABASE_URL)
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod paper;
pub mod query_builder;
pub mod web;

pub use config::{ConfigManager, QbankConfig};
pub use constants::{DifficultyLevel, PaperPart, QuestionType, Role};
pub use error::{QbankError, Result};
pub use paper::{assemble_paper, PaperHeader, PaperQuestion};
