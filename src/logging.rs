//! # Structured Logging Module
//!
//! Environment-aware structured logging that writes human-readable output to the
//! console and JSON lines to a per-process file under `log/`.

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Where and how verbosely the process logs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    environment: String,
    level: String,
    directory: PathBuf,
}

impl LogSettings {
    fn from_env() -> Self {
        let environment = get_environment();
        let level = get_log_level(&environment);
        let directory = std::env::var("QBANK_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("log"));
        Self {
            environment,
            level,
            directory,
        }
    }

    /// `{env}.{pid}.{YYYYmmdd_HHMMSS}.log`
    fn file_name(&self) -> String {
        format!(
            "{}.{}.{}.log",
            self.environment,
            std::process::id(),
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// `RUST_LOG` wins over the environment default
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber: readable console output plus JSON lines on disk.
///
/// Safe to call more than once; only the first call does anything. When the
/// log directory cannot be created the process logs to the console only.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let settings = LogSettings::from_env();
        let console = fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_filter(settings.filter());

        if let Err(e) = fs::create_dir_all(&settings.directory) {
            let _ = tracing_subscriber::registry().with(console).try_init();
            tracing::warn!(
                error = %e,
                directory = %settings.directory.display(),
                "Log directory unavailable, console logging only"
            );
            return;
        }

        let file_name = settings.file_name();
        let (file_writer, guard) = tracing_appender::non_blocking(
            tracing_appender::rolling::never(&settings.directory, &file_name),
        );
        let json_file = fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_filter(settings.filter());

        // A subscriber may already be installed by a test harness
        if tracing_subscriber::registry()
            .with(console)
            .with(json_file)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            environment = %settings.environment,
            level = %settings.level,
            log_file = %settings.directory.join(&file_name).display(),
            "Structured logging initialized"
        );

        // The non-blocking writer flushes on drop; keep it for the whole process
        std::mem::forget(guard);
    });
}

/// `QBANK_ENV`, then `APP_ENV`, defaulting to `development`
pub fn get_environment() -> String {
    std::env::var("QBANK_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> String {
    if environment == "production" {
        "info".to_string()
    } else {
        "debug".to_string()
    }
}

/// Log structured data for database operations
pub fn log_database_operation(
    operation: &str,
    table: Option<&str>,
    record_id: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        table = table,
        record_id = record_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "DATABASE_OPERATION"
    );
}

/// Log authentication events (logins, logouts, rejected credentials)
pub fn log_auth_event(event: &str, user_id: Option<i32>, email: Option<&str>, status: &str) {
    tracing::info!(
        event = %event,
        user_id = user_id,
        email = email,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "AUTH_EVENT"
    );
}

/// Log paper generation
pub fn log_paper_operation(
    operation: &str,
    course_code: &str,
    faculty_id: Option<&str>,
    question_count: usize,
    total_marks: i64,
    status: &str,
) {
    tracing::info!(
        operation = %operation,
        course_code = %course_code,
        faculty_id = faculty_id,
        question_count = question_count,
        total_marks = total_marks,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "PAPER_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
