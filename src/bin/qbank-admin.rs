//! # Question Bank Administration CLI
//!
//! Operational commands that do not go through the HTTP API: creating the first
//! admin account, applying migrations and checking configuration files.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use qbank_core::config::ConfigManager;
use qbank_core::constants::Role;
use qbank_core::database::{DatabaseConnection, DatabaseMigrations};
use qbank_core::logging::get_environment;
use qbank_core::models::{AuthSession, NewUser, User};
use qbank_core::web::auth::hash_password;

#[derive(Parser)]
#[command(name = "qbank-admin")]
#[command(about = "Question bank administration commands")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to load (development, test, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Configuration directory (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Apply pending database migrations
    Migrate,

    /// Load and validate configuration without connecting to anything
    ValidateConfig,

    /// Delete expired login sessions
    PurgeSessions,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish(),
    );

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let environment = cli.environment.unwrap_or_else(get_environment);
    let config_dir = cli.config_dir.unwrap_or_else(|| PathBuf::from("config"));
    let manager = ConfigManager::load_from_dir(&config_dir, &environment)
        .with_context(|| format!("Configuration for '{environment}' is invalid"))?;

    match cli.command {
        Commands::ValidateConfig => {
            let config = manager.config();
            println!("✅ Configuration for '{environment}' is valid");
            println!("   Config dir:      {}", manager.config_dir().display());
            println!("   Bind address:    {}", config.web.bind_address);
            println!(
                "   Pool size:       {}-{}",
                config.database.min_connections, config.database.max_connections
            );
            println!("   Token expiry:    {}h", config.auth.token_expiry_hours);
            println!("   Media root:      {}", config.media.root_dir.display());
            println!("   Paper output:    {}", config.paper.output_dir.display());
            Ok(())
        }
        Commands::Migrate => {
            let db = DatabaseConnection::connect(&manager.config().database).await?;
            DatabaseMigrations::run_all(db.pool()).await?;
            db.close().await;
            println!("✅ Migrations applied");
            Ok(())
        }
        Commands::PurgeSessions => {
            let db = DatabaseConnection::connect(&manager.config().database).await?;
            let purged = AuthSession::purge_expired(db.pool()).await?;
            db.close().await;
            println!("✅ Removed {purged} expired session(s)");
            Ok(())
        }
        Commands::CreateAdmin {
            email,
            password,
            first_name,
            last_name,
        } => {
            let email = email.trim().to_string();
            if email.is_empty() || password.is_empty() {
                bail!("Email and password must not be empty");
            }

            let db = DatabaseConnection::connect(&manager.config().database).await?;
            if User::find_by_email(db.pool(), &email).await?.is_some() {
                bail!("A user with email {email} already exists");
            }

            let password_hash = hash_password(&password)?;
            let user = User::create(
                db.pool(),
                NewUser {
                    username: email.clone(),
                    email,
                    password_hash,
                    role: Role::Admin,
                    first_name,
                    last_name,
                    is_staff: true,
                },
            )
            .await?;
            db.close().await;

            info!(user_id = user.id, "Admin account created");
            println!("✅ Admin account {} created (id {})", user.email, user.id);
            Ok(())
        }
    }
}
