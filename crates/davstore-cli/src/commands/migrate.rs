//! Database migration commands.

use clap::{Args, Subcommand};

use crate::output;
use davstore_core::error::AppError;
use davstore_database::migration::run_migrations;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check connectivity and root presence
    Verify,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        MigrateCommand::Run => {
            let db = super::connect(&config).await?;
            println!("Running database migrations...");
            run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Verify => {
            let store = super::open_store(&config).await?;
            if store.verify().await? {
                output::print_success("Database reachable and root collection present.");
                output::print_kv("Root", &store.root().id.to_string());
            } else {
                output::print_warning("Root collection missing or database unhealthy.");
            }
        }
    }

    Ok(())
}
