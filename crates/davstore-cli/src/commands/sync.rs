//! Sync CLI command.

use clap::Args;

use crate::output::{self, OutputFormat};
use davstore_core::error::AppError;

/// Arguments for the sync command
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Collection path
    pub collection: String,
    /// Token from a previous sync (omit for a full listing)
    #[arg(short, long, default_value = "")]
    pub token: String,
}

/// Execute the sync command
pub async fn execute(args: &SyncArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;
    let handle = super::require_collection(&store, &args.collection).await?;

    let outcome = handle.sync(&args.token).await?;
    match format {
        OutputFormat::Json => output::print_item(&outcome, format),
        OutputFormat::Table => {
            output::print_kv("Token", &outcome.token);
            output::print_kv("Changed", &outcome.changes.len().to_string());
            for href in &outcome.changes {
                println!("    {href}");
            }
        }
    }
    Ok(())
}
