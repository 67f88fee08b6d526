//! Retention CLI command.

use clap::Args;

use crate::output::{self, OutputFormat};
use davstore_core::error::AppError;

/// Arguments for the purge command
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Only purge this collection
    #[arg(short, long)]
    pub collection: Option<String>,
}

/// Execute the purge command
pub async fn execute(args: &PurgeArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    let stats = match &args.collection {
        Some(path) => super::require_collection(&store, path).await?.purge().await?,
        None => store.purge_all().await?,
    };
    match format {
        OutputFormat::Json => output::print_item(&stats, format),
        OutputFormat::Table => {
            output::print_success("Retention applied.");
            output::print_kv("Tombstones", &stats.tombstones.to_string());
            output::print_kv("Snapshots", &stats.snapshots.to_string());
        }
    }
    Ok(())
}
