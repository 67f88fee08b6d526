//! Item management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use davstore_core::error::AppError;
use davstore_entity::item::Item;
use davstore_service::{ItemFilter, MatchType};

/// Arguments for item commands
#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Item subcommand
    #[command(subcommand)]
    pub command: ItemCommand,
}

/// Item subcommands
#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Store a file as an item
    Upload {
        /// Collection path
        collection: String,
        /// Href, ending in .vcf or .ics
        href: String,
        /// File holding the payload
        file: PathBuf,
    },
    /// Print the payloads of items
    Get {
        /// Collection path
        collection: String,
        /// Hrefs to fetch
        #[arg(required = true)]
        hrefs: Vec<String>,
    },
    /// Find items whose payload contains a text
    Search {
        /// Collection path
        collection: String,
        /// Text to look for
        text: String,
    },
    /// Delete an item
    Delete {
        /// Collection path
        collection: String,
        /// Href
        href: String,
    },
    /// Move an item to another collection
    Move {
        /// Source collection path
        from: String,
        /// Source href
        href: String,
        /// Destination collection path
        to: String,
        /// Destination href (defaults to the source href)
        #[arg(long)]
        to_href: Option<String>,
    },
}

/// Item display row
#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    href: String,
    etag: String,
    name: String,
    modified: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            href: item.name.clone(),
            etag: item.etag().to_string(),
            name: item.full_name.clone().unwrap_or_default(),
            modified: item.last_modified(),
        }
    }
}

/// Execute item commands
pub async fn execute(args: &ItemArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    match &args.command {
        ItemCommand::Upload {
            collection,
            href,
            file,
        } => {
            let handle = super::require_collection(&store, collection).await?;
            let text = tokio::fs::read_to_string(file).await?;
            let item = handle.upload(href, &text).await?;
            if item.name != *href {
                output::print_warning(&format!("Stored under {} instead of {href}", item.name));
            }
            output::print_success(&format!("Uploaded {} ({})", item.name, item.etag()));
        }
        ItemCommand::Get { collection, hrefs } => {
            let handle = super::require_collection(&store, collection).await?;
            for (href, item) in handle.get_multi(hrefs).await? {
                match item {
                    Some(item) => match format {
                        OutputFormat::Table => print!("{}", item.text()),
                        OutputFormat::Json => output::print_item(&item, format),
                    },
                    None => output::print_warning(&format!("{href} not found")),
                }
            }
        }
        ItemCommand::Search { collection, text } => {
            let handle = super::require_collection(&store, collection).await?;
            let filter = ItemFilter::TextMatch {
                property: None,
                text: text.clone(),
                match_type: MatchType::Contains,
            };
            let found = handle.get_filtered(&[filter]).await?;
            let rows: Vec<ItemRow> = found.items.iter().map(ItemRow::from).collect();
            output::print_list(&rows, format);
        }
        ItemCommand::Delete { collection, href } => {
            let handle = super::require_collection(&store, collection).await?;
            handle.delete(Some(href)).await?;
            output::print_success(&format!("Deleted {href}"));
        }
        ItemCommand::Move {
            from,
            href,
            to,
            to_href,
        } => {
            let source = super::require_collection(&store, from).await?;
            let target = super::require_collection(&store, to).await?;
            let to_href = to_href.as_deref().unwrap_or(href);
            store.move_item(&source, href, &target, to_href).await?;
            output::print_success(&format!("Moved {from}/{href} to {to}/{to_href}"));
        }
    }

    Ok(())
}
