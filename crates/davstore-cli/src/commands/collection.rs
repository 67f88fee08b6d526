//! Collection management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use davstore_core::error::AppError;
use davstore_entity::collection::Metadata;
use davstore_entity::collection::tag::TAG_PROPERTY;
use davstore_entity::node::Depth;
use davstore_service::DavNode;

/// Arguments for collection commands
#[derive(Debug, Args)]
pub struct CollectionArgs {
    /// Collection subcommand
    #[command(subcommand)]
    pub command: CollectionCommand,
}

/// Collection tag selectable on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TagArg {
    /// Address book (vCards)
    Addressbook,
    /// Calendar (iCalendar objects)
    Calendar,
}

impl TagArg {
    fn property(self) -> &'static str {
        match self {
            Self::Addressbook => "VADDRESSBOOK",
            Self::Calendar => "VCALENDAR",
        }
    }
}

/// Collection subcommands
#[derive(Debug, Subcommand)]
pub enum CollectionCommand {
    /// List a collection and its direct children
    List {
        /// Collection path
        #[arg(default_value = "/")]
        path: String,
        /// Lookup depth: 0, 1 or infinity
        #[arg(short, long, default_value = "1")]
        depth: String,
    },
    /// Create a collection, optionally replacing its contents
    Create {
        /// Collection path (at most two segments)
        path: String,
        /// Collection tag
        #[arg(short, long, value_enum)]
        tag: Option<TagArg>,
        /// Display name
        #[arg(long)]
        displayname: Option<String>,
        /// Files to import, one item each. Replaces existing contents.
        #[arg(short, long)]
        import: Vec<PathBuf>,
        /// Skip confirmation prompt when replacing contents
        #[arg(long)]
        force: bool,
    },
    /// Delete a collection and everything below it
    Delete {
        /// Collection path
        path: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show or replace collection metadata
    Meta {
        /// Collection path
        path: String,
        /// `key=value` pairs replacing all metadata
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

/// Listing row
#[derive(Debug, Serialize, Tabled)]
struct ListingRow {
    /// Collection or item
    kind: &'static str,
    /// Path or href
    name: String,
    /// Id
    id: String,
    /// Last modified
    modified: String,
}

/// Metadata row
#[derive(Debug, Serialize, Tabled)]
struct MetaRow {
    key: String,
    value: String,
}

/// Execute collection commands
pub async fn execute(
    args: &CollectionArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    match &args.command {
        CollectionCommand::List { path, depth } => {
            let nodes = store.discover(path, Depth::parse(depth)?).await?;
            if nodes.is_empty() {
                return Err(AppError::not_found(format!("Nothing found at {path}")));
            }
            let mut rows = Vec::with_capacity(nodes.len());
            for node in &nodes {
                rows.push(match node {
                    DavNode::Collection(handle) => ListingRow {
                        kind: "collection",
                        name: format!("/{}/", handle.path()),
                        id: handle.id().to_string(),
                        modified: handle.last_modified().await?,
                    },
                    DavNode::Item { item, .. } => ListingRow {
                        kind: "item",
                        name: item.name.clone(),
                        id: item.id.to_string(),
                        modified: item.last_modified(),
                    },
                });
            }
            output::print_list(&rows, format);
        }
        CollectionCommand::Create {
            path,
            tag,
            displayname,
            import,
            force,
        } => {
            let mut props = Metadata::new();
            if let Some(tag) = tag {
                props.insert(TAG_PROPERTY.to_string(), tag.property().to_string());
            }
            if let Some(name) = displayname {
                props.insert("D:displayname".to_string(), name.clone());
            }

            let mut items = Vec::with_capacity(import.len());
            for file in import {
                items.push(tokio::fs::read_to_string(file).await?);
            }

            let replacing = !items.is_empty() || !props.is_empty();
            if replacing
                && store.collection_at(path).await?.is_some()
                && !super::confirm(&format!("Replace the contents of {path}?"), *force)?
            {
                println!("Cancelled.");
                return Ok(());
            }

            let handle = store
                .create_collection(
                    path,
                    (!items.is_empty()).then_some(items.as_slice()),
                    (!props.is_empty()).then_some(&props),
                )
                .await?;
            output::print_success(&format!(
                "Collection /{}/ ready (id: {}, {} item(s) imported)",
                handle.path(),
                handle.id(),
                items.len()
            ));
        }
        CollectionCommand::Delete { path, force } => {
            let handle = super::require_collection(&store, path).await?;
            if handle.id() == store.root().id {
                return Err(AppError::validation("The root collection cannot be deleted"));
            }
            if !super::confirm(&format!("Delete {path} and everything below it?"), *force)? {
                println!("Cancelled.");
                return Ok(());
            }
            handle.delete(None).await?;
            output::print_success(&format!("Collection {path} deleted."));
        }
        CollectionCommand::Meta { path, set } => {
            let handle = super::require_collection(&store, path).await?;
            if !set.is_empty() {
                let props = parse_pairs(set)?;
                handle.set_meta(&props).await?;
                output::print_success(&format!("{} metadata key(s) written.", props.len()));
            }
            let rows: Vec<MetaRow> = handle
                .get_meta()
                .await?
                .into_iter()
                .map(|(key, value)| MetaRow { key, value })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn parse_pairs(pairs: &[String]) -> Result<Metadata, AppError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| AppError::validation(format!("Expected key=value, got {pair}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let props = parse_pairs(&["tag=VCALENDAR".to_string(), "C:color = #ff0000".to_string()])
            .unwrap();
        assert_eq!(props.get("tag").map(String::as_str), Some("VCALENDAR"));
        assert_eq!(props.get("C:color").map(String::as_str), Some(" #ff0000"));
        assert!(parse_pairs(&["broken".to_string()]).is_err());
    }
}
