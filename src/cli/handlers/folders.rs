//! Folder command handlers (folders, mkdir, rename, mv-folder, rmdir, path, stats).

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::open_store;
use crate::cli::output::{FolderListing, Output, OutputFormat};
use crate::cli::{
    FoldersArgs, MkdirArgs, MvFolderArgs, PathArgs, PositionArg, RenameArgs, RmdirArgs, StatsArgs,
};
use crate::domain::ROOT_FOLDER_ID;
use crate::store::{FolderTree, Store, StoreResult};

/// Flattens the folder tree into display order: depth-first, children
/// ascending by id.
fn tree_listing(tree: &FolderTree) -> StoreResult<Vec<FolderListing>> {
    // Validates the snapshot is acyclic before walking it
    tree.descendants(ROOT_FOLDER_ID)?;

    let mut listings = Vec::new();
    let mut stack = vec![(ROOT_FOLDER_ID, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        listings.push(FolderListing {
            id,
            name: tree.name(id).unwrap_or_default().to_string(),
            parent_id: tree.parent(id).unwrap_or(ROOT_FOLDER_ID),
            depth,
        });
        for &child in tree.children(id).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    Ok(listings)
}

pub fn handle_folders(args: &FoldersArgs, db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;
    let folders = store.folders().with_context(|| "failed to list folders")?;
    let listings = tree_listing(&FolderTree::new(&folders))?;

    match args.format {
        OutputFormat::Human => {
            for entry in &listings {
                println!("{}{} [{}]", "  ".repeat(entry.depth), entry.name, entry.id);
            }
        }
        OutputFormat::Json => {
            let out = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

/// Result of a folder creation for JSON output.
#[derive(Debug, Serialize)]
pub struct MkdirResult {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
}

pub fn handle_mkdir(args: &MkdirArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    let id = store
        .create_folder(&args.name, args.parent)
        .with_context(|| format!("failed to create folder '{}'", args.name))?;

    match args.format {
        OutputFormat::Human => {
            println!("Created folder '{}' [{}]", args.name.trim(), id);
        }
        OutputFormat::Json => {
            let out = Output::new(MkdirResult {
                id,
                name: args.name.trim().to_string(),
                parent_id: args.parent,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_rename(args: &RenameArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    store
        .rename_folder(args.id, &args.name)
        .with_context(|| format!("failed to rename folder {}", args.id))?;
    println!("Renamed folder {} to '{}'", args.id, args.name.trim());
    Ok(())
}

pub fn handle_mv_folder(args: &MvFolderArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    store
        .move_folder(args.id, args.target, args.position.into())
        .with_context(|| format!("failed to move folder {}", args.id))?;

    let where_to = match args.position {
        PositionArg::Before => "before",
        PositionArg::After => "after",
        PositionArg::Inside => "inside",
    };
    println!("Moved folder {} {} folder {}", args.id, where_to, args.target);
    Ok(())
}

pub fn handle_rmdir(args: &RmdirArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    store
        .delete_folder(args.id, args.cascade)
        .with_context(|| format!("failed to delete folder {}", args.id))?;

    if args.cascade {
        println!("Deleted folder {} and its subtree", args.id);
    } else {
        println!("Deleted folder {}", args.id);
    }
    Ok(())
}

pub fn handle_path(args: &PathArgs, db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;
    let path = store
        .folder_path(args.folder)
        .with_context(|| format!("failed to resolve path of folder {}", args.folder))?;

    match args.format {
        OutputFormat::Human => {
            let names: Vec<&str> = path.iter().map(|e| e.name.as_str()).collect();
            println!("{}", names.join(" / "));
        }
        OutputFormat::Json => {
            let out = Output::new(path);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_stats(args: &StatsArgs, db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;
    let stats = store
        .folder_stats()
        .with_context(|| "failed to compute folder stats")?;

    match args.format {
        OutputFormat::Human => {
            if stats.is_empty() {
                println!("No folders found.");
            } else {
                for stat in &stats {
                    println!("{} ({})", stat.folder_name, stat.question_count);
                }
            }
        }
        OutputFormat::Json => {
            let out = Output::new(stats);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
