//! Search command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::{format_question_line, open_store};
use crate::cli::SearchArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::store::Store;

pub fn handle_search(args: &SearchArgs, db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;
    let matches = store
        .search_by_title(&args.term, args.folder)
        .with_context(|| format!("search failed for '{}'", args.term))?;

    match args.format {
        OutputFormat::Human => {
            if matches.is_empty() {
                println!("No questions match '{}'.", args.term);
            } else {
                for q in &matches {
                    println!("{}", format_question_line(q));
                }
            }
        }
        OutputFormat::Json => {
            let out = Output::new(matches);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
