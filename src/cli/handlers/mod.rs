//! Command handlers for the CLI.

mod completions;
mod folders;
mod questions;
mod search;

use std::path::Path;

use anyhow::{Context, Result};

use crate::store::SqliteStore;

// Re-export public items
pub use completions::handle_completions;
pub use folders::{
    handle_folders, handle_mkdir, handle_mv_folder, handle_path, handle_rename, handle_rmdir,
    handle_stats,
};
pub use questions::{handle_add, handle_cp, handle_list, handle_mv, handle_rm, handle_update};
pub use search::handle_search;

// ===========================================
// Shared Utilities
// ===========================================

/// Opens the question bank database, creating it on first use.
pub(crate) fn open_store(db_path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// One-line listing for a question: id, truncated text, optional type.
pub(crate) fn format_question_line(q: &crate::domain::Question) -> String {
    let text = truncate_str(&q.question, 60);
    match &q.question_type {
        Some(t) => format!("[{}] {} ({})", q.id, text, t),
        None => format!("[{}] {}", q.id, text),
    }
}
