//! Storage engine: the `Store` trait and its two backends.
//!
//! All folder/question state is owned by a store. The tree-maintenance logic
//! (placement policy, cycle guard, deletion orchestration) is shared between
//! backends: decisions are computed over a [`FolderTree`] snapshot in
//! [`placement`], each backend only applies the resulting plan atomically.

pub mod memory;
pub mod placement;
pub mod schema;
pub mod sqlite;
pub mod tree;

#[cfg(test)]
pub(crate) mod conformance;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use tree::{FolderTree, PathEntry};

use crate::domain::{Folder, Question, QuestionDraft, QuestionPatch};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ===========================================
// Error Taxonomy
// ===========================================

/// Errors reported by the storage engine.
///
/// Every error leaves the store unchanged: mutating operations either apply
/// fully or not at all.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced folder does not exist.
    #[error("folder not found: {id}")]
    FolderNotFound { id: i64 },

    /// The referenced question does not exist.
    #[error("question not found: {id}")]
    QuestionNotFound { id: i64 },

    /// Attempt to delete the permanent root folder.
    #[error("the root folder cannot be deleted")]
    RootProtected,

    /// A folder move that would make a folder its own ancestor.
    ///
    /// The field holding the moved folder's id must not be called `source`:
    /// thiserror reserves that name for the error-chain cause.
    #[error("moving folder {moved} under folder {target} would create a cycle")]
    WouldCycle { moved: i64, target: i64 },

    /// Refusal to delete an "[Uncategorized]" folder that still holds questions.
    #[error(
        "folder {id} is a non-empty [Uncategorized] folder; move its questions elsewhere first"
    )]
    NonEmptyUncategorized { id: i64 },

    /// Stored folder data contains a cycle or dangling parent reference.
    #[error("corrupt folder tree: {0}")]
    CorruptTree(String),

    /// Rejected input: blank question/answer text, blank folder name, or an
    /// empty update patch.
    #[error("validation failed: {0}")]
    Invalid(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ===========================================
// Shared Result Types
// ===========================================

/// Where a moved folder lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePosition {
    /// Same level as the target, before it.
    Before,
    /// Same level as the target, after it.
    After,
    /// As a child of the target.
    Inside,
}

/// Per-folder question count, for the stats view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderStat {
    pub folder_id: i64,
    pub folder_name: String,
    pub question_count: u64,
}

// ===========================================
// Store Trait
// ===========================================

/// The question-bank storage interface.
///
/// Two interchangeable implementations exist: [`MemoryStore`] (adjacency
/// lists, used by tests) and [`SqliteStore`] (persistent). Callers depend
/// only on this trait; both backends share the placement and deletion
/// policies.
pub trait Store {
    // --- read-only queries ---

    /// All folders, ordered by name.
    fn folders(&self) -> StoreResult<Vec<Folder>>;

    /// A single folder by id.
    fn folder(&self, id: i64) -> StoreResult<Option<Folder>>;

    /// Questions in one folder (exact match), or all questions, newest first.
    fn questions(&self, folder_id: Option<i64>) -> StoreResult<Vec<Question>>;

    /// Questions in a folder and all of its descendants, newest first.
    fn questions_in_subtree(&self, folder_id: i64) -> StoreResult<Vec<Question>>;

    /// Breadcrumb path from the root to the given folder.
    fn folder_path(&self, folder_id: i64) -> StoreResult<Vec<PathEntry>>;

    /// Count of questions stored directly in the folder (no subtree).
    fn question_count(&self, folder_id: i64) -> StoreResult<u64>;

    /// Per-folder question counts, sorted count descending then name ascending.
    fn folder_stats(&self) -> StoreResult<Vec<FolderStat>>;

    /// Case-insensitive substring search over question text.
    ///
    /// With a scope folder, only that folder's subtree is searched.
    fn search_by_title(&self, term: &str, scope: Option<i64>) -> StoreResult<Vec<Question>>;

    // --- mutations ---

    /// Adds a question under the requested folder, after target resolution.
    fn add_question(&mut self, draft: QuestionDraft, folder_id: i64) -> StoreResult<Question>;

    /// Applies a partial update to a question.
    fn update_question(&mut self, id: i64, patch: QuestionPatch) -> StoreResult<()>;

    /// Deletes a single question.
    fn delete_question(&mut self, id: i64) -> StoreResult<()>;

    /// Deletes a batch of questions; unknown ids are skipped. Returns the
    /// number actually removed.
    fn delete_questions(&mut self, ids: &[i64]) -> StoreResult<usize>;

    /// Creates a folder under the given parent, returning its id.
    ///
    /// If the parent is a non-root leaf folder that holds questions, those
    /// questions are first migrated into a fresh "[Uncategorized]" child so
    /// the parent never mixes sub-folders with loose items.
    fn create_folder(&mut self, name: &str, parent_id: i64) -> StoreResult<i64>;

    /// Renames a folder in place.
    fn rename_folder(&mut self, id: i64, new_name: &str) -> StoreResult<()>;

    /// Reparents a folder relative to a drop target.
    fn move_folder(&mut self, id: i64, target_id: i64, position: MovePosition)
    -> StoreResult<()>;

    /// Deletes a folder subtree.
    ///
    /// With `cascade`, contained questions are deleted too; otherwise they
    /// are reassigned per the deletion policy. Fails on the root folder and
    /// on non-empty "[Uncategorized]" folders.
    fn delete_folder(&mut self, id: i64, cascade: bool) -> StoreResult<()>;

    /// Moves a question under the requested folder, after target resolution.
    fn move_question(&mut self, id: i64, folder_id: i64) -> StoreResult<()>;

    /// Copies a question under the requested folder, after target resolution.
    ///
    /// The clone gets a fresh id and timestamp and keeps the source's
    /// `is_ai` flag.
    fn copy_question(&mut self, id: i64, folder_id: i64) -> StoreResult<Question>;

    /// Resolves the folder a question placed "under" `requested` actually
    /// lands in, materializing an "[Uncategorized]" child when needed.
    fn resolve_target_folder(&mut self, requested: i64) -> StoreResult<i64>;
}
