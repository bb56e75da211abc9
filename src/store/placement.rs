//! Placement and deletion policy decisions.
//!
//! Both backends funnel their folder/question placement through these pure
//! functions: a decision is computed over a [`FolderTree`] snapshot, then the
//! backend applies the resulting plan inside its own transaction. Sibling
//! counts are evaluated once per call, never re-evaluated mid-cascade.

use crate::domain::{ROOT_FOLDER_ID, UNCATEGORIZED};
use crate::store::{FolderTree, StoreError, StoreResult};

// ===========================================
// Target Resolution
// ===========================================

/// Where a question placed "under" a requested folder actually lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Use this existing folder directly.
    Existing(i64),
    /// Materialize an "[Uncategorized]" child under `parent` and use it.
    NewUncategorized { parent: i64 },
}

/// Resolves the actual placement folder for a question.
///
/// A folder that already organizes its content into sub-folders never also
/// holds loose items: such items go to its "[Uncategorized]" child, created
/// on first need and reused afterward. The root is exempt and always holds
/// items directly.
pub fn place_question(tree: &FolderTree, requested: i64) -> StoreResult<Placement> {
    if requested == ROOT_FOLDER_ID {
        return Ok(Placement::Existing(ROOT_FOLDER_ID));
    }
    if !tree.contains(requested) {
        return Err(StoreError::FolderNotFound { id: requested });
    }
    if tree.children(requested).is_empty() {
        return Ok(Placement::Existing(requested));
    }
    match tree.child_named(requested, UNCATEGORIZED) {
        Some(child) => Ok(Placement::Existing(child)),
        None => Ok(Placement::NewUncategorized { parent: requested }),
    }
}

// ===========================================
// Folder Deletion
// ===========================================

/// Plan for a reassign-mode folder deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePlan {
    /// Remove the folders; nothing to reassign (empty "[Uncategorized]").
    DropFolders { folders: Vec<i64> },
    /// Reassign contained questions to `target`, then remove the folders.
    Reassign {
        target: Placement,
        folders: Vec<i64>,
    },
}

/// Decides how a reassign-mode deletion relocates orphaned questions.
///
/// `question_count` is the number of questions stored directly in the folder
/// being deleted; it only matters when refusing to empty a loaded
/// "[Uncategorized]" folder.
pub fn plan_folder_delete(
    tree: &FolderTree,
    id: i64,
    question_count: u64,
) -> StoreResult<DeletePlan> {
    if id == ROOT_FOLDER_ID {
        return Err(StoreError::RootProtected);
    }
    let name = tree
        .name(id)
        .ok_or(StoreError::FolderNotFound { id })?
        .to_string();
    let parent = tree
        .parent(id)
        .ok_or(StoreError::FolderNotFound { id })?;
    let folders = tree.descendants(id)?;

    // Folders parented directly under the root fold up into it.
    if parent == ROOT_FOLDER_ID {
        return Ok(DeletePlan::Reassign {
            target: Placement::Existing(ROOT_FOLDER_ID),
            folders,
        });
    }

    // An only child folds up one level, no holding-folder indirection.
    if tree.children(parent).len() == 1 {
        return Ok(DeletePlan::Reassign {
            target: Placement::Existing(parent),
            folders,
        });
    }

    if name == UNCATEGORIZED {
        // Never silently relocate items out of the designated holding folder.
        if question_count > 0 {
            return Err(StoreError::NonEmptyUncategorized { id });
        }
        return Ok(DeletePlan::DropFolders { folders });
    }

    let target = match tree.child_named(parent, UNCATEGORIZED) {
        Some(child) => Placement::Existing(child),
        None => Placement::NewUncategorized { parent },
    };
    Ok(DeletePlan::Reassign { target, folders })
}

// ===========================================
// Folder Creation
// ===========================================

/// Plan for inserting a new sub-folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePlan {
    /// The parent's loose questions must first move into a fresh
    /// "[Uncategorized]" child.
    pub migrate_loose_questions: bool,
}

/// Decides whether creating a folder under `parent` requires migrating the
/// parent's loose questions first.
///
/// Applies when a non-root leaf folder that holds questions gains its first
/// sub-folder: the questions move into "[Uncategorized]" so the parent never
/// mixes sub-folders with loose items. The root always holds items directly.
pub fn plan_folder_create(
    tree: &FolderTree,
    parent: i64,
    parent_question_count: u64,
) -> StoreResult<CreatePlan> {
    if !tree.contains(parent) {
        return Err(StoreError::FolderNotFound { id: parent });
    }
    let migrate = parent != ROOT_FOLDER_ID
        && tree.children(parent).is_empty()
        && parent_question_count > 0;
    Ok(CreatePlan {
        migrate_loose_questions: migrate,
    })
}
