//! Folder records and the reserved folder names.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Id of the permanent root folder.
///
/// The root is seeded at store bootstrap, can never be deleted, and its
/// `parent_id` points back at itself (a sentinel, not a real cycle).
pub const ROOT_FOLDER_ID: i64 = 0;

/// Reserved name of the auto-managed holding folder.
///
/// The placement policy matches this label exactly: a folder that organizes
/// its content into sub-folders gets one of these materialized under it the
/// first time a loose question needs a home.
pub const UNCATEGORIZED: &str = "[Uncategorized]";

/// A node in the folder tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Returns true for the permanent root folder.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID
    }

    /// Returns true if this is an auto-managed "[Uncategorized]" folder.
    pub fn is_uncategorized(&self) -> bool {
        self.name == UNCATEGORIZED
    }
}
