//! Core types: Folder, Question, drafts and update patches

mod folder;
mod question;

pub use folder::{Folder, ROOT_FOLDER_ID, UNCATEGORIZED};
pub use question::{Question, QuestionDraft, QuestionPatch};
