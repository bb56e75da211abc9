//! SQLite schema creation and root-folder bootstrap.

use crate::domain::ROOT_FOLDER_ID;
use chrono::Utc;
use rusqlite::Connection;

/// Creates the question-bank schema.
///
/// Idempotent; safe to run at every open.
///
/// # Tables Created
/// - `Folders` - the folder tree (adjacency via `ParentId`)
/// - `AIResponses` - question/answer records
///
/// Column names keep the legacy PascalCase layout; the mapping to the
/// snake_case domain fields happens in one place, at the row-mapping
/// functions of the SQLite backend.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Folders (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT NOT NULL,
            ParentId INTEGER NOT NULL DEFAULT 0,
            CreateTime TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS AIResponses (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Question TEXT NOT NULL,
            Options TEXT,
            QuestionType TEXT,
            Answer TEXT NOT NULL,
            CreateTime TEXT NOT NULL,
            FolderId INTEGER NOT NULL DEFAULT 0,
            FolderName TEXT DEFAULT 'default',
            IsAi INTEGER NOT NULL DEFAULT 1
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_folders_parent ON Folders(ParentId);
         CREATE INDEX IF NOT EXISTS idx_responses_folder ON AIResponses(FolderId);
         CREATE INDEX IF NOT EXISTS idx_responses_created ON AIResponses(CreateTime);",
    )?;

    ensure_root_folder(conn)?;

    Ok(())
}

/// Seeds `Folders(Id=0, Name='default', ParentId=0)` if it is missing.
///
/// Runs before any other row is written; every other folder hangs off this
/// one and it can never be deleted.
fn ensure_root_folder(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO Folders (Id, Name, ParentId, CreateTime)
         VALUES (?1, 'default', ?1, ?2)",
        rusqlite::params![ROOT_FOLDER_ID, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}
