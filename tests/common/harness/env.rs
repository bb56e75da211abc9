//! Isolated test environment with a temp database.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use super::QbankCommand;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// JSON envelope emitted by `--format json`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
struct CreatedFolder {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CreatedQuestion {
    id: i64,
    folder_id: i64,
}

/// Isolated test environment with a temporary database file.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Provides methods for seeding folders and questions through the CLI.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("qbank.db");
        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    /// Returns the path to the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates a QbankCommand configured for this test environment.
    pub fn cmd(&self) -> QbankCommand {
        QbankCommand::new().db(&self.db_path)
    }

    /// Creates a folder via the CLI and returns its id.
    pub fn mkdir(&self, name: &str, parent: i64) -> i64 {
        let envelope: Envelope<CreatedFolder> = self
            .cmd()
            .args(["mkdir", name, "--parent", &parent.to_string()])
            .json_success();
        envelope.data.id
    }

    /// Adds a question via the CLI, returning its id and the folder it
    /// actually landed in.
    pub fn add(&self, question: &str, answer: &str, folder: i64) -> (i64, i64) {
        let envelope: Envelope<CreatedQuestion> = self
            .cmd()
            .args(["add", question, answer, "--folder", &folder.to_string()])
            .json_success();
        (envelope.data.id, envelope.data.folder_id)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
