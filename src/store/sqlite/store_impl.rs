//! Store trait implementation for SqliteStore.
//!
//! Row mapping between the legacy PascalCase columns and the snake_case
//! domain fields lives here, in one place. Mutating operations follow a
//! plan-then-apply shape: load a folder snapshot inside the transaction,
//! compute the decision via `store::placement`, apply it with SQL, commit.

use crate::domain::{Folder, Question, QuestionDraft, QuestionPatch, ROOT_FOLDER_ID, UNCATEGORIZED};
use crate::store::placement::{self, DeletePlan, Placement};
use crate::store::{
    FolderStat, FolderTree, MovePosition, PathEntry, Store, StoreError, StoreResult,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params, params_from_iter};

use super::SqliteStore;

// ===========================================
// Row Mapping
// ===========================================

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptTree(format!("invalid timestamp in database: {e}")))
}

fn load_folders(conn: &Connection) -> StoreResult<Vec<Folder>> {
    let mut stmt = conn.prepare("SELECT Id, Name, ParentId, CreateTime FROM Folders")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut folders = Vec::new();
    for row in rows {
        let (id, name, parent_id, created_raw) = row?;
        folders.push(Folder {
            id,
            name,
            parent_id,
            created_at: parse_timestamp(&created_raw)?,
        });
    }
    Ok(folders)
}

fn load_tree(conn: &Connection) -> StoreResult<FolderTree> {
    Ok(FolderTree::new(&load_folders(conn)?))
}

const QUESTION_COLUMNS: &str =
    "Id, Question, Answer, QuestionType, FolderId, IsAi, CreateTime";

type QuestionRow = (i64, String, String, Option<String>, i64, bool, String);

fn map_question_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn build_question(row: QuestionRow) -> StoreResult<Question> {
    let (id, question, answer, question_type, folder_id, is_ai, created_raw) = row;
    Ok(Question {
        id,
        question,
        answer,
        question_type,
        folder_id,
        is_ai,
        created_at: parse_timestamp(&created_raw)?,
    })
}

fn collect_questions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Vec<Question>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_question_row)?;
    let mut questions = Vec::new();
    for row in rows {
        questions.push(build_question(row?)?);
    }
    Ok(questions)
}

fn get_question(conn: &Connection, id: i64) -> StoreResult<Option<Question>> {
    let sql = format!("SELECT {QUESTION_COLUMNS} FROM AIResponses WHERE Id = ?");
    match conn.query_row(&sql, [id], map_question_row) {
        Ok(row) => Ok(Some(build_question(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::Database(e)),
    }
}

// ===========================================
// Shared Mutation Helpers
// ===========================================

fn insert_folder(conn: &Connection, name: &str, parent_id: i64) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Folders (Name, ParentId, CreateTime) VALUES (?, ?, ?)",
        params![name, parent_id, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn apply_placement(conn: &Connection, placement: Placement) -> StoreResult<i64> {
    match placement {
        Placement::Existing(id) => Ok(id),
        Placement::NewUncategorized { parent } => insert_folder(conn, UNCATEGORIZED, parent),
    }
}

fn count_in(conn: &Connection, folder_id: i64) -> StoreResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM AIResponses WHERE FolderId = ?",
        [folder_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Builds a `LIKE` pattern that matches the term as a literal substring.
///
/// `%`, `_` and `\` in the term are escaped; the queries carry a matching
/// `ESCAPE '\'` clause so the wildcards stay inert.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Builds `?,?,...` placeholders for an `IN` clause.
fn placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 2);
    for i in 0..n {
        if i > 0 {
            s.push(',');
        }
        s.push('?');
    }
    s
}

/// Reassigns every question in the given folders to the target folder.
fn reassign_questions(conn: &Connection, folders: &[i64], target: i64) -> StoreResult<()> {
    let sql = format!(
        "UPDATE AIResponses SET FolderId = ?1 WHERE FolderId IN ({})",
        placeholders(folders.len())
    );
    conn.execute(
        &sql,
        params_from_iter(std::iter::once(target).chain(folders.iter().copied())),
    )?;
    Ok(())
}

fn delete_questions_in(conn: &Connection, folders: &[i64]) -> StoreResult<()> {
    let sql = format!(
        "DELETE FROM AIResponses WHERE FolderId IN ({})",
        placeholders(folders.len())
    );
    conn.execute(&sql, params_from_iter(folders.iter().copied()))?;
    Ok(())
}

fn delete_folders_in(conn: &Connection, folders: &[i64]) -> StoreResult<()> {
    let sql = format!(
        "DELETE FROM Folders WHERE Id IN ({})",
        placeholders(folders.len())
    );
    conn.execute(&sql, params_from_iter(folders.iter().copied()))?;
    Ok(())
}

// ===========================================
// Store Implementation
// ===========================================

impl Store for SqliteStore {
    fn folders(&self) -> StoreResult<Vec<Folder>> {
        let mut folders = load_folders(&self.conn)?;
        folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(folders)
    }

    fn folder(&self, id: i64) -> StoreResult<Option<Folder>> {
        let row = self.conn.query_row(
            "SELECT Id, Name, ParentId, CreateTime FROM Folders WHERE Id = ?",
            [id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );
        match row {
            Ok((id, name, parent_id, created_raw)) => Ok(Some(Folder {
                id,
                name,
                parent_id,
                created_at: parse_timestamp(&created_raw)?,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn questions(&self, folder_id: Option<i64>) -> StoreResult<Vec<Question>> {
        match folder_id {
            Some(id) => collect_questions(
                &self.conn,
                &format!(
                    "SELECT {QUESTION_COLUMNS} FROM AIResponses
                     WHERE FolderId = ? ORDER BY CreateTime DESC, Id DESC"
                ),
                [id],
            ),
            None => collect_questions(
                &self.conn,
                &format!(
                    "SELECT {QUESTION_COLUMNS} FROM AIResponses
                     ORDER BY CreateTime DESC, Id DESC"
                ),
                [],
            ),
        }
    }

    fn questions_in_subtree(&self, folder_id: i64) -> StoreResult<Vec<Question>> {
        let scope = load_tree(&self.conn)?.descendants(folder_id)?;
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM AIResponses
             WHERE FolderId IN ({}) ORDER BY CreateTime DESC, Id DESC",
            placeholders(scope.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(scope.iter().copied()), map_question_row)?;
        let mut questions = Vec::new();
        for row in rows {
            questions.push(build_question(row?)?);
        }
        Ok(questions)
    }

    fn folder_path(&self, folder_id: i64) -> StoreResult<Vec<PathEntry>> {
        load_tree(&self.conn)?.ancestors(folder_id)
    }

    fn question_count(&self, folder_id: i64) -> StoreResult<u64> {
        if !load_tree(&self.conn)?.contains(folder_id) {
            return Err(StoreError::FolderNotFound { id: folder_id });
        }
        count_in(&self.conn, folder_id)
    }

    fn folder_stats(&self) -> StoreResult<Vec<FolderStat>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.Id, f.Name, COUNT(ar.Id)
             FROM Folders f
             LEFT JOIN AIResponses ar ON ar.FolderId = f.Id
             GROUP BY f.Id, f.Name
             ORDER BY COUNT(ar.Id) DESC, f.Name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FolderStat {
                folder_id: row.get(0)?,
                folder_name: row.get(1)?,
                question_count: row.get::<_, i64>(2)? as u64,
            })
        })?;
        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }

    fn search_by_title(&self, term: &str, scope: Option<i64>) -> StoreResult<Vec<Question>> {
        let pattern = like_pattern(term);
        match scope {
            None => collect_questions(
                &self.conn,
                &format!(
                    "SELECT {QUESTION_COLUMNS} FROM AIResponses
                     WHERE Question LIKE ? ESCAPE '\\'
                     ORDER BY CreateTime DESC, Id DESC"
                ),
                [pattern],
            ),
            Some(folder_id) => {
                let scope = load_tree(&self.conn)?.descendants(folder_id)?;
                let sql = format!(
                    "SELECT {QUESTION_COLUMNS} FROM AIResponses
                     WHERE Question LIKE ?1 ESCAPE '\\' AND FolderId IN ({})
                     ORDER BY CreateTime DESC, Id DESC",
                    placeholders(scope.len())
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let params = std::iter::once(rusqlite::types::Value::Text(pattern))
                    .chain(scope.iter().map(|&id| rusqlite::types::Value::Integer(id)));
                let rows = stmt.query_map(params_from_iter(params), map_question_row)?;
                let mut questions = Vec::new();
                for row in rows {
                    questions.push(build_question(row?)?);
                }
                Ok(questions)
            }
        }
    }

    fn add_question(&mut self, draft: QuestionDraft, folder_id: i64) -> StoreResult<Question> {
        draft.validate().map_err(StoreError::Invalid)?;

        let tx = self.transaction()?;
        let placement = placement::place_question(&load_tree(tx.conn())?, folder_id)?;
        let target = apply_placement(tx.conn(), placement)?;

        tx.conn().execute(
            "INSERT INTO AIResponses (Question, Answer, QuestionType, FolderId, IsAi, CreateTime)
             VALUES (?, ?, ?, ?, 0, ?)",
            params![
                draft.question,
                draft.answer,
                draft.question_type,
                target,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = tx.conn().last_insert_rowid();
        let question = get_question(tx.conn(), id)?
            .ok_or(StoreError::QuestionNotFound { id })?;
        tx.commit()?;
        Ok(question)
    }

    fn update_question(&mut self, id: i64, patch: QuestionPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Err(StoreError::Invalid("no fields to update".to_string()));
        }
        patch.validate().map_err(StoreError::Invalid)?;

        let mut assignments = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();
        if let Some(question) = patch.question {
            assignments.push("Question = ?");
            values.push(question.into());
        }
        if let Some(answer) = patch.answer {
            assignments.push("Answer = ?");
            values.push(answer.into());
        }
        if let Some(question_type) = patch.question_type {
            assignments.push("QuestionType = ?");
            values.push(question_type.into());
        }
        values.push(id.into());

        let sql = format!(
            "UPDATE AIResponses SET {} WHERE Id = ?",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::QuestionNotFound { id });
        }
        Ok(())
    }

    fn delete_question(&mut self, id: i64) -> StoreResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM AIResponses WHERE Id = ?", [id])?;
        if deleted == 0 {
            return Err(StoreError::QuestionNotFound { id });
        }
        Ok(())
    }

    fn delete_questions(&mut self, ids: &[i64]) -> StoreResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "DELETE FROM AIResponses WHERE Id IN ({})",
            placeholders(ids.len())
        );
        Ok(self
            .conn
            .execute(&sql, params_from_iter(ids.iter().copied()))?)
    }

    fn create_folder(&mut self, name: &str, parent_id: i64) -> StoreResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("folder name cannot be empty".to_string()));
        }

        let tx = self.transaction()?;
        let tree = load_tree(tx.conn())?;
        let loose = if tree.contains(parent_id) {
            count_in(tx.conn(), parent_id)?
        } else {
            0
        };
        let plan = placement::plan_folder_create(&tree, parent_id, loose)?;

        if plan.migrate_loose_questions {
            let holding = insert_folder(tx.conn(), UNCATEGORIZED, parent_id)?;
            tx.execute(
                "UPDATE AIResponses SET FolderId = ? WHERE FolderId = ?",
                params![holding, parent_id],
            )?;
        }
        let id = insert_folder(tx.conn(), name, parent_id)?;
        tx.commit()?;
        Ok(id)
    }

    fn rename_folder(&mut self, id: i64, new_name: &str) -> StoreResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::Invalid("folder name cannot be empty".to_string()));
        }
        let changed = self.conn.execute(
            "UPDATE Folders SET Name = ? WHERE Id = ?",
            params![new_name, id],
        )?;
        if changed == 0 {
            return Err(StoreError::FolderNotFound { id });
        }
        Ok(())
    }

    fn move_folder(
        &mut self,
        id: i64,
        target_id: i64,
        position: MovePosition,
    ) -> StoreResult<()> {
        let tx = self.transaction()?;
        let tree = load_tree(tx.conn())?;
        if !tree.contains(id) {
            return Err(StoreError::FolderNotFound { id });
        }
        let target_parent = tree
            .parent(target_id)
            .ok_or(StoreError::FolderNotFound { id: target_id })?;
        if tree.would_cycle(id, target_id)? {
            return Err(StoreError::WouldCycle {
                moved: id,
                target: target_id,
            });
        }
        let new_parent = match position {
            MovePosition::Inside => target_id,
            MovePosition::Before | MovePosition::After => target_parent,
        };
        tx.execute(
            "UPDATE Folders SET ParentId = ? WHERE Id = ?",
            params![new_parent, id],
        )?;
        tx.commit()
    }

    fn delete_folder(&mut self, id: i64, cascade: bool) -> StoreResult<()> {
        if id == ROOT_FOLDER_ID {
            return Err(StoreError::RootProtected);
        }

        let tx = self.transaction()?;
        let tree = load_tree(tx.conn())?;
        if !tree.contains(id) {
            return Err(StoreError::FolderNotFound { id });
        }

        if cascade {
            let doomed = tree.descendants(id)?;
            delete_questions_in(tx.conn(), &doomed)?;
            delete_folders_in(tx.conn(), &doomed)?;
            return tx.commit();
        }

        let plan = placement::plan_folder_delete(&tree, id, count_in(tx.conn(), id)?)?;
        match plan {
            DeletePlan::DropFolders { folders } => {
                delete_questions_in(tx.conn(), &folders)?;
                delete_folders_in(tx.conn(), &folders)?;
            }
            DeletePlan::Reassign { target, folders } => {
                let target = apply_placement(tx.conn(), target)?;
                reassign_questions(tx.conn(), &folders, target)?;
                delete_folders_in(tx.conn(), &folders)?;
            }
        }
        tx.commit()
    }

    fn move_question(&mut self, id: i64, folder_id: i64) -> StoreResult<()> {
        let tx = self.transaction()?;
        if get_question(tx.conn(), id)?.is_none() {
            return Err(StoreError::QuestionNotFound { id });
        }
        let placement = placement::place_question(&load_tree(tx.conn())?, folder_id)?;
        let target = apply_placement(tx.conn(), placement)?;
        tx.execute(
            "UPDATE AIResponses SET FolderId = ? WHERE Id = ?",
            params![target, id],
        )?;
        tx.commit()
    }

    fn copy_question(&mut self, id: i64, folder_id: i64) -> StoreResult<Question> {
        let tx = self.transaction()?;
        let source =
            get_question(tx.conn(), id)?.ok_or(StoreError::QuestionNotFound { id })?;
        let placement = placement::place_question(&load_tree(tx.conn())?, folder_id)?;
        let target = apply_placement(tx.conn(), placement)?;

        tx.conn().execute(
            "INSERT INTO AIResponses (Question, Answer, QuestionType, FolderId, IsAi, CreateTime)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                source.question,
                source.answer,
                source.question_type,
                target,
                source.is_ai,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let new_id = tx.conn().last_insert_rowid();
        let copy = get_question(tx.conn(), new_id)?
            .ok_or(StoreError::QuestionNotFound { id: new_id })?;
        tx.commit()?;
        Ok(copy)
    }

    fn resolve_target_folder(&mut self, requested: i64) -> StoreResult<i64> {
        let tx = self.transaction()?;
        let placement = placement::place_question(&load_tree(tx.conn())?, requested)?;
        let target = apply_placement(tx.conn(), placement)?;
        tx.commit()?;
        Ok(target)
    }
}
