//! In-memory store backend.
//!
//! Adjacency-list implementation used by the test suites and anywhere a
//! throwaway store is handy. Shares all placement/deletion policy with the
//! SQLite backend via [`crate::store::placement`]; every mutating operation
//! computes its full plan before touching state, so errors leave the store
//! unchanged.

use crate::domain::{Folder, Question, QuestionDraft, QuestionPatch, ROOT_FOLDER_ID, UNCATEGORIZED};
use crate::store::placement::{self, DeletePlan, Placement};
use crate::store::{FolderStat, FolderTree, MovePosition, PathEntry, Store, StoreError, StoreResult};
use chrono::Utc;
use std::collections::HashSet;

/// Non-persistent question-bank store.
#[derive(Debug)]
pub struct MemoryStore {
    folders: Vec<Folder>,
    questions: Vec<Question>,
    next_folder_id: i64,
    next_question_id: i64,
}

impl MemoryStore {
    /// Creates an empty store with the root folder already seeded.
    pub fn new() -> Self {
        Self {
            folders: vec![Folder {
                id: ROOT_FOLDER_ID,
                name: "default".to_string(),
                parent_id: ROOT_FOLDER_ID,
                created_at: Utc::now(),
            }],
            questions: Vec::new(),
            next_folder_id: 1,
            next_question_id: 1,
        }
    }

    fn tree(&self) -> FolderTree {
        FolderTree::new(&self.folders)
    }

    fn alloc_folder_id(&mut self) -> i64 {
        let id = self.next_folder_id;
        self.next_folder_id += 1;
        id
    }

    fn alloc_question_id(&mut self) -> i64 {
        let id = self.next_question_id;
        self.next_question_id += 1;
        id
    }

    fn insert_folder(&mut self, name: &str, parent_id: i64) -> i64 {
        let id = self.alloc_folder_id();
        self.folders.push(Folder {
            id,
            name: name.to_string(),
            parent_id,
            created_at: Utc::now(),
        });
        id
    }

    /// Turns a placement decision into a concrete folder id, materializing
    /// the "[Uncategorized]" child when the plan calls for one.
    fn apply_placement(&mut self, placement: Placement) -> i64 {
        match placement {
            Placement::Existing(id) => id,
            Placement::NewUncategorized { parent } => self.insert_folder(UNCATEGORIZED, parent),
        }
    }

    fn count_in(&self, folder_id: i64) -> u64 {
        self.questions
            .iter()
            .filter(|q| q.folder_id == folder_id)
            .count() as u64
    }

    /// Newest first, id descending as the tiebreak.
    fn sort_newest_first(questions: &mut [Question]) {
        questions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn folders(&self) -> StoreResult<Vec<Folder>> {
        let mut folders = self.folders.clone();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(folders)
    }

    fn folder(&self, id: i64) -> StoreResult<Option<Folder>> {
        Ok(self.folders.iter().find(|f| f.id == id).cloned())
    }

    fn questions(&self, folder_id: Option<i64>) -> StoreResult<Vec<Question>> {
        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| folder_id.is_none_or(|id| q.folder_id == id))
            .cloned()
            .collect();
        Self::sort_newest_first(&mut questions);
        Ok(questions)
    }

    fn questions_in_subtree(&self, folder_id: i64) -> StoreResult<Vec<Question>> {
        let scope: HashSet<i64> = self.tree().descendants(folder_id)?.into_iter().collect();
        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| scope.contains(&q.folder_id))
            .cloned()
            .collect();
        Self::sort_newest_first(&mut questions);
        Ok(questions)
    }

    fn folder_path(&self, folder_id: i64) -> StoreResult<Vec<PathEntry>> {
        self.tree().ancestors(folder_id)
    }

    fn question_count(&self, folder_id: i64) -> StoreResult<u64> {
        if self.tree().contains(folder_id) {
            Ok(self.count_in(folder_id))
        } else {
            Err(StoreError::FolderNotFound { id: folder_id })
        }
    }

    fn folder_stats(&self) -> StoreResult<Vec<FolderStat>> {
        let mut stats: Vec<FolderStat> = self
            .folders
            .iter()
            .map(|f| FolderStat {
                folder_id: f.id,
                folder_name: f.name.clone(),
                question_count: self.count_in(f.id),
            })
            .collect();
        stats.sort_by(|a, b| {
            b.question_count
                .cmp(&a.question_count)
                .then_with(|| a.folder_name.cmp(&b.folder_name))
        });
        Ok(stats)
    }

    fn search_by_title(&self, term: &str, scope: Option<i64>) -> StoreResult<Vec<Question>> {
        let scope_set: Option<HashSet<i64>> = match scope {
            Some(id) => Some(self.tree().descendants(id)?.into_iter().collect()),
            None => None,
        };
        let needle = term.to_lowercase();
        let mut questions: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| {
                scope_set
                    .as_ref()
                    .is_none_or(|set| set.contains(&q.folder_id))
            })
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Self::sort_newest_first(&mut questions);
        Ok(questions)
    }

    fn add_question(&mut self, draft: QuestionDraft, folder_id: i64) -> StoreResult<Question> {
        draft.validate().map_err(StoreError::Invalid)?;
        let placement = placement::place_question(&self.tree(), folder_id)?;
        let target = self.apply_placement(placement);

        let question = Question {
            id: self.alloc_question_id(),
            question: draft.question,
            answer: draft.answer,
            question_type: draft.question_type,
            folder_id: target,
            is_ai: false,
            created_at: Utc::now(),
        };
        self.questions.push(question.clone());
        Ok(question)
    }

    fn update_question(&mut self, id: i64, patch: QuestionPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Err(StoreError::Invalid("no fields to update".to_string()));
        }
        patch.validate().map_err(StoreError::Invalid)?;
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(StoreError::QuestionNotFound { id })?;
        if let Some(text) = patch.question {
            question.question = text;
        }
        if let Some(answer) = patch.answer {
            question.answer = answer;
        }
        if let Some(question_type) = patch.question_type {
            question.question_type = Some(question_type);
        }
        Ok(())
    }

    fn delete_question(&mut self, id: i64) -> StoreResult<()> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or(StoreError::QuestionNotFound { id })?;
        self.questions.remove(index);
        Ok(())
    }

    fn delete_questions(&mut self, ids: &[i64]) -> StoreResult<usize> {
        let ids: HashSet<i64> = ids.iter().copied().collect();
        let before = self.questions.len();
        self.questions.retain(|q| !ids.contains(&q.id));
        Ok(before - self.questions.len())
    }

    fn create_folder(&mut self, name: &str, parent_id: i64) -> StoreResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("folder name cannot be empty".to_string()));
        }
        let tree = self.tree();
        let loose = if tree.contains(parent_id) {
            self.count_in(parent_id)
        } else {
            0
        };
        let plan = placement::plan_folder_create(&tree, parent_id, loose)?;

        if plan.migrate_loose_questions {
            let holding = self.insert_folder(UNCATEGORIZED, parent_id);
            for question in &mut self.questions {
                if question.folder_id == parent_id {
                    question.folder_id = holding;
                }
            }
        }
        Ok(self.insert_folder(name, parent_id))
    }

    fn rename_folder(&mut self, id: i64, new_name: &str) -> StoreResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::Invalid("folder name cannot be empty".to_string()));
        }
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FolderNotFound { id })?;
        folder.name = new_name.to_string();
        Ok(())
    }

    fn move_folder(
        &mut self,
        id: i64,
        target_id: i64,
        position: MovePosition,
    ) -> StoreResult<()> {
        let tree = self.tree();
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
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FolderNotFound { id })?;
        folder.parent_id = new_parent;
        Ok(())
    }

    fn delete_folder(&mut self, id: i64, cascade: bool) -> StoreResult<()> {
        if id == ROOT_FOLDER_ID {
            return Err(StoreError::RootProtected);
        }
        let tree = self.tree();
        if !tree.contains(id) {
            return Err(StoreError::FolderNotFound { id });
        }

        if cascade {
            let doomed: HashSet<i64> = tree.descendants(id)?.into_iter().collect();
            self.questions.retain(|q| !doomed.contains(&q.folder_id));
            self.folders.retain(|f| !doomed.contains(&f.id));
            return Ok(());
        }

        let plan = placement::plan_folder_delete(&tree, id, self.count_in(id))?;
        match plan {
            DeletePlan::DropFolders { folders } => {
                let doomed: HashSet<i64> = folders.into_iter().collect();
                self.questions.retain(|q| !doomed.contains(&q.folder_id));
                self.folders.retain(|f| !doomed.contains(&f.id));
            }
            DeletePlan::Reassign { target, folders } => {
                let target = self.apply_placement(target);
                let doomed: HashSet<i64> = folders.into_iter().collect();
                for question in &mut self.questions {
                    if doomed.contains(&question.folder_id) {
                        question.folder_id = target;
                    }
                }
                self.folders.retain(|f| !doomed.contains(&f.id));
            }
        }
        Ok(())
    }

    fn move_question(&mut self, id: i64, folder_id: i64) -> StoreResult<()> {
        if !self.questions.iter().any(|q| q.id == id) {
            return Err(StoreError::QuestionNotFound { id });
        }
        let placement = placement::place_question(&self.tree(), folder_id)?;
        let target = self.apply_placement(placement);
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(StoreError::QuestionNotFound { id })?;
        question.folder_id = target;
        Ok(())
    }

    fn copy_question(&mut self, id: i64, folder_id: i64) -> StoreResult<Question> {
        let source = self
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or(StoreError::QuestionNotFound { id })?;
        let placement = placement::place_question(&self.tree(), folder_id)?;
        let target = self.apply_placement(placement);

        let copy = Question {
            id: self.alloc_question_id(),
            folder_id: target,
            created_at: Utc::now(),
            ..source
        };
        self.questions.push(copy.clone());
        Ok(copy)
    }

    fn resolve_target_folder(&mut self, requested: i64) -> StoreResult<i64> {
        let placement = placement::place_question(&self.tree(), requested)?;
        Ok(self.apply_placement(placement))
    }
}
