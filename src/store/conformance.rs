//! Backend conformance suite.
//!
//! Behavioral checks that every `Store` implementation must pass, run by the
//! unit tests of both the in-memory and the SQLite backend against fresh
//! store instances.

use crate::domain::{QuestionDraft, QuestionPatch, ROOT_FOLDER_ID, UNCATEGORIZED};
use crate::store::{MovePosition, Store, StoreError};

/// Runs every conformance check, constructing a fresh store per check.
pub(crate) fn run_all<S: Store>(fresh: impl Fn() -> S) {
    add_to_leaf_folder_stores_directly(&mut fresh());
    add_to_interior_folder_lands_in_uncategorized(&mut fresh());
    resolve_target_is_idempotent(&mut fresh());
    root_always_stores_directly(&mut fresh());
    add_rejects_blank_text(&mut fresh());
    update_and_patch_semantics(&mut fresh());
    bulk_delete_skips_unknown_ids(&mut fresh());
    delete_only_child_folds_questions_up(&mut fresh());
    delete_with_siblings_moves_questions_to_holding_folder(&mut fresh());
    nonempty_uncategorized_delete_is_refused(&mut fresh());
    empty_uncategorized_delete_succeeds(&mut fresh());
    cascade_delete_removes_subtree_and_questions(&mut fresh());
    reassignment_is_complete(&mut fresh());
    root_delete_is_refused(&mut fresh());
    move_into_descendant_is_rejected(&mut fresh());
    move_before_reparents_to_targets_parent(&mut fresh());
    breadcrumb_runs_root_first(&mut fresh());
    copy_clones_with_fresh_id(&mut fresh());
    search_is_case_insensitive_and_scoped(&mut fresh());
    search_treats_wildcard_characters_literally(&mut fresh());
    subtree_listing_spans_descendants(&mut fresh());
    stats_sort_by_count_then_name(&mut fresh());
    creating_first_subfolder_migrates_loose_questions(&mut fresh());
}

/// Scenario A: a leaf folder under the root holds questions directly.
fn add_to_leaf_folder_stores_directly(store: &mut impl Store) {
    let js = store.create_folder("JS", ROOT_FOLDER_ID).unwrap();
    let q = store
        .add_question(QuestionDraft::new("What is a closure?", "A captured scope."), js)
        .unwrap();
    assert_eq!(q.folder_id, js);
    assert!(!q.is_ai, "manual adds are not AI-captured");
}

/// Scenario B: an interior folder routes questions into "[Uncategorized]".
fn add_to_interior_folder_lands_in_uncategorized(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    store.create_folder("JS", lang).unwrap();
    store.create_folder("Py", lang).unwrap();

    let q = store
        .add_question(QuestionDraft::new("q", "a"), lang)
        .unwrap();
    let holding = store.folder(q.folder_id).unwrap().unwrap();
    assert_eq!(holding.name, UNCATEGORIZED);
    assert_eq!(holding.parent_id, lang);

    // Second add reuses the same holding folder
    let q2 = store
        .add_question(QuestionDraft::new("q2", "a2"), lang)
        .unwrap();
    assert_eq!(q2.folder_id, q.folder_id);
}

fn resolve_target_is_idempotent(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    store.create_folder("JS", lang).unwrap();
    let first = store.resolve_target_folder(lang).unwrap();
    let second = store.resolve_target_folder(lang).unwrap();
    assert_eq!(first, second);

    let uncategorized: Vec<_> = store
        .folders()
        .unwrap()
        .into_iter()
        .filter(|f| f.parent_id == lang && f.name == UNCATEGORIZED)
        .collect();
    assert_eq!(uncategorized.len(), 1, "no duplicate holding folders");
}

fn root_always_stores_directly(store: &mut impl Store) {
    store.create_folder("JS", ROOT_FOLDER_ID).unwrap();
    let q = store
        .add_question(QuestionDraft::new("q", "a"), ROOT_FOLDER_ID)
        .unwrap();
    assert_eq!(q.folder_id, ROOT_FOLDER_ID);
    assert_eq!(store.resolve_target_folder(ROOT_FOLDER_ID).unwrap(), 0);
}

fn add_rejects_blank_text(store: &mut impl Store) {
    let err = store
        .add_question(QuestionDraft::new("  ", "a"), ROOT_FOLDER_ID)
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    assert!(store.questions(None).unwrap().is_empty());
}

fn update_and_patch_semantics(store: &mut impl Store) {
    let q = store
        .add_question(QuestionDraft::new("old", "old answer"), ROOT_FOLDER_ID)
        .unwrap();

    let err = store.update_question(q.id, QuestionPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));

    store
        .update_question(
            q.id,
            QuestionPatch {
                answer: Some("new answer".to_string()),
                question_type: Some("essay".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let updated = &store.questions(Some(ROOT_FOLDER_ID)).unwrap()[0];
    assert_eq!(updated.question, "old");
    assert_eq!(updated.answer, "new answer");
    assert_eq!(updated.question_type.as_deref(), Some("essay"));

    let err = store
        .update_question(
            9999,
            QuestionPatch {
                answer: Some("x".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::QuestionNotFound { id: 9999 }));
}

fn bulk_delete_skips_unknown_ids(store: &mut impl Store) {
    let a = store
        .add_question(QuestionDraft::new("a", "a"), ROOT_FOLDER_ID)
        .unwrap();
    let b = store
        .add_question(QuestionDraft::new("b", "b"), ROOT_FOLDER_ID)
        .unwrap();
    let deleted = store.delete_questions(&[a.id, 424242, b.id]).unwrap();
    assert_eq!(deleted, 2);
    assert!(store.questions(None).unwrap().is_empty());
    assert_eq!(store.delete_questions(&[a.id]).unwrap(), 0);
}

/// Scenario C: deleting the only child reassigns its questions to the parent.
fn delete_only_child_folds_questions_up(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let py = store.create_folder("Py", lang).unwrap();
    store.add_question(QuestionDraft::new("q1", "a1"), py).unwrap();
    store.add_question(QuestionDraft::new("q2", "a2"), py).unwrap();

    store.delete_folder(py, false).unwrap();

    assert!(store.folder(py).unwrap().is_none());
    let questions = store.questions(Some(lang)).unwrap();
    assert_eq!(questions.len(), 2);
}

fn delete_with_siblings_moves_questions_to_holding_folder(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    let py = store.create_folder("Py", lang).unwrap();
    store.add_question(QuestionDraft::new("q", "a"), py).unwrap();

    store.delete_folder(py, false).unwrap();

    let holding = store
        .folders()
        .unwrap()
        .into_iter()
        .find(|f| f.parent_id == lang && f.name == UNCATEGORIZED)
        .expect("holding folder must be materialized");
    assert_eq!(store.questions(Some(holding.id)).unwrap().len(), 1);
    assert!(store.folder(py).unwrap().is_none());
    assert!(store.folder(js).unwrap().is_some());
}

/// Scenario D: a loaded "[Uncategorized]" folder cannot be deleted.
fn nonempty_uncategorized_delete_is_refused(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    store.create_folder("JS", lang).unwrap();
    let holding = store.resolve_target_folder(lang).unwrap();
    store
        .add_question(QuestionDraft::new("q", "a"), holding)
        .unwrap();

    let err = store.delete_folder(holding, false).unwrap_err();
    assert!(matches!(err, StoreError::NonEmptyUncategorized { .. }));
    assert!(store.folder(holding).unwrap().is_some());
    assert_eq!(store.questions(Some(holding)).unwrap().len(), 1);
}

fn empty_uncategorized_delete_succeeds(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    store.create_folder("JS", lang).unwrap();
    let holding = store.resolve_target_folder(lang).unwrap();

    store.delete_folder(holding, false).unwrap();
    assert!(store.folder(holding).unwrap().is_none());
}

fn cascade_delete_removes_subtree_and_questions(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    let q_js = store.add_question(QuestionDraft::new("q", "a"), js).unwrap();
    let q_root = store
        .add_question(QuestionDraft::new("keep", "a"), ROOT_FOLDER_ID)
        .unwrap();

    store.delete_folder(lang, true).unwrap();

    assert!(store.folder(lang).unwrap().is_none());
    assert!(store.folder(js).unwrap().is_none());
    let remaining = store.questions(None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, q_root.id);
    assert!(remaining.iter().all(|q| q.id != q_js.id));
}

/// After a reassign-mode delete, nothing references the deleted subtree.
fn reassignment_is_complete(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    let old = store.create_folder("Old", js).unwrap();
    store.add_question(QuestionDraft::new("q1", "a"), js).unwrap();
    store.add_question(QuestionDraft::new("q2", "a"), old).unwrap();

    let doomed = [js, old];
    store.delete_folder(js, false).unwrap();

    for question in store.questions(None).unwrap() {
        assert!(
            !doomed.contains(&question.folder_id),
            "question {} still references a deleted folder",
            question.id
        );
        assert!(store.folder(question.folder_id).unwrap().is_some());
    }
}

fn root_delete_is_refused(store: &mut impl Store) {
    for cascade in [false, true] {
        let err = store.delete_folder(ROOT_FOLDER_ID, cascade).unwrap_err();
        assert!(matches!(err, StoreError::RootProtected));
    }
    assert!(store.folder(ROOT_FOLDER_ID).unwrap().is_some());
}

/// Scenario E: moving a folder under its own descendant fails cleanly.
fn move_into_descendant_is_rejected(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();

    let err = store.move_folder(lang, js, MovePosition::Inside).unwrap_err();
    assert!(matches!(err, StoreError::WouldCycle { .. }));

    // Tree unchanged
    assert_eq!(store.folder(lang).unwrap().unwrap().parent_id, ROOT_FOLDER_ID);
    assert_eq!(store.folder(js).unwrap().unwrap().parent_id, lang);
}

fn move_before_reparents_to_targets_parent(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    let misc = store.create_folder("Misc", ROOT_FOLDER_ID).unwrap();

    // "before JS" means "same level as JS", i.e. under Lang
    store.move_folder(misc, js, MovePosition::Before).unwrap();
    assert_eq!(store.folder(misc).unwrap().unwrap().parent_id, lang);

    // "inside Lang" keeps it there; "after Lang" hoists it back to root
    store.move_folder(misc, lang, MovePosition::After).unwrap();
    assert_eq!(store.folder(misc).unwrap().unwrap().parent_id, ROOT_FOLDER_ID);
}

fn breadcrumb_runs_root_first(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let py = store.create_folder("Py", lang).unwrap();

    let path = store.folder_path(py).unwrap();
    let names: Vec<&str> = path.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["default", "Lang", "Py"]);
}

fn copy_clones_with_fresh_id(store: &mut impl Store) {
    let js = store.create_folder("JS", ROOT_FOLDER_ID).unwrap();
    let original = store
        .add_question(QuestionDraft::new("q", "a").with_type("quiz"), ROOT_FOLDER_ID)
        .unwrap();

    let copy = store.copy_question(original.id, js).unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.folder_id, js);
    assert_eq!(copy.question, original.question);
    assert_eq!(copy.answer, original.answer);
    assert_eq!(copy.question_type, original.question_type);
    assert_eq!(copy.is_ai, original.is_ai);

    // The original stays put
    assert_eq!(store.questions(Some(ROOT_FOLDER_ID)).unwrap().len(), 1);
}

fn search_is_case_insensitive_and_scoped(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    store
        .add_question(QuestionDraft::new("Explain JavaScript closures", "a"), js)
        .unwrap();
    store
        .add_question(
            QuestionDraft::new("Closure tables in SQL", "a"),
            ROOT_FOLDER_ID,
        )
        .unwrap();

    let all = store.search_by_title("closure", None).unwrap();
    assert_eq!(all.len(), 2);

    let scoped = store.search_by_title("CLOSURE", Some(lang)).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].folder_id, js);

    assert!(store.search_by_title("monads", None).unwrap().is_empty());
}

/// `%` and `_` in a search term are plain characters, not wildcards.
fn search_treats_wildcard_characters_literally(store: &mut impl Store) {
    store
        .add_question(
            QuestionDraft::new("Scored 100% on the quiz", "a"),
            ROOT_FOLDER_ID,
        )
        .unwrap();
    store
        .add_question(QuestionDraft::new("Scored 100 points", "a"), ROOT_FOLDER_ID)
        .unwrap();
    store
        .add_question(
            QuestionDraft::new("What does FOO_BAR expand to?", "a"),
            ROOT_FOLDER_ID,
        )
        .unwrap();

    let percent = store.search_by_title("100%", None).unwrap();
    assert_eq!(percent.len(), 1);
    assert!(percent[0].question.contains("100%"));

    let underscore = store.search_by_title("FOO_", None).unwrap();
    assert_eq!(underscore.len(), 1);
    assert!(underscore[0].question.contains("FOO_BAR"));
}

fn subtree_listing_spans_descendants(store: &mut impl Store) {
    let lang = store.create_folder("Lang", ROOT_FOLDER_ID).unwrap();
    let js = store.create_folder("JS", lang).unwrap();
    let py = store.create_folder("Py", lang).unwrap();
    store.add_question(QuestionDraft::new("q-js", "a"), js).unwrap();
    store.add_question(QuestionDraft::new("q-py", "a"), py).unwrap();
    store
        .add_question(QuestionDraft::new("q-root", "a"), ROOT_FOLDER_ID)
        .unwrap();

    let subtree = store.questions_in_subtree(lang).unwrap();
    assert_eq!(subtree.len(), 2);
    assert!(subtree.iter().all(|q| q.question != "q-root"));

    // A leaf's subtree is just its own questions
    assert_eq!(store.questions_in_subtree(js).unwrap().len(), 1);

    assert!(matches!(
        store.questions_in_subtree(404),
        Err(StoreError::FolderNotFound { id: 404 })
    ));
}

fn stats_sort_by_count_then_name(store: &mut impl Store) {
    let alpha = store.create_folder("Alpha", ROOT_FOLDER_ID).unwrap();
    let beta = store.create_folder("Beta", ROOT_FOLDER_ID).unwrap();
    store.add_question(QuestionDraft::new("q1", "a"), beta).unwrap();
    store.add_question(QuestionDraft::new("q2", "a"), beta).unwrap();
    store.add_question(QuestionDraft::new("q3", "a"), alpha).unwrap();

    let stats = store.folder_stats().unwrap();
    assert_eq!(stats[0].folder_id, beta);
    assert_eq!(stats[0].question_count, 2);
    // Tie between Alpha (1) and the others resolves by name ascending
    let alpha_pos = stats.iter().position(|s| s.folder_id == alpha).unwrap();
    let root_pos = stats.iter().position(|s| s.folder_id == ROOT_FOLDER_ID).unwrap();
    assert!(alpha_pos < root_pos, "Alpha sorts before default on equal-or-higher count");
}

fn creating_first_subfolder_migrates_loose_questions(store: &mut impl Store) {
    let js = store.create_folder("JS", ROOT_FOLDER_ID).unwrap();
    store.add_question(QuestionDraft::new("q1", "a"), js).unwrap();
    store.add_question(QuestionDraft::new("q2", "a"), js).unwrap();

    let basics = store.create_folder("Basics", js).unwrap();

    // The parent's loose questions moved into a fresh holding folder
    assert_eq!(store.question_count(js).unwrap(), 0);
    let holding = store
        .folders()
        .unwrap()
        .into_iter()
        .find(|f| f.parent_id == js && f.name == UNCATEGORIZED)
        .expect("holding folder must exist");
    assert_eq!(store.question_count(holding.id).unwrap(), 2);
    assert_eq!(store.question_count(basics).unwrap(), 0);
}
