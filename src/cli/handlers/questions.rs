//! Question command handlers (add, ls, update, rm, mv, cp).

use anyhow::{Context, Result};
use std::path::Path;

use super::{format_question_line, open_store};
use crate::cli::output::{Output, OutputFormat};
use crate::cli::{AddArgs, CpArgs, ListArgs, MvArgs, RmArgs, UpdateArgs};
use crate::domain::{QuestionDraft, QuestionPatch};
use crate::store::Store;

pub fn handle_add(args: &AddArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;

    let mut draft = QuestionDraft::new(&args.question, &args.answer);
    if let Some(question_type) = &args.question_type {
        draft = draft.with_type(question_type);
    }

    let question = store
        .add_question(draft, args.folder)
        .with_context(|| "failed to add question")?;

    match args.format {
        OutputFormat::Human => {
            if question.folder_id == args.folder {
                println!("Added question [{}]", question.id);
            } else {
                // Interior folders hold questions in a managed subfolder
                println!(
                    "Added question [{}] (filed under folder {})",
                    question.id, question.folder_id
                );
            }
        }
        OutputFormat::Json => {
            let out = Output::new(question);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_list(args: &ListArgs, db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;

    let questions = match (args.folder, args.subtree) {
        (Some(folder), true) => store
            .questions_in_subtree(folder)
            .with_context(|| format!("failed to list folder {} subtree", folder))?,
        (folder, _) => store
            .questions(folder)
            .with_context(|| "failed to list questions")?,
    };

    match args.format {
        OutputFormat::Human => {
            if questions.is_empty() {
                println!("No questions found.");
            } else {
                for q in &questions {
                    println!("{}", format_question_line(q));
                }
            }
        }
        OutputFormat::Json => {
            let out = Output::new(questions);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_update(args: &UpdateArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;

    let patch = QuestionPatch {
        question: args.question.clone(),
        answer: args.answer.clone(),
        question_type: args.question_type.clone(),
    };
    store
        .update_question(args.id, patch)
        .with_context(|| format!("failed to update question {}", args.id))?;

    println!("Updated question [{}]", args.id);
    Ok(())
}

pub fn handle_rm(args: &RmArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    let deleted = store
        .delete_questions(&args.ids)
        .with_context(|| "failed to delete questions")?;

    if deleted == args.ids.len() {
        println!("Deleted {} question(s)", deleted);
    } else {
        println!(
            "Deleted {} question(s), {} id(s) not found",
            deleted,
            args.ids.len() - deleted
        );
    }
    Ok(())
}

pub fn handle_mv(args: &MvArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    store
        .move_question(args.id, args.folder)
        .with_context(|| format!("failed to move question {}", args.id))?;
    println!("Moved question [{}] to folder {}", args.id, args.folder);
    Ok(())
}

pub fn handle_cp(args: &CpArgs, db_path: &Path) -> Result<()> {
    let mut store = open_store(db_path)?;
    let copy = store
        .copy_question(args.id, args.folder)
        .with_context(|| format!("failed to copy question {}", args.id))?;

    match args.format {
        OutputFormat::Human => {
            println!(
                "Copied question [{}] to [{}] in folder {}",
                args.id, copy.id, copy.folder_id
            );
        }
        OutputFormat::Json => {
            let out = Output::new(copy);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
