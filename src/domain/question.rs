//! Question records, new-question drafts, and update patches.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored question/answer record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Free-form classification ("multiple choice", "essay", ...). Optional.
    pub question_type: Option<String>,
    pub folder_id: i64,
    /// True for records captured from an AI responder, false for manual adds.
    pub is_ai: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a new question.
///
/// Both `question` and `answer` must be non-blank; `validate` is called by
/// the store before any insert.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    pub question_type: Option<String>,
}

impl QuestionDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            question_type: None,
        }
    }

    pub fn with_type(mut self, question_type: impl Into<String>) -> Self {
        self.question_type = Some(question_type.into());
        self
    }

    /// Checks the draft against the validation rules.
    ///
    /// Returns a human-readable reason on failure; the store wraps it in
    /// `StoreError::Invalid`.
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text cannot be empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Err("answer text cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Partial update for an existing question.
///
/// `None` fields are left untouched. An all-`None` patch is rejected by the
/// store rather than silently doing nothing.
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub question_type: Option<String>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.question_type.is_none()
    }

    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(q) = &self.question
            && q.trim().is_empty()
        {
            return Err("question text cannot be empty".to_string());
        }
        if let Some(a) = &self.answer
            && a.trim().is_empty()
        {
            return Err("answer text cannot be empty".to_string());
        }
        Ok(())
    }
}
