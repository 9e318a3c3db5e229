//! Question and choice persistence for the quiz service.
//!
//! Implements the data-access layer: question creation (with its choices in
//! one transaction), question lookup by id, and choice listing by owning
//! question. Neither entity is ever updated or deleted.
//!
//! All operations are plain functions over a borrowed [`rusqlite::Connection`];
//! the caller decides where the connection comes from (in practice a pooled
//! connection from `quiz-db`, scoped to one request).

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("question not found: {0}")]
    QuestionNotFound(i64),
}

/// A persisted quiz question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Storage-generated identifier.
    pub id: i64,
    /// Free-text prompt.
    pub question_text: String,
}

/// A persisted answer choice, owned by exactly one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Storage-generated identifier.
    pub id: i64,
    /// Display text; may be absent.
    pub choice_text: Option<String>,
    /// Whether this choice is a correct answer. Any number of a question's
    /// choices may carry the flag.
    pub is_correct: bool,
    /// The owning question's id.
    pub question_id: i64,
}

/// Input shape for a choice at question-creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewChoice {
    pub choice_text: Option<String>,
    pub is_correct: bool,
}

/// Retrieves a question by id.
pub fn get_question(conn: &Connection, id: i64) -> Result<Question, StoreError> {
    conn.query_row(
        "SELECT id, question_text FROM questions WHERE id = ?1",
        [id],
        map_row_to_question,
    )
    .optional()?
    .ok_or(StoreError::QuestionNotFound(id))
}

/// Returns whether a question with the given id exists.
pub fn question_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM questions WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Lists all choices belonging to the given question, ordered by id.
///
/// Returns an empty vec both for a question with no choices and for an
/// unknown question id; use [`question_exists`] to tell the two apart.
pub fn list_choices(conn: &Connection, question_id: i64) -> Result<Vec<Choice>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, choice_text, is_correct, question_id
         FROM choices WHERE question_id = ?1 ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([question_id], map_row_to_choice)?;
    let mut choices = Vec::new();
    for row in rows {
        choices.push(row?);
    }
    Ok(choices)
}

/// Creates a question together with its choices and returns the generated
/// question id.
///
/// The question insert, the id read, and every choice insert happen inside
/// one transaction, so a half-written question is never visible to readers
/// and never survives a failure.
pub fn create_question_with_choices(
    conn: &Connection,
    question_text: &str,
    choices: &[NewChoice],
) -> Result<i64, StoreError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO questions (question_text) VALUES (?1)",
        [question_text],
    )?;
    let question_id = tx.last_insert_rowid();

    for choice in choices {
        tx.execute(
            "INSERT INTO choices (choice_text, is_correct, question_id) VALUES (?1, ?2, ?3)",
            params![choice.choice_text, choice.is_correct, question_id],
        )?;
    }

    tx.commit()?;

    tracing::debug!(
        question_id,
        choice_count = choices.len(),
        "created question"
    );
    Ok(question_id)
}

fn map_row_to_question(row: &Row) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        question_text: row.get(1)?,
    })
}

fn map_row_to_choice(row: &Row) -> rusqlite::Result<Choice> {
    Ok(Choice {
        id: row.get(0)?,
        choice_text: row.get(1)?,
        is_correct: row.get(2)?,
        question_id: row.get(3)?,
    })
}
