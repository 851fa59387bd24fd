//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record and its insert payload.
//! - Provide field validation used by callers before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `create_date` is either a real date or `None`, never a sentinel string.
//! - Only `title` and `content` are mutable after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 255;
/// Maximum content length, counted in characters.
pub const CONTENT_MAX_CHARS: usize = 512;

/// Surrogate primary key assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(i64);

impl MemoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for MemoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Persisted memo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    pub content: String,
    /// Serialized as `YYYY-MM-DD`, or `null` when absent.
    pub create_date: Option<NaiveDate>,
}

impl Memo {
    /// Builds the record a successful insert of `new` under `id` produces.
    pub fn from_new(id: MemoId, new: NewMemo) -> Self {
        Self {
            id,
            title: new.title,
            content: new.content,
            create_date: new.create_date,
        }
    }
}

impl Display for Memo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Memo(id={}, title={:?}, chars={})",
            self.id,
            self.title,
            self.content.chars().count()
        )
    }
}

/// Insert payload: a memo before the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMemo {
    pub title: String,
    pub content: String,
    pub create_date: Option<NaiveDate>,
}

impl NewMemo {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            create_date: None,
        }
    }

    pub fn with_create_date(mut self, create_date: NaiveDate) -> Self {
        self.create_date = Some(create_date);
        self
    }

    /// Checks required fields and length limits.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        validate_fields(&self.title, &self.content)
    }
}

/// Caller-side validation failure; rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    EmptyTitle,
    EmptyContent,
    TitleTooLong { chars: usize, max: usize },
    ContentTooLong { chars: usize, max: usize },
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "title is {chars} characters, limit is {max}")
            }
            Self::ContentTooLong { chars, max } => {
                write!(f, "content is {chars} characters, limit is {max}")
            }
        }
    }
}

impl Error for MemoValidationError {}

/// Validates a title/content pair as written by insert and update.
///
/// Whitespace-only values count as empty.
pub fn validate_fields(title: &str, content: &str) -> Result<(), MemoValidationError> {
    if title.trim().is_empty() {
        return Err(MemoValidationError::EmptyTitle);
    }
    if content.trim().is_empty() {
        return Err(MemoValidationError::EmptyContent);
    }

    let title_chars = title.chars().count();
    if title_chars > TITLE_MAX_CHARS {
        return Err(MemoValidationError::TitleTooLong {
            chars: title_chars,
            max: TITLE_MAX_CHARS,
        });
    }

    let content_chars = content.chars().count();
    if content_chars > CONTENT_MAX_CHARS {
        return Err(MemoValidationError::ContentTooLong {
            chars: content_chars,
            max: CONTENT_MAX_CHARS,
        });
    }

    Ok(())
}
